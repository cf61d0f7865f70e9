use std::{
    env,
    fmt::{Debug, Display},
    path::PathBuf,
    str::FromStr,
};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub struct Config {
    /// sqlite file backing the store
    pub db_path: PathBuf,
    pub port: u16,
    /// Static front-end served by the HTTP server
    pub web_dir: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            db_path: try_load("DIRECTORY_DB", PathBuf::from("directory.db")),
            port: try_load("DIRECTORY_PORT", 3000),
            web_dir: try_load("DIRECTORY_WEB_DIR", PathBuf::from("web")),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Debug,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        info!("{key} not set, using default: {default:?}");
        return default;
    };

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default:?}");
            default
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_uses_default_when_unset() {
        let port: u16 = try_load("DIRECTORY_TEST_UNSET_PORT", 3000);
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_try_load_falls_back_on_invalid_value() {
        env::set_var("DIRECTORY_TEST_BAD_PORT", "not-a-port");
        let port: u16 = try_load("DIRECTORY_TEST_BAD_PORT", 3000);
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_try_load_reads_value() {
        env::set_var("DIRECTORY_TEST_DB", "/tmp/vendors.db");
        let path: PathBuf = try_load("DIRECTORY_TEST_DB", PathBuf::from("directory.db"));
        assert_eq!(path, PathBuf::from("/tmp/vendors.db"));
    }

    #[test]
    fn test_load_defaults() {
        let config = Config::load();
        assert!(config.port > 0);
        assert!(!config.db_path.as_os_str().is_empty());
    }
}
