// 🗄️ Persistent Store - string key/value port + JSON helpers
//
// Every aggregate reads and writes through the `Store` trait, so the same
// code runs against an in-memory map (tests) or a sqlite file (CLI, server).
// Values are plain strings; JSON encoding lives in `load_json`/`save_json`.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::error::StoreError;

/// Top-level keys, compatible with the browser build of the directory
pub mod keys {
    pub const USER_VENDORS: &str = "userVendors";
    pub const RATINGS: &str = "vendorRatings";
    pub const VENDOR_ACCOUNTS: &str = "vendorAccounts";
    pub const CURRENT_VENDOR: &str = "currentVendor";
    pub const MEMBER_PROFILE: &str = "memberProfile";
    pub const GREETING_NAME: &str = "profileName";
    pub const GREETING_EMAIL: &str = "profileEmail";
}

/// Synchronous key/value persistence port
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ============================================================================
// MEMORY STORE
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// Durable store: one `kv` table in a sqlite file (WAL mode)
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        setup_store(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        setup_store(&conn)?;
        Ok(Self { conn })
    }

    /// Number of keys currently stored
    pub fn count(&self) -> Result<i64, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn setup_store(conn: &Connection) -> Result<(), StoreError> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ============================================================================
// JSON HELPERS
// ============================================================================

/// Outcome of reading a JSON value: parse failures are data, not errors
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Present(T),
    Empty,
    Corrupt(String),
}

impl<T> Loaded<T> {
    /// Degrade to `Option`, logging (and otherwise ignoring) corrupt data
    pub fn or_empty(self, key: &str) -> Option<T> {
        match self {
            Loaded::Present(value) => Some(value),
            Loaded::Empty => None,
            Loaded::Corrupt(reason) => {
                warn!(key, %reason, "ignoring corrupt persisted value");
                None
            }
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Loaded::Corrupt(_))
    }
}

/// Decode a raw stored string. Absent keys and JSON `null` are `Empty`.
pub fn decode<T: DeserializeOwned>(raw: Option<&str>) -> Loaded<T> {
    let Some(raw) = raw else {
        return Loaded::Empty;
    };

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => return Loaded::Corrupt(e.to_string()),
    };

    if value.is_null() {
        return Loaded::Empty;
    }

    match serde_json::from_value(value) {
        Ok(decoded) => Loaded::Present(decoded),
        Err(e) => Loaded::Corrupt(e.to_string()),
    }
}

pub fn load_json<T, S>(store: &S, key: &str) -> Result<Loaded<T>, StoreError>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    let raw = store.get(key)?;
    Ok(decode(raw.as_deref()))
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_sqlite_store_upsert_and_remove() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("currentVendor", "ana").unwrap();
        store.set("currentVendor", "bea").unwrap();

        assert_eq!(store.get("currentVendor").unwrap().as_deref(), Some("bea"));
        assert_eq!(store.count().unwrap(), 1);

        store.remove("currentVendor").unwrap();
        assert_eq!(store.get("currentVendor").unwrap(), None);
        // Removing twice is fine
        store.remove("currentVendor").unwrap();
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("directory.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("vendorAccounts", r#"{"ana":"pw"}"#).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("vendorAccounts").unwrap().as_deref(),
            Some(r#"{"ana":"pw"}"#)
        );
    }

    #[test]
    fn test_decode_absent_and_null_are_empty() {
        assert_eq!(decode::<Vec<i64>>(None), Loaded::Empty);
        assert_eq!(decode::<Vec<i64>>(Some("null")), Loaded::Empty);
    }

    #[test]
    fn test_decode_corrupt_json() {
        assert!(decode::<Vec<i64>>(Some("{not json")).is_corrupt());
        // Valid JSON with the wrong shape is corrupt too
        assert!(decode::<Vec<i64>>(Some(r#"{"a":1}"#)).is_corrupt());
    }

    #[test]
    fn test_load_and_save_json() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "nums", &vec![1, 2, 3]).unwrap();

        let loaded: Loaded<Vec<i64>> = load_json(&store, "nums").unwrap();
        assert_eq!(loaded, Loaded::Present(vec![1, 2, 3]));
        assert_eq!(loaded.or_empty("nums"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_corrupt_degrades_to_none() {
        let mut store = MemoryStore::new();
        store.set("nums", "[1, 2,").unwrap();

        let loaded: Loaded<Vec<i64>> = load_json(&store, "nums").unwrap();
        assert_eq!(loaded.or_empty("nums"), None);
    }
}
