// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;

use vendor_directory::{
    init_tracing, Config, Directory, SqliteStore, VendorFilter, NO_RESULTS_MESSAGE,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    // Keep the alternate screen clean in UI mode
    init_tracing(if command.is_none() { "warn" } else { "info" });
    let config = Config::load();

    match command {
        None => run_ui_mode(&config),
        Some("import") => run_import(&config, &args[2..]),
        Some("list") => run_list(&config, &args[2..]),
        Some("categories") => run_categories(&config),
        Some("rate") => run_rate(&config, &args[2..]),
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("unknown command: {}", other)
        }
    }
}

fn open_directory(config: &Config) -> Result<Directory<SqliteStore>> {
    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open store at {:?}", config.db_path))?;
    let directory = Directory::open(store).context("Failed to load the catalogue")?;
    Ok(directory)
}

fn print_usage() {
    println!("Usage: vendor-directory [command]");
    println!();
    println!("  (no command)                         open the terminal UI");
    println!("  import <csv>                         add vendors from a CSV file");
    println!("  list [category] [search] [location]  print matching vendors");
    println!("  categories                           print known categories");
    println!("  rate <vendor> <1-5>                  rate a vendor");
}

fn run_import(config: &Config, args: &[String]) -> Result<()> {
    let Some(csv_path) = args.first() else {
        bail!("usage: vendor-directory import <csv>");
    };

    println!("📂 Importing vendors from {}", csv_path);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut directory = open_directory(config)?;
    let before = directory.catalogue().len();
    let summary = directory.import_csv(Path::new(csv_path))?;

    println!("✓ Added {} vendors", summary.added);
    for (line, reason) in &summary.rejected {
        println!("✗ Line {}: {}", line, reason);
    }
    println!(
        "✓ Catalogue now holds {} vendors (was {})",
        directory.catalogue().len(),
        before
    );

    Ok(())
}

fn run_list(config: &Config, args: &[String]) -> Result<()> {
    let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");
    let filter = VendorFilter::new(arg(0), arg(1), arg(2));

    let directory = open_directory(config)?;
    let cards = directory.vendor_cards(&filter)?;

    if cards.is_empty() {
        println!("{}", NO_RESULTS_MESSAGE);
        return Ok(());
    }

    for card in cards {
        let v = &card.vendor;
        println!("{}  [{}]  {}", card.stars, v.category, v.name);
        println!("    {}", v.description);
        println!("    Location: {}", v.location);
        println!("    {}", v.contact_line());
    }

    Ok(())
}

fn run_categories(config: &Config) -> Result<()> {
    let directory = open_directory(config)?;
    for category in directory.categories() {
        println!("{:<24} {}", category.name, category.description);
    }
    Ok(())
}

fn run_rate(config: &Config, args: &[String]) -> Result<()> {
    let (Some(vendor), Some(stars)) = (args.first(), args.get(1)) else {
        bail!("usage: vendor-directory rate <vendor> <1-5>");
    };
    let stars: i64 = stars
        .parse()
        .with_context(|| format!("not a number: {}", stars))?;

    let mut directory = open_directory(config)?;
    let average = directory.rate(vendor, stars)?;
    println!("✓ Rated {} {} stars (average {:.1})", vendor, stars, average);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let mut directory = open_directory(config)?;
    let mut app = ui::App::new(&directory)?;
    ui::run_ui(&mut app, &mut directory)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin directory-server --features server");
    std::process::exit(1);
}
