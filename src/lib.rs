// Vendor Directory - Core Library
// Exposes all modules for use in CLI, terminal UI, API server, and tests

pub mod config;
pub mod error;
pub mod store;
pub mod entities;
pub mod catalogue;
pub mod filter;
pub mod ratings;
pub mod directory;

// Re-export commonly used types
pub use config::{init_tracing, Config};
pub use error::{DirectoryError, Result, Role, StoreError};
pub use store::{keys, Loaded, MemoryStore, SqliteStore, Store};
pub use entities::{
    seed_vendors, Vendor, VendorSubmission,
    Category, CategoryRegistry,
    AccountRegistry, VendorSession,
    Contact, Favorite, Greeting, MemberProfile,
};
pub use catalogue::{Catalogue, ImportSummary};
pub use filter::{filter, CategoryFilter, FilterQuery, VendorFilter, NO_RESULTS_MESSAGE};
pub use ratings::{display_rating, interactive_level, star_glyphs, RatingLedger, Star};
pub use directory::{Directory, VendorCard};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
