// Entity Models
//
// Each entity is a plain value plus the operations that load it from and
// save it to the store:
// - Vendor: catalogue listing (name is the lookup key)
// - Category: derived from the catalogue, described from a fixed mapping
// - Account: vendor username/password registry + session pointer
// - Member: single member profile with favorites, contacts and greeting

pub mod vendor;
pub mod category;
pub mod account;
pub mod member;

pub use vendor::{seed_vendors, Vendor, VendorSubmission};
pub use category::{Category, CategoryRegistry};
pub use account::{AccountRegistry, VendorSession};
pub use member::{Contact, Favorite, Greeting, MemberProfile};
