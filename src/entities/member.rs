// 👤 Member Profile - the single member's identity, favorites and contacts
//
// At most one profile exists. Logging in creates it (or refreshes name and
// email on the existing one), logging out deletes it together with the
// greeting keys.
//
// LoggedOut → login → LoggedIn → (add_favorite | add_contact)* → logout → LoggedOut

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::vendor::Vendor;
use crate::error::{required, DirectoryError, Result, Role};
use crate::store::{keys, load_json, save_json, Store};

/// Snapshot of a vendor at the time it was saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub name: String,
    pub category: String,
    pub location: String,
}

impl From<&Vendor> for Favorite {
    fn from(vendor: &Vendor) -> Self {
        Favorite {
            name: vendor.name.clone(),
            category: vendor.category.clone(),
            location: vendor.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

impl Contact {
    /// "Name (email)" as listed in the member portal
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub favorites: Vec<Favorite>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl MemberProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        MemberProfile {
            name: name.into(),
            email: email.into(),
            favorites: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn has_favorite(&self, vendor_name: &str) -> bool {
        self.favorites.iter().any(|f| f.name == vendor_name)
    }

    /// Current profile, `None` when logged out (or the stored blob is corrupt)
    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Option<Self>> {
        Ok(load_json(store, keys::MEMBER_PROFILE)?.or_empty(keys::MEMBER_PROFILE))
    }

    fn save<S: Store + ?Sized>(&self, store: &mut S) -> Result<()> {
        save_json(store, keys::MEMBER_PROFILE, self)?;
        Ok(())
    }

    /// Upsert: keeps favorites and contacts of an existing profile.
    /// Also mirrors name/email into the greeting keys.
    pub fn login<S: Store + ?Sized>(store: &mut S, name: &str, email: &str) -> Result<Self> {
        let name = required("name", name)?;
        let email = required("email", email)?;

        let profile = match Self::load(store)? {
            Some(mut existing) => {
                existing.name = name;
                existing.email = email;
                existing
            }
            None => MemberProfile::new(name, email),
        };

        profile.save(store)?;
        Greeting::write(store, &profile.name, &profile.email)?;

        info!(member = %profile.name, "member logged in");
        Ok(profile)
    }

    /// Save a vendor snapshot. Fails if logged out or already saved.
    pub fn add_favorite<S: Store + ?Sized>(store: &mut S, vendor: &Vendor) -> Result<Self> {
        let mut profile = Self::load(store)?.ok_or(DirectoryError::NotLoggedIn(Role::Member))?;

        if profile.has_favorite(&vendor.name) {
            warn!(vendor = %vendor.name, "favorite already saved");
            return Err(DirectoryError::AlreadySaved);
        }

        profile.favorites.push(Favorite::from(vendor));
        profile.save(store)?;

        info!(vendor = %vendor.name, "vendor saved to favorites");
        Ok(profile)
    }

    /// Append a contact. Session is checked before the fields.
    pub fn add_contact<S: Store + ?Sized>(store: &mut S, name: &str, email: &str) -> Result<Self> {
        let mut profile = Self::load(store)?.ok_or(DirectoryError::NotLoggedIn(Role::Member))?;

        let contact = Contact {
            name: required("contact name", name)?,
            email: required("contact email", email)?,
        };

        profile.contacts.push(contact);
        profile.save(store)?;
        Ok(profile)
    }

    /// Destroy the profile and the greeting keys
    pub fn logout<S: Store + ?Sized>(store: &mut S) -> Result<()> {
        store.remove(keys::GREETING_NAME)?;
        store.remove(keys::GREETING_EMAIL)?;
        store.remove(keys::MEMBER_PROFILE)?;
        info!("member logged out");
        Ok(())
    }
}

// ============================================================================
// GREETING
// ============================================================================

/// Name/email pair kept under separate plain-string keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greeting {
    pub name: String,
    pub email: String,
}

impl Greeting {
    /// Present only when both keys hold a non-empty value
    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Option<Self>> {
        let name = store.get(keys::GREETING_NAME)?.filter(|v| !v.is_empty());
        let email = store.get(keys::GREETING_EMAIL)?.filter(|v| !v.is_empty());

        Ok(match (name, email) {
            (Some(name), Some(email)) => Some(Greeting { name, email }),
            _ => None,
        })
    }

    /// Profile form submission: both fields required after trimming
    pub fn save<S: Store + ?Sized>(store: &mut S, name: &str, email: &str) -> Result<Self> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        Self::write(store, &name, &email)?;
        Ok(Greeting { name, email })
    }

    fn write<S: Store + ?Sized>(store: &mut S, name: &str, email: &str) -> Result<()> {
        store.set(keys::GREETING_NAME, name)?;
        store.set(keys::GREETING_EMAIL, email)?;
        Ok(())
    }

    pub fn message(&self) -> String {
        format!("Welcome back, {}!", self.name)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::vendor::seed_vendors;
    use crate::store::MemoryStore;

    fn logged_in() -> MemoryStore {
        let mut store = MemoryStore::new();
        MemberProfile::login(&mut store, "Maya", "maya@example.com").unwrap();
        store
    }

    #[test]
    fn test_login_creates_empty_profile() {
        let store = logged_in();
        let profile = MemberProfile::load(&store).unwrap().unwrap();

        assert_eq!(profile.name, "Maya");
        assert!(profile.favorites.is_empty());
        assert!(profile.contacts.is_empty());
    }

    #[test]
    fn test_login_mirrors_greeting() {
        let store = logged_in();
        let greeting = Greeting::load(&store).unwrap().unwrap();
        assert_eq!(greeting.email, "maya@example.com");
        assert_eq!(greeting.message(), "Welcome back, Maya!");
    }

    #[test]
    fn test_login_requires_name_and_email() {
        let mut store = MemoryStore::new();
        let err = MemberProfile::login(&mut store, "Maya", "  ").unwrap_err();
        assert!(matches!(err, DirectoryError::MissingField("email")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_relogin_preserves_favorites_and_contacts() {
        let mut store = logged_in();
        let vendor = &seed_vendors()[0];
        MemberProfile::add_favorite(&mut store, vendor).unwrap();
        MemberProfile::add_contact(&mut store, "Planner Pat", "pat@example.com").unwrap();

        let profile = MemberProfile::login(&mut store, "Maya R.", "mr@example.com").unwrap();
        assert_eq!(profile.name, "Maya R.");
        assert_eq!(profile.email, "mr@example.com");
        assert_eq!(profile.favorites.len(), 1);
        assert_eq!(profile.contacts.len(), 1);
    }

    #[test]
    fn test_add_favorite_twice() {
        let mut store = logged_in();
        let vendor = &seed_vendors()[0];

        MemberProfile::add_favorite(&mut store, vendor).unwrap();
        let err = MemberProfile::add_favorite(&mut store, vendor).unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadySaved));

        let profile = MemberProfile::load(&store).unwrap().unwrap();
        assert_eq!(profile.favorites.len(), 1);
    }

    #[test]
    fn test_favorite_is_a_snapshot() {
        let mut store = logged_in();
        let mut vendor = seed_vendors()[0].clone();
        MemberProfile::add_favorite(&mut store, &vendor).unwrap();

        vendor.location = "Austin, TX".to_string();
        let profile = MemberProfile::load(&store).unwrap().unwrap();
        assert_eq!(profile.favorites[0].location, "San Antonio, TX");
    }

    #[test]
    fn test_same_name_counts_as_same_favorite() {
        let mut store = logged_in();
        let first = Vendor::new("Venues", "Rosewood", "Dallas, TX", "d", "1", "");
        let second = Vendor::new("Florals & Decor", "Rosewood", "Waco, TX", "d", "2", "");

        MemberProfile::add_favorite(&mut store, &first).unwrap();
        let err = MemberProfile::add_favorite(&mut store, &second).unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadySaved));
    }

    #[test]
    fn test_add_contact() {
        let mut store = logged_in();
        let profile =
            MemberProfile::add_contact(&mut store, " Planner Pat ", "pat@example.com").unwrap();

        assert_eq!(profile.contacts[0].label(), "Planner Pat (pat@example.com)");
    }

    #[test]
    fn test_add_contact_blank_field() {
        let mut store = logged_in();
        let err = MemberProfile::add_contact(&mut store, "Pat", " ").unwrap_err();
        assert!(matches!(err, DirectoryError::MissingField("contact email")));

        let profile = MemberProfile::load(&store).unwrap().unwrap();
        assert!(profile.contacts.is_empty());
    }

    #[test]
    fn test_logged_out_operations_fail() {
        let mut store = MemoryStore::new();
        let vendor = &seed_vendors()[0];

        let err = MemberProfile::add_favorite(&mut store, vendor).unwrap_err();
        assert!(matches!(err, DirectoryError::NotLoggedIn(Role::Member)));

        let err = MemberProfile::add_contact(&mut store, "", "").unwrap_err();
        assert!(matches!(err, DirectoryError::NotLoggedIn(Role::Member)));
    }

    #[test]
    fn test_logout_destroys_profile() {
        let mut store = logged_in();
        MemberProfile::logout(&mut store).unwrap();

        assert_eq!(MemberProfile::load(&store).unwrap(), None);
        assert_eq!(Greeting::load(&store).unwrap(), None);
        assert!(store.is_empty());

        let err = MemberProfile::add_favorite(&mut store, &seed_vendors()[0]).unwrap_err();
        assert!(matches!(err, DirectoryError::NotLoggedIn(Role::Member)));
    }

    #[test]
    fn test_greeting_form() {
        let mut store = MemoryStore::new();
        assert_eq!(Greeting::load(&store).unwrap(), None);

        let err = Greeting::save(&mut store, "", "a@b.c").unwrap_err();
        assert!(matches!(err, DirectoryError::MissingField("name")));
        assert_eq!(Greeting::load(&store).unwrap(), None);

        Greeting::save(&mut store, " Lee ", "lee@example.com").unwrap();
        let greeting = Greeting::load(&store).unwrap().unwrap();
        assert_eq!(greeting.name, "Lee");

        // The greeting alone does not log a member in
        assert_eq!(MemberProfile::load(&store).unwrap(), None);
    }

    #[test]
    fn test_stored_null_profile_is_logged_out() {
        let mut store = MemoryStore::new();
        store.set(keys::MEMBER_PROFILE, "null").unwrap();
        assert_eq!(MemberProfile::load(&store).unwrap(), None);
    }
}
