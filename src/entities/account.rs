// 🔑 Vendor Accounts - username/password registry + session pointer
//
// The registry (username → password) and the "current vendor" pointer are
// separate pieces of state: logging out clears the pointer only, the
// account stays registered.
//
// Passwords are kept and compared in plaintext. This is a local directory
// widget, not an authentication system.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::{required, DirectoryError, Result};
use crate::store::{keys, load_json, save_json, Store};

// ============================================================================
// ACCOUNT REGISTRY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountRegistry {
    accounts: BTreeMap<String, String>,
    // Stored entries whose password is not a string. Written back untouched;
    // the username stays taken but never logs in.
    unreadable: BTreeMap<String, Value>,
}

impl AccountRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the registry entry by entry; missing or corrupt data means no
    /// accounts
    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let mut registry = AccountRegistry::new();
        let Some(entries) = load_json::<BTreeMap<String, Value>, _>(store, keys::VENDOR_ACCOUNTS)?
            .or_empty(keys::VENDOR_ACCOUNTS)
        else {
            return Ok(registry);
        };

        for (username, password) in entries {
            match password {
                Value::String(password) => {
                    registry.accounts.insert(username, password);
                }
                other => {
                    warn!(%username, "stored account has no readable password");
                    registry.unreadable.insert(username, other);
                }
            }
        }

        Ok(registry)
    }

    fn encode(&self) -> BTreeMap<&str, Value> {
        self.unreadable
            .iter()
            .map(|(username, raw)| (username.as_str(), raw.clone()))
            .chain(
                self.accounts
                    .iter()
                    .map(|(username, password)| (username.as_str(), Value::from(password.as_str()))),
            )
            .collect()
    }

    /// Register a new vendor account.
    ///
    /// The username is trimmed, the password is taken verbatim. Fails with
    /// `MissingField` on blank input and `DuplicateUsername` when taken.
    pub fn signup<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let username = required("username", username)?;
        if password.is_empty() {
            return Err(DirectoryError::MissingField("password"));
        }
        if self.contains(&username) {
            warn!(%username, "signup rejected: username taken");
            return Err(DirectoryError::DuplicateUsername);
        }

        let mut next = self.clone();
        next.accounts.insert(username.clone(), password.to_string());
        save_json(store, keys::VENDOR_ACCOUNTS, &next.encode())?;
        *self = next;

        info!(%username, "vendor account created");
        Ok(())
    }

    /// Exact plaintext comparison; unknown users never verify
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.accounts.get(username) {
            Some(stored) => !stored.is_empty() && stored == password,
            None => false,
        }
    }

    /// Check credentials and start a session for the vendor
    pub fn login<S: Store + ?Sized>(
        &self,
        store: &mut S,
        username: &str,
        password: &str,
    ) -> Result<String> {
        let username = username.trim();
        if !self.verify(username, password) {
            warn!(%username, "vendor login failed");
            return Err(DirectoryError::InvalidCredentials);
        }

        VendorSession::start(store, username)?;
        info!(%username, "vendor logged in");
        Ok(username.to_string())
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username) || self.unreadable.contains_key(username)
    }

    pub fn password(&self, username: &str) -> Option<&str> {
        self.accounts.get(username).map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.accounts.len() + self.unreadable.len()
    }
}

// ============================================================================
// SESSION POINTER
// ============================================================================

/// The single "current vendor" pointer, stored as a plain string
pub struct VendorSession;

impl VendorSession {
    pub fn current<S: Store + ?Sized>(store: &S) -> Result<Option<String>> {
        let current = store
            .get(keys::CURRENT_VENDOR)?
            .filter(|username| !username.is_empty());
        Ok(current)
    }

    pub fn start<S: Store + ?Sized>(store: &mut S, username: &str) -> Result<()> {
        store.set(keys::CURRENT_VENDOR, username)?;
        Ok(())
    }

    /// Clear the pointer; the account itself is untouched
    pub fn end<S: Store + ?Sized>(store: &mut S) -> Result<()> {
        store.remove(keys::CURRENT_VENDOR)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
