// 🧭 Directory - single entry point for presentation layers
//
// Owns the store and the in-memory catalogue. Presentation code (terminal
// UI, HTTP handlers, CLI) passes raw form strings in; everything is trimmed
// and validated here before any state changes.
//
// The rating ledger, account registry and member profile are re-read from
// the store on every call, so each read sees the latest write.

use serde::Serialize;
use std::path::Path;

use crate::catalogue::{Catalogue, ImportSummary};
use crate::entities::account::{AccountRegistry, VendorSession};
use crate::entities::category::Category;
use crate::entities::member::{Greeting, MemberProfile};
use crate::entities::vendor::{Vendor, VendorSubmission};
use crate::error::{DirectoryError, Result, Role};
use crate::filter::VendorFilter;
use crate::ratings::{star_glyphs, RatingLedger};
use crate::store::Store;

/// Vendor as shown in a listing: the record plus its rating summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorCard {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub average: f64,
    pub rating_count: usize,
    pub stars: String,
    /// A member is logged in and may save this vendor
    pub saveable: bool,
}

pub struct Directory<S: Store> {
    store: S,
    catalogue: Catalogue,
}

impl<S: Store> Directory<S> {
    /// Load the catalogue from the store
    pub fn open(store: S) -> Result<Self> {
        let catalogue = Catalogue::load(&store)?;
        Ok(Directory { store, catalogue })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // CATALOGUE
    // ========================================================================

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Category cards, "All" first
    pub fn categories(&self) -> Vec<Category> {
        self.catalogue.categories().categories()
    }

    /// Categories offered by the add-vendor form
    pub fn submission_categories(&self) -> &[String] {
        self.catalogue.categories().submission_categories()
    }

    pub fn search(&self, filter: &VendorFilter) -> Vec<Vendor> {
        self.catalogue.filter(filter)
    }

    /// Filtered vendors with their rating summary
    pub fn vendor_cards(&self, filter: &VendorFilter) -> Result<Vec<VendorCard>> {
        let ledger = RatingLedger::load(&self.store)?;
        let saveable = MemberProfile::load(&self.store)?.is_some();

        let cards = self
            .catalogue
            .filter(filter)
            .into_iter()
            .map(|vendor| {
                let average = ledger.average(vendor.key());
                VendorCard {
                    rating_count: ledger.count(vendor.key()),
                    stars: star_glyphs(average),
                    average,
                    saveable,
                    vendor,
                }
            })
            .collect();

        Ok(cards)
    }

    pub fn vendor(&self, name: &str) -> Result<&Vendor> {
        self.catalogue
            .find(name)
            .ok_or_else(|| DirectoryError::UnknownVendor(name.to_string()))
    }

    /// Add a listing from the vendor portal (needs a vendor session)
    pub fn submit_vendor(&mut self, submission: &VendorSubmission) -> Result<Vendor> {
        if VendorSession::current(&self.store)?.is_none() {
            return Err(DirectoryError::NotLoggedIn(Role::Vendor));
        }
        self.catalogue.submit(&mut self.store, submission)
    }

    pub fn import_csv(&mut self, csv_path: &Path) -> anyhow::Result<ImportSummary> {
        self.catalogue.import_csv(&mut self.store, csv_path)
    }

    // ========================================================================
    // RATINGS
    // ========================================================================

    /// Record a 1-5 star rating and return the vendor's new average
    pub fn rate(&mut self, vendor_name: &str, stars: i64) -> Result<f64> {
        let name = self.vendor(vendor_name)?.key().to_string();
        let mut ledger = RatingLedger::load(&self.store)?;
        ledger.record_raw(&mut self.store, &name, stars)?;
        Ok(ledger.average(&name))
    }

    pub fn average_rating(&self, vendor_name: &str) -> Result<f64> {
        Ok(RatingLedger::load(&self.store)?.average(vendor_name))
    }

    // ========================================================================
    // VENDOR ACCOUNTS
    // ========================================================================

    pub fn signup(&mut self, username: &str, password: &str) -> Result<()> {
        let mut registry = AccountRegistry::load(&self.store)?;
        registry.signup(&mut self.store, username, password)
    }

    pub fn vendor_login(&mut self, username: &str, password: &str) -> Result<String> {
        let registry = AccountRegistry::load(&self.store)?;
        registry.login(&mut self.store, username, password)
    }

    pub fn vendor_logout(&mut self) -> Result<()> {
        VendorSession::end(&mut self.store)
    }

    pub fn current_vendor(&self) -> Result<Option<String>> {
        VendorSession::current(&self.store)
    }

    // ========================================================================
    // MEMBER PROFILE
    // ========================================================================

    pub fn member_login(&mut self, name: &str, email: &str) -> Result<MemberProfile> {
        MemberProfile::login(&mut self.store, name, email)
    }

    pub fn member(&self) -> Result<Option<MemberProfile>> {
        MemberProfile::load(&self.store)
    }

    /// Save a catalogue vendor to the member's favorites
    pub fn save_favorite(&mut self, vendor_name: &str) -> Result<MemberProfile> {
        let vendor = self.vendor(vendor_name)?.clone();
        MemberProfile::add_favorite(&mut self.store, &vendor)
    }

    pub fn add_contact(&mut self, name: &str, email: &str) -> Result<MemberProfile> {
        MemberProfile::add_contact(&mut self.store, name, email)
    }

    pub fn member_logout(&mut self) -> Result<()> {
        MemberProfile::logout(&mut self.store)
    }

    pub fn greeting(&self) -> Result<Option<Greeting>> {
        Greeting::load(&self.store)
    }

    pub fn save_greeting(&mut self, name: &str, email: &str) -> Result<Greeting> {
        Greeting::save(&mut self.store, name, email)
    }
}

// ============================================================================
// TESTS
// ============================================================================
