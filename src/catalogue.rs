// 📚 Vendor Catalogue - seed list + user submissions
//
// The catalogue is an in-memory, insertion-ordered list: the built-in seed
// vendors followed by every vendor submitted through `add`. Submissions are
// also appended to the `userVendors` list in the store so they come back on
// the next load.

use anyhow::Context;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::entities::category::CategoryRegistry;
use crate::entities::vendor::{seed_vendors, Vendor, VendorSubmission};
use crate::error::{Result, StoreError};
use crate::filter::VendorFilter;
use crate::store::{keys, load_json, save_json, Loaded, Store};

pub struct Catalogue {
    vendors: Vec<Vendor>,
    categories: CategoryRegistry,
}

impl Catalogue {
    /// Catalogue from an explicit vendor list (no store involved)
    pub fn from_vendors(vendors: Vec<Vendor>) -> Self {
        let categories = CategoryRegistry::from_vendors(&vendors);
        Catalogue {
            vendors,
            categories,
        }
    }

    /// Seed vendors followed by the stored user vendors
    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let mut vendors = seed_vendors();
        vendors.extend(Self::user_vendors(store)?);
        Ok(Self::from_vendors(vendors))
    }

    /// Decode the stored submissions one by one.
    ///
    /// A missing, corrupt or non-list value yields nothing; individual
    /// entries that are not vendors are skipped.
    pub fn user_vendors<S: Store + ?Sized>(store: &S) -> Result<Vec<Vendor>> {
        let Some(entries) =
            load_json::<Vec<Value>, _>(store, keys::USER_VENDORS)?.or_empty(keys::USER_VENDORS)
        else {
            return Ok(Vec::new());
        };

        let vendors = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(vendor) => Some(vendor),
                Err(e) => {
                    warn!(index, error = %e, "skipping stored entry that is not a vendor");
                    None
                }
            })
            .collect();

        Ok(vendors)
    }

    /// Append a vendor to the catalogue and to the stored submissions.
    ///
    /// Names are not checked for uniqueness. Returns true when the vendor
    /// introduced a new category.
    pub fn add<S: Store + ?Sized>(&mut self, store: &mut S, vendor: Vendor) -> Result<bool> {
        let encoded = serde_json::to_value(&vendor).map_err(|source| StoreError::Encode {
            key: keys::USER_VENDORS.to_string(),
            source,
        })?;

        let mut stored = match load_json::<Vec<Value>, _>(store, keys::USER_VENDORS)? {
            Loaded::Present(list) => list,
            Loaded::Empty => Vec::new(),
            Loaded::Corrupt(reason) => {
                warn!(%reason, "replacing corrupt user vendor list");
                Vec::new()
            }
        };
        stored.push(encoded);
        save_json(store, keys::USER_VENDORS, &stored)?;

        let new_category = self.categories.introduce(&vendor.category);
        info!(
            vendor = %vendor.name,
            category = %vendor.category,
            new_category,
            "vendor added"
        );
        self.vendors.push(vendor);

        Ok(new_category)
    }

    /// Validate raw form fields, then `add`
    pub fn submit<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        submission: &VendorSubmission,
    ) -> Result<Vendor> {
        let vendor = submission.validate()?;
        self.add(store, vendor.clone())?;
        Ok(vendor)
    }

    /// Bulk-add vendors from a CSV file with the submission columns
    /// (`category,name,location,description,phone,email`)
    pub fn import_csv<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        csv_path: &Path,
    ) -> anyhow::Result<ImportSummary> {
        let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;
        let mut summary = ImportSummary::default();

        for (index, result) in rdr.deserialize::<VendorSubmission>().enumerate() {
            // Header is line 1
            let line = index + 2;

            let submission = match result {
                Ok(submission) => submission,
                Err(e) => {
                    summary.rejected.push((line, e.to_string()));
                    continue;
                }
            };

            match submission.validate() {
                Ok(vendor) => {
                    self.add(store, vendor)
                        .with_context(|| format!("Failed to store vendor from line {}", line))?;
                    summary.added += 1;
                }
                Err(e) => summary.rejected.push((line, e.to_string())),
            }
        }

        info!(
            added = summary.added,
            rejected = summary.rejected.len(),
            "csv import finished"
        );
        Ok(summary)
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// First vendor with this exact name
    pub fn find(&self, name: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.name == name)
    }

    pub fn filter(&self, filter: &VendorFilter) -> Vec<Vendor> {
        filter.apply(&self.vendors)
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

/// Outcome of a CSV import: rejected rows carry (line, reason)
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub added: usize,
    pub rejected: Vec<(usize, String)>,
}

// ============================================================================
// TESTS
// ============================================================================
