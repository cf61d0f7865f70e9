// 🏪 Vendor Entity - a service provider listing
//
// Vendors are plain values: created from the built-in seed list or from a
// submission, never edited in place, never deleted.
//
// The vendor name doubles as the lookup key for ratings and favorites.
// Nothing enforces uniqueness across the catalogue, so two vendors sharing a
// name (even in different categories) share one rating history and count as
// the same favorite.

use serde::{Deserialize, Serialize};

use crate::error::{required, Result};

/// Vendor listing, serialized with the field names the browser build used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub category: String,

    /// Unique by convention only (see module docs)
    pub name: String,

    pub location: String,

    pub description: String,

    pub phone: String,

    /// Optional contact email, empty when not supplied
    #[serde(default)]
    pub email: String,
}

impl Vendor {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Vendor {
            category: category.into(),
            name: name.into(),
            location: location.into(),
            description: description.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Key used by the rating ledger and member favorites
    pub fn key(&self) -> &str {
        &self.name
    }

    /// "Phone: ... | Email: ..." line shown on cards and in the detail view
    pub fn contact_line(&self) -> String {
        format!("Phone: {} | Email: {}", self.phone, self.email)
    }
}

/// Built-in listings that ship with the directory
pub fn seed_vendors() -> Vec<Vendor> {
    vec![Vendor::new(
        "Catering & Cakes",
        "Alamo Fiesta Charcuterie",
        "San Antonio, TX",
        "Bottomless charcuterie experience that allows guests to make their own boards.",
        "210-900-9990",
        "AlamoFiestaGroup@gmail.com",
    )]
}

// ============================================================================
// SUBMISSION FORM
// ============================================================================

/// Raw add-vendor form fields, exactly as typed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorSubmission {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl VendorSubmission {
    /// Trim every field and check the required ones. Email is optional.
    pub fn validate(&self) -> Result<Vendor> {
        Ok(Vendor {
            category: required("category", &self.category)?,
            name: required("name", &self.name)?,
            location: required("location", &self.location)?,
            description: required("description", &self.description)?,
            phone: required("phone", &self.phone)?,
            email: self.email.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DirectoryError;

    fn submission() -> VendorSubmission {
        VendorSubmission {
            category: " Venues ".to_string(),
            name: "Hill Country Barn".to_string(),
            location: "Boerne, TX ".to_string(),
            description: "Rustic barn with string lights.".to_string(),
            phone: "830-555-0101".to_string(),
            email: "  ".to_string(),
        }
    }

    #[test]
    fn test_seed_vendors() {
        let seeds = seed_vendors();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].name, "Alamo Fiesta Charcuterie");
        assert_eq!(seeds[0].category, "Catering & Cakes");
    }

    #[test]
    fn test_submission_trims_fields() {
        let vendor = submission().validate().unwrap();
        assert_eq!(vendor.category, "Venues");
        assert_eq!(vendor.location, "Boerne, TX");
        assert_eq!(vendor.email, "");
    }

    #[test]
    fn test_submission_reports_first_missing_field() {
        let mut form = submission();
        form.location = "   ".to_string();
        form.phone = String::new();

        let err = form.validate().unwrap_err();
        assert!(matches!(err, DirectoryError::MissingField("location")));
    }

    #[test]
    fn test_vendor_email_defaults_when_absent() {
        let json = r#"{"category":"Venues","name":"A","location":"B","description":"C","phone":"D"}"#;
        let vendor: Vendor = serde_json::from_str(json).unwrap();
        assert_eq!(vendor.email, "");
    }

    #[test]
    fn test_contact_line() {
        let vendor = &seed_vendors()[0];
        assert_eq!(
            vendor.contact_line(),
            "Phone: 210-900-9990 | Email: AlamoFiestaGroup@gmail.com"
        );
    }
}
