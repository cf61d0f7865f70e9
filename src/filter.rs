// 🔍 Filter Pipeline - category / name / location matching
//
// Pure functions over the catalogue. All three predicates must hold, all
// comparisons are case-insensitive, and the result keeps catalogue order.

use serde::Deserialize;
use tracing::debug;

use crate::entities::category::ALL;
use crate::entities::vendor::Vendor;

/// Shown by presentation layers when a filter matches nothing
pub const NO_RESULTS_MESSAGE: &str =
    "No vendors found. Try adjusting your search or selecting another category.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Named(String),
}

impl CategoryFilter {
    /// "All" or a blank selection means no category filter
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(raw.to_string())
        }
    }

    pub fn matches(&self, vendor: &Vendor) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => vendor.category.to_lowercase() == name.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Named(name) => name,
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        CategoryFilter::All
    }
}

/// Active category plus the two free-text terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorFilter {
    pub category: CategoryFilter,
    search: String,
    location: String,
}

impl VendorFilter {
    /// Build from raw UI strings; terms are trimmed and lowercased once
    pub fn new(category: &str, search: &str, location: &str) -> Self {
        VendorFilter {
            category: CategoryFilter::parse(category),
            search: search.trim().to_lowercase(),
            location: location.trim().to_lowercase(),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn location_term(&self) -> &str {
        &self.location
    }

    pub fn matches(&self, vendor: &Vendor) -> bool {
        let matches_name = vendor.name.to_lowercase().contains(&self.search);
        let matches_location =
            self.location.is_empty() || vendor.location.to_lowercase().contains(&self.location);

        self.category.matches(vendor) && matches_name && matches_location
    }

    /// Matching vendors in catalogue order
    pub fn apply(&self, vendors: &[Vendor]) -> Vec<Vendor> {
        let filtered: Vec<Vendor> = vendors
            .iter()
            .filter(|v| self.matches(v))
            .cloned()
            .collect();

        debug!(
            category = self.category.as_str(),
            search = %self.search,
            location = %self.location,
            matched = filtered.len(),
            total = vendors.len(),
            "filtered vendors"
        );

        filtered
    }
}

/// Query-string shape used by the HTTP layer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
}

impl From<&FilterQuery> for VendorFilter {
    fn from(query: &FilterQuery) -> Self {
        VendorFilter::new(&query.category, &query.search, &query.location)
    }
}

/// filter(catalogue, activeCategory, searchTerm, locationTerm)
pub fn filter(vendors: &[Vendor], category: &str, search: &str, location: &str) -> Vec<Vendor> {
    VendorFilter::new(category, search, location).apply(vendors)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<Vendor> {
        vec![
            Vendor::new("Venues", "Hill Country Barn", "Boerne, TX", "d", "1", ""),
            Vendor::new("Catering & Cakes", "Alamo Fiesta Charcuterie", "San Antonio, TX", "d", "2", ""),
            Vendor::new("Venues", "Riverwalk Terrace", "San Antonio, TX", "d", "3", ""),
            Vendor::new("Planners", "Barnaby Events", "Austin, TX", "d", "4", ""),
        ]
    }

    fn names(vendors: &[Vendor]) -> Vec<&str> {
        vendors.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_all_with_empty_terms_returns_everything() {
        let vendors = catalogue();
        assert_eq!(filter(&vendors, "All", "", ""), vendors);
        assert_eq!(filter(&vendors, "", "", ""), vendors);
    }

    #[test]
    fn test_category_filter() {
        let result = filter(&catalogue(), "Venues", "", "");
        assert_eq!(names(&result), vec!["Hill Country Barn", "Riverwalk Terrace"]);

        let result = filter(&catalogue(), "venues", "", "");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_name_search_is_case_insensitive_substring() {
        let result = filter(&catalogue(), "All", "  BARN ", "");
        assert_eq!(names(&result), vec!["Hill Country Barn", "Barnaby Events"]);
    }

    #[test]
    fn test_search_does_not_match_description_or_location() {
        let result = filter(&catalogue(), "All", "san antonio", "");
        assert!(result.is_empty());
    }

    #[test]
    fn test_location_filter() {
        let result = filter(&catalogue(), "All", "", "san antonio");
        assert_eq!(
            names(&result),
            vec!["Alamo Fiesta Charcuterie", "Riverwalk Terrace"]
        );
    }

    #[test]
    fn test_all_predicates_combined() {
        let result = filter(&catalogue(), "Venues", "terrace", "antonio");
        assert_eq!(names(&result), vec!["Riverwalk Terrace"]);

        let result = filter(&catalogue(), "Planners", "terrace", "antonio");
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_category_is_empty_not_error() {
        assert!(filter(&catalogue(), "Skydiving", "", "").is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let vendors = catalogue();
        let cases = [
            ("All", "", ""),
            ("Venues", "", "tx"),
            ("All", "ar", ""),
            ("Catering & Cakes", "alamo", "san"),
            ("Nope", "", ""),
        ];

        for (category, search, location) in cases {
            let once = filter(&vendors, category, search, location);
            let twice = filter(&once, category, search, location);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_result_only_contains_matching_vendors_in_order() {
        let vendors = catalogue();
        let f = VendorFilter::new("All", "r", "tx");
        let result = f.apply(&vendors);

        assert!(result.iter().all(|v| f.matches(v)));
        let positions: Vec<usize> = result
            .iter()
            .map(|r| vendors.iter().position(|v| v == r).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("Venues"),
            CategoryFilter::Named("Venues".to_string())
        );
    }
}
