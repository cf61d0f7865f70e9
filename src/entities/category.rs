// 🏷️ Category Registry - known categories in first-appearance order
//
// Categories are not stored anywhere on their own: the set is derived by
// scanning the catalogue, and each one is described from a fixed mapping.
// "All" is synthetic and always comes first.

use serde::Serialize;
use std::collections::HashMap;

use super::vendor::Vendor;

/// Pseudo-category meaning "no category filter"
pub const ALL: &str = "All";

pub const ALL_DESCRIPTION: &str = "View all vendors across every category.";

/// Description for any category outside the fixed mapping
pub const COMMUNITY_DESCRIPTION: &str = "Community submitted vendors in this category.";

/// Category as presented on a category card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub description: String,
}

pub struct CategoryRegistry {
    /// Real categories in order of first appearance ("All" excluded)
    order: Vec<String>,

    /// Fixed descriptions for the well-known wedding categories
    descriptions: HashMap<String, String>,
}

impl CategoryRegistry {
    /// Create new empty registry (no descriptions)
    pub fn new() -> Self {
        CategoryRegistry {
            order: Vec::new(),
            descriptions: HashMap::new(),
        }
    }

    /// Create registry with the fixed description mapping pre-loaded
    pub fn with_defaults() -> Self {
        let mut registry = CategoryRegistry::new();
        registry.register_default_descriptions();
        registry
    }

    /// Registry describing exactly the categories found in `vendors`
    pub fn from_vendors(vendors: &[Vendor]) -> Self {
        let mut registry = CategoryRegistry::with_defaults();
        for vendor in vendors {
            registry.observe(&vendor.category);
        }
        registry
    }

    fn register_default_descriptions(&mut self) {
        let defaults = [
            ("Venues", "A great venue sets the tone for your celebration and should be booked early."),
            ("Planners", "Professional planners orchestrate every detail and keep your day on track."),
            ("Photography & Video", "Capture priceless memories with skilled photographers and filmmakers."),
            ("Florals & Decor", "Florists and decorators bring your vision to life with blooms and styling."),
            ("Music & Entertainment", "DJs and bands keep the party alive and the dance floor full."),
            ("Catering & Cakes", "Delight your guests with delicious food and stunning cakes."),
            ("Hair & Makeup", "Look and feel your best with experienced beauty professionals."),
            ("Officiants", "An officiant guides the ceremony and makes your union official."),
            ("Transportation", "Ensure safe, stylish transport for you and your guests."),
            ("Stationery & Attire", "Invitations set the tone and attire completes your wedding look."),
        ];

        for (name, description) in defaults {
            self.descriptions
                .insert(name.to_string(), description.to_string());
        }
    }

    /// Record a category seen on a vendor. Returns true when it is new.
    pub fn observe(&mut self, category: &str) -> bool {
        if self.contains(category) {
            return false;
        }
        self.order.push(category.to_string());
        true
    }

    /// Record a category brought in by a fresh submission. A new one is
    /// described as community submitted, even if it has a fixed description.
    pub fn introduce(&mut self, category: &str) -> bool {
        let is_new = self.observe(category);
        if is_new {
            self.descriptions
                .insert(category.to_string(), COMMUNITY_DESCRIPTION.to_string());
        }
        is_new
    }

    /// Exact-match membership ("All" is not a real category)
    pub fn contains(&self, category: &str) -> bool {
        self.order.iter().any(|c| c == category)
    }

    /// Category names with "All" prepended
    pub fn names(&self) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(self.order.iter().cloned())
            .collect()
    }

    /// Choices for the add-vendor form ("All" excluded)
    pub fn submission_categories(&self) -> &[String] {
        &self.order
    }

    pub fn describe(&self, category: &str) -> &str {
        if category == ALL {
            return ALL_DESCRIPTION;
        }
        self.descriptions
            .get(category)
            .map(String::as_str)
            .unwrap_or(COMMUNITY_DESCRIPTION)
    }

    /// Category cards, "All" first
    pub fn categories(&self) -> Vec<Category> {
        self.names()
            .into_iter()
            .map(|name| Category {
                description: self.describe(&name).to_string(),
                name,
            })
            .collect()
    }

    /// Count real categories
    pub fn count(&self) -> usize {
        self.order.len()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
