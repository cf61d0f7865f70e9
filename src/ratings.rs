// ⭐ Rating Ledger - per-vendor star history
//
// vendor name → every rating ever given, in order. Histories only grow;
// the average is recomputed from the full history on each call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::{DirectoryError, Result};
use crate::store::{keys, load_json, save_json, Store};

/// A single rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Star(u8);

impl Star {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Star {
    type Error = DirectoryError;

    fn try_from(value: i64) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Star(value as u8))
        } else {
            Err(DirectoryError::InvalidRating(value))
        }
    }
}

impl From<Star> for i64 {
    fn from(star: Star) -> Self {
        i64::from(star.0)
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingLedger {
    ratings: BTreeMap<String, Vec<Star>>,
}

impl RatingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the ledger, vendor by vendor.
    ///
    /// Only an unreadable blob as a whole loads as empty. Stored values that
    /// are not stars (or histories that are not lists) are dropped with a
    /// warning; every valid rating is kept.
    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let Some(entries) = load_json::<BTreeMap<String, Value>, _>(store, keys::RATINGS)?
            .or_empty(keys::RATINGS)
        else {
            return Ok(RatingLedger::new());
        };

        let ratings = entries
            .into_iter()
            .filter_map(|(vendor, history)| {
                let Value::Array(values) = history else {
                    warn!(%vendor, "skipping stored rating history that is not a list");
                    return None;
                };
                let stars = values
                    .into_iter()
                    .filter_map(|value| match serde_json::from_value::<Star>(value) {
                        Ok(star) => Some(star),
                        Err(e) => {
                            warn!(%vendor, error = %e, "skipping stored rating");
                            None
                        }
                    })
                    .collect();
                Some((vendor, stars))
            })
            .collect();

        Ok(RatingLedger { ratings })
    }

    /// Append one rating to a vendor's history and persist the ledger
    pub fn record<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        vendor_name: &str,
        star: Star,
    ) -> Result<()> {
        let mut next = self.ratings.clone();
        next.entry(vendor_name.to_string()).or_default().push(star);
        save_json(store, keys::RATINGS, &next)?;
        self.ratings = next;

        info!(vendor = %vendor_name, stars = star.value(), "rating recorded");
        Ok(())
    }

    /// Validate a raw value first; out-of-range values never touch the ledger
    pub fn record_raw<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        vendor_name: &str,
        value: i64,
    ) -> Result<()> {
        let star = Star::try_from(value).map_err(|e| {
            warn!(vendor = %vendor_name, value, "rejected out-of-range rating");
            e
        })?;
        self.record(store, vendor_name, star)
    }

    pub fn history(&self, vendor_name: &str) -> &[Star] {
        self.ratings
            .get(vendor_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mean of all ratings, 0.0 when none are recorded
    pub fn average(&self, vendor_name: &str) -> f64 {
        let history = self.history(vendor_name);
        if history.is_empty() {
            return 0.0;
        }
        let sum: u32 = history.iter().map(|s| u32::from(s.value())).sum();
        f64::from(sum) / history.len() as f64
    }

    pub fn count(&self, vendor_name: &str) -> usize {
        self.history(vendor_name).len()
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

/// Average rounded to the nearest half star (display only)
pub fn display_rating(average: f64) -> f64 {
    (average * 2.0).round() / 2.0
}

/// Five-glyph star strip for vendor cards
pub fn star_glyphs(average: f64) -> String {
    let rounded = display_rating(average);
    (1..=5)
        .map(|i| if rounded >= f64::from(i) { '★' } else { '☆' })
        .collect()
}

/// Stars lit on the click-to-rate widget
pub fn interactive_level(average: f64) -> u8 {
    average.round().clamp(0.0, 5.0) as u8
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn star(value: i64) -> Star {
        Star::try_from(value).unwrap()
    }

    #[test]
    fn test_star_bounds() {
        assert!(Star::try_from(1).is_ok());
        assert!(Star::try_from(5).is_ok());
        assert!(matches!(
            Star::try_from(0),
            Err(DirectoryError::InvalidRating(0))
        ));
        assert!(matches!(
            Star::try_from(6),
            Err(DirectoryError::InvalidRating(6))
        ));
    }

    #[test]
    fn test_average_of_five_three_four() {
        let mut store = MemoryStore::new();
        let mut ledger = RatingLedger::load(&store).unwrap();

        for value in [5, 3, 4] {
            ledger.record(&mut store, "X", star(value)).unwrap();
        }

        assert_eq!(ledger.average("X"), 4.0);
        assert_eq!(RatingLedger::load(&store).unwrap().average("X"), 4.0);
    }

    #[test]
    fn test_average_without_ratings_is_zero() {
        let ledger = RatingLedger::new();
        assert_eq!(ledger.average("nobody"), 0.0);
        assert_eq!(ledger.count("nobody"), 0);
    }

    #[test]
    fn test_history_keeps_order() {
        let mut store = MemoryStore::new();
        let mut ledger = RatingLedger::new();
        ledger.record(&mut store, "X", star(2)).unwrap();
        ledger.record(&mut store, "X", star(5)).unwrap();
        ledger.record(&mut store, "Y", star(1)).unwrap();

        let values: Vec<u8> = ledger.history("X").iter().map(|s| s.value()).collect();
        assert_eq!(values, vec![2, 5]);
        assert_eq!(ledger.count("Y"), 1);
    }

    #[test]
    fn test_out_of_range_rating_not_recorded() {
        let mut store = MemoryStore::new();
        let mut ledger = RatingLedger::new();

        let err = ledger.record_raw(&mut store, "X", 7).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidRating(7)));
        assert_eq!(ledger.count("X"), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_persisted_as_plain_integers() {
        let mut store = MemoryStore::new();
        let mut ledger = RatingLedger::new();
        ledger.record_raw(&mut store, "X", 4).unwrap();

        assert_eq!(
            store.get(keys::RATINGS).unwrap().as_deref(),
            Some(r#"{"X":[4]}"#)
        );
    }

    #[test]
    fn test_bad_stored_rating_keeps_other_histories() {
        let mut store = MemoryStore::new();
        store
            .set(keys::RATINGS, r#"{"X":[5,5,4],"Y":[0],"Z":"oops"}"#)
            .unwrap();

        let mut ledger = RatingLedger::load(&store).unwrap();
        assert_eq!(ledger.count("X"), 3);
        assert_eq!(ledger.count("Y"), 0);

        ledger.record_raw(&mut store, "X", 3).unwrap();
        let reloaded = RatingLedger::load(&store).unwrap();
        let values: Vec<u8> = reloaded.history("X").iter().map(|s| s.value()).collect();
        assert_eq!(values, vec![5, 5, 4, 3]);
        assert_eq!(reloaded.average("X"), 4.25);
    }

    #[test]
    fn test_unreadable_ledger_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(keys::RATINGS, "{not json").unwrap();

        let mut ledger = RatingLedger::load(&store).unwrap();
        assert_eq!(ledger.average("X"), 0.0);

        ledger.record_raw(&mut store, "X", 3).unwrap();
        assert_eq!(RatingLedger::load(&store).unwrap().average("X"), 3.0);
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(display_rating(0.0), 0.0);
        assert_eq!(display_rating(3.24), 3.0);
        assert_eq!(display_rating(3.25), 3.5);
        assert_eq!(display_rating(3.8), 4.0);
    }

    #[test]
    fn test_star_glyphs() {
        assert_eq!(star_glyphs(0.0), "☆☆☆☆☆");
        assert_eq!(star_glyphs(4.0), "★★★★☆");
        assert_eq!(star_glyphs(3.5), "★★★☆☆");
        assert_eq!(star_glyphs(4.9), "★★★★★");
    }

    #[test]
    fn test_interactive_level() {
        assert_eq!(interactive_level(0.0), 0);
        assert_eq!(interactive_level(3.5), 4);
        assert_eq!(interactive_level(3.4), 3);
    }
}
