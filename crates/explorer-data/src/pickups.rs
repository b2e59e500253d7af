//! Pickup-truck selection.

use explorer_core::catalog::{MatchMode, PICKUP_MODELS};
use explorer_core::models::{Listing, PickupListing};
use explorer_core::{ExplorerError, Result};
use regex::Regex;
use tracing::debug;

/// Decides whether a model string names one of the catalog pickups.
#[derive(Debug, Clone)]
pub struct PickupMatcher {
    mode: MatchMode,
    token_pattern: Option<Regex>,
}

impl PickupMatcher {
    pub fn new(mode: MatchMode) -> Result<Self> {
        let token_pattern = match mode {
            MatchMode::Substring => None,
            MatchMode::Token => {
                let alternatives: Vec<String> =
                    PICKUP_MODELS.iter().map(|m| regex::escape(m)).collect();
                let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
                let regex = Regex::new(&pattern).map_err(|e| {
                    ExplorerError::Config(format!("invalid pickup pattern: {e}"))
                })?;
                Some(regex)
            }
        };
        Ok(Self {
            mode,
            token_pattern,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// `true` when `model` contains any catalog entry.
    ///
    /// Case-sensitive. In token mode the entry must also start and end on a
    /// word boundary, so `ford f-1500` does not count as `ford f-150`.
    pub fn is_pickup(&self, model: &str) -> bool {
        match &self.token_pattern {
            Some(regex) => regex.is_match(model),
            None => PICKUP_MODELS.iter().any(|m| model.contains(m)),
        }
    }
}

/// Keep the pickup listings and attach their make.
pub fn select_pickups(listings: &[Listing], mode: MatchMode) -> Result<Vec<PickupListing>> {
    let matcher = PickupMatcher::new(mode)?;
    let pickups: Vec<PickupListing> = listings
        .iter()
        .filter(|l| matcher.is_pickup(&l.model))
        .cloned()
        .map(PickupListing::new)
        .collect();
    debug!(
        "Selected {} pickups out of {} listings ({} matching)",
        pickups.len(),
        listings.len(),
        mode.as_str()
    );
    Ok(pickups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn listing(model: &str) -> Listing {
        Listing {
            line: 2,
            price: 10_000,
            model_year: 2012,
            model: model.to_string(),
            condition: "good".to_string(),
            cylinders: 6,
            odometer: 120_000,
            paint_color: "red".to_string(),
            is_4wd: false,
            date_posted: NaiveDate::from_ymd_opt(2018, 10, 1).unwrap(),
            days_listed: Some(5),
            extra: BTreeMap::new(),
        }
    }

    // ── Substring mode ────────────────────────────────────────────────────────

    #[test]
    fn test_substring_matches_catalog_and_trims() {
        let matcher = PickupMatcher::new(MatchMode::Substring).unwrap();
        assert!(matcher.is_pickup("ford f-150"));
        assert!(matcher.is_pickup("ford f-150 xlt"));
        assert!(matcher.is_pickup("chevrolet silverado 1500 crew"));
        assert!(!matcher.is_pickup("honda civic"));
        assert!(!matcher.is_pickup("ford f150"));
    }

    #[test]
    fn test_substring_over_matches() {
        let matcher = PickupMatcher::new(MatchMode::Substring).unwrap();
        assert!(matcher.is_pickup("ford f-1500"));
        assert!(matcher.is_pickup("ram 15000"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let matcher = PickupMatcher::new(MatchMode::Substring).unwrap();
        assert!(!matcher.is_pickup("Ford F-150"));
    }

    // ── Token mode ────────────────────────────────────────────────────────────

    #[test]
    fn test_token_rejects_glued_digits() {
        let matcher = PickupMatcher::new(MatchMode::Token).unwrap();
        assert_eq!(matcher.mode(), MatchMode::Token);
        assert!(matcher.is_pickup("ford f-150"));
        assert!(matcher.is_pickup("ford f-150 xlt"));
        assert!(!matcher.is_pickup("ford f-1500"));
        assert!(!matcher.is_pickup("ram 15000"));
    }

    // ── select_pickups ────────────────────────────────────────────────────────

    #[test]
    fn test_select_pickups_derives_make() {
        let listings = vec![
            listing("ford f-150"),
            listing("honda civic"),
            listing("ram 2500"),
            listing("nissan frontier crew cab sv"),
        ];
        let pickups = select_pickups(&listings, MatchMode::Substring).unwrap();
        let makes: Vec<&str> = pickups.iter().map(|p| p.make.as_str()).collect();
        assert_eq!(makes, vec!["ford", "ram", "nissan"]);
    }

    #[test]
    fn test_select_pickups_empty() {
        let pickups = select_pickups(&[], MatchMode::Token).unwrap();
        assert!(pickups.is_empty());
    }
}
