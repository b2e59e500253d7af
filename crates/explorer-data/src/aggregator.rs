//! Per-make aggregation of pickup listings.

use std::collections::BTreeMap;

use explorer_core::models::PickupListing;
use explorer_core::stats::{mean, median};

// ── MakeStats ─────────────────────────────────────────────────────────────────

/// Samples accumulated across a set of listings.
#[derive(Debug, Clone, Default)]
pub struct MakeStats {
    pub prices: Vec<f64>,
    pub days_listed: Vec<f64>,
    pub model_years: Vec<f64>,
}

impl MakeStats {
    /// Add a single listing's values to the samples.
    pub fn add_listing(&mut self, pickup: &PickupListing) {
        let listing = &pickup.listing;
        self.prices.push(listing.price as f64);
        self.model_years.push(f64::from(listing.model_year));
        if let Some(days) = listing.days_listed {
            self.days_listed.push(days as f64);
        }
    }

    fn merge(&mut self, other: &MakeStats) {
        self.prices.extend_from_slice(&other.prices);
        self.days_listed.extend_from_slice(&other.days_listed);
        self.model_years.extend_from_slice(&other.model_years);
    }

    pub fn count(&self) -> usize {
        self.prices.len()
    }

    pub fn median_price(&self) -> Option<f64> {
        median(&self.prices)
    }

    pub fn mean_price(&self) -> Option<f64> {
        mean(&self.prices)
    }

    pub fn median_days_listed(&self) -> Option<f64> {
        median(&self.days_listed)
    }

    pub fn median_model_year(&self) -> Option<f64> {
        median(&self.model_years)
    }
}

// ── MakeSummary ───────────────────────────────────────────────────────────────

/// All pickup listings of one make.
#[derive(Debug, Clone)]
pub struct MakeSummary {
    pub make: String,
    pub stats: MakeStats,
    /// Listing count per model name.
    pub models_seen: BTreeMap<String, usize>,
}

impl MakeSummary {
    fn new(make: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            stats: MakeStats::default(),
            models_seen: BTreeMap::new(),
        }
    }

    fn add_listing(&mut self, pickup: &PickupListing) {
        self.stats.add_listing(pickup);
        *self
            .models_seen
            .entry(pickup.listing.model.clone())
            .or_default() += 1;
    }

    /// The model name with the most listings, ties broken alphabetically.
    pub fn top_model(&self) -> Option<&str> {
        self.models_seen
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(model, _)| model.as_str())
    }
}

// ── MakeAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that groups pickups by make.
pub struct MakeAggregator;

impl MakeAggregator {
    /// One summary per make, largest make first, ties by name.
    pub fn summarize(pickups: &[PickupListing]) -> Vec<MakeSummary> {
        let mut map: BTreeMap<&str, MakeSummary> = BTreeMap::new();
        for pickup in pickups {
            map.entry(pickup.make.as_str())
                .or_insert_with(|| MakeSummary::new(pickup.make.as_str()))
                .add_listing(pickup);
        }

        let mut summaries: Vec<MakeSummary> = map.into_values().collect();
        // BTreeMap order already sorts by name; the stable sort keeps it for ties.
        summaries.sort_by(|a, b| b.stats.count().cmp(&a.stats.count()));
        summaries
    }

    /// Pool every make's samples into one [`MakeStats`].
    pub fn calculate_totals(summaries: &[MakeSummary]) -> MakeStats {
        let mut totals = MakeStats::default();
        for summary in summaries {
            totals.merge(&summary.stats);
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use explorer_core::models::Listing;
    use std::collections::BTreeMap as Map;

    fn pickup(model: &str, price: i64, year: i32, days: Option<i64>) -> PickupListing {
        PickupListing::new(Listing {
            line: 2,
            price,
            model_year: year,
            model: model.to_string(),
            condition: "good".to_string(),
            cylinders: 8,
            odometer: 100_000,
            paint_color: "white".to_string(),
            is_4wd: true,
            date_posted: NaiveDate::from_ymd_opt(2018, 8, 1).unwrap(),
            days_listed: days,
            extra: Map::new(),
        })
    }

    fn fleet() -> Vec<PickupListing> {
        vec![
            pickup("ford f-150", 10_000, 2010, Some(10)),
            pickup("ford f-250", 20_000, 2014, Some(30)),
            pickup("ford f-150", 30_000, 2016, None),
            pickup("ram 1500", 15_000, 2012, Some(40)),
            pickup("gmc sierra", 25_000, 2015, Some(5)),
        ]
    }

    // ── summarize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_orders_by_count_then_name() {
        let summaries = MakeAggregator::summarize(&fleet());
        let makes: Vec<&str> = summaries.iter().map(|s| s.make.as_str()).collect();
        assert_eq!(makes, vec!["ford", "gmc", "ram"]);
    }

    #[test]
    fn test_summarize_statistics() {
        let summaries = MakeAggregator::summarize(&fleet());
        let ford = &summaries[0];
        assert_eq!(ford.stats.count(), 3);
        assert_eq!(ford.stats.median_price(), Some(20_000.0));
        assert_eq!(ford.stats.mean_price(), Some(20_000.0));
        // The listing without days_listed is skipped.
        assert_eq!(ford.stats.median_days_listed(), Some(20.0));
        assert_eq!(ford.stats.median_model_year(), Some(2014.0));
        assert_eq!(ford.models_seen.get("ford f-150"), Some(&2));
        assert_eq!(ford.top_model(), Some("ford f-150"));
    }

    #[test]
    fn test_summarize_empty() {
        assert!(MakeAggregator::summarize(&[]).is_empty());
    }

    // ── calculate_totals ──────────────────────────────────────────────────────

    #[test]
    fn test_calculate_totals_pools_samples() {
        let summaries = MakeAggregator::summarize(&fleet());
        let totals = MakeAggregator::calculate_totals(&summaries);
        assert_eq!(totals.count(), 5);
        assert_eq!(totals.median_price(), Some(20_000.0));
        assert_eq!(totals.days_listed.len(), 4);
    }

    #[test]
    fn test_calculate_totals_empty() {
        let totals = MakeAggregator::calculate_totals(&[]);
        assert_eq!(totals.count(), 0);
        assert_eq!(totals.median_price(), None);
        assert_eq!(totals.mean_price(), None);
    }
}
