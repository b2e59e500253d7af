//! Chart inputs derived from the pickup subset.
//!
//! Everything here is a pure function of its arguments; the dashboard calls
//! these on every frame with the current control state.

use explorer_core::catalog::{SCATTER_PRICE_RANGE, SCATTER_YEAR_RANGE};
use explorer_core::models::PickupListing;
use explorer_core::stats::{histogram, value_range, Bin};

use crate::aggregator::MakeAggregator;

/// Bins of one make in an overlaid histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub make: String,
    pub bins: Vec<Bin>,
}

impl HistogramSeries {
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Several makes counted over shared bins.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramView {
    pub series: Vec<HistogramSeries>,
    /// `(min, max)` of the binned values.
    pub range: (f64, f64),
}

impl HistogramView {
    /// Tallest bar across all series.
    pub fn max_count(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|s| s.bins.iter().map(|b| b.count))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.total() == 0)
    }
}

/// Points of one make.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub make: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterView {
    pub series: Vec<Series>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl ScatterView {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Inclusive window of the price-vs-year scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterBounds {
    pub min_year: i32,
    pub max_year: i32,
    pub min_price: i64,
    pub max_price: i64,
}

impl Default for ScatterBounds {
    fn default() -> Self {
        Self {
            min_year: SCATTER_YEAR_RANGE.0,
            max_year: SCATTER_YEAR_RANGE.1,
            min_price: SCATTER_PRICE_RANGE.0,
            max_price: SCATTER_PRICE_RANGE.1,
        }
    }
}

impl ScatterBounds {
    pub fn contains(&self, year: i32, price: i64) -> bool {
        (self.min_year..=self.max_year).contains(&year)
            && (self.min_price..=self.max_price).contains(&price)
    }
}

// ── Filters ───────────────────────────────────────────────────────────────────

/// Pickups whose make is one of `makes`.
pub fn by_makes<'a>(pickups: &'a [PickupListing], makes: &[&str]) -> Vec<&'a PickupListing> {
    pickups
        .iter()
        .filter(|p| makes.contains(&p.make.as_str()))
        .collect()
}

// ── Histograms ────────────────────────────────────────────────────────────────

/// Price distribution of `makes`, one series each, in the order given.
///
/// With a cutoff only listings priced strictly below it are counted.
pub fn price_histogram(
    pickups: &[PickupListing],
    makes: &[&str],
    cutoff: Option<i64>,
    bins: usize,
) -> HistogramView {
    let within_cutoff = |p: &PickupListing| cutoff.map_or(true, |c| p.listing.price < c);
    overlay(pickups, makes, bins, |p| {
        within_cutoff(p).then_some(p.listing.price as f64)
    })
}

/// Days-listed distribution of `makes`; listings without the column are skipped.
pub fn days_listed_histogram(
    pickups: &[PickupListing],
    makes: &[&str],
    bins: usize,
) -> HistogramView {
    overlay(pickups, makes, bins, |p| p.listing.days_listed.map(|d| d as f64))
}

fn overlay(
    pickups: &[PickupListing],
    makes: &[&str],
    bins: usize,
    value: impl Fn(&PickupListing) -> Option<f64>,
) -> HistogramView {
    let selected = by_makes(pickups, makes);
    let samples: Vec<(&str, Vec<f64>)> = makes
        .iter()
        .map(|make| {
            let values = selected
                .iter()
                .copied()
                .filter(|p| p.make == *make)
                .filter_map(&value)
                .collect();
            (*make, values)
        })
        .collect();

    let all: Vec<f64> = samples.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let range = value_range(&all).unwrap_or((0.0, 1.0));

    let series = samples
        .into_iter()
        .map(|(make, values)| HistogramSeries {
            make: make.to_string(),
            bins: histogram(&values, bins, range),
        })
        .collect();

    HistogramView { series, range }
}

// ── Scatters ──────────────────────────────────────────────────────────────────

/// `(model_year, price)` per make inside `bounds`.
///
/// The axes span the bounds themselves so the window stays fixed.
pub fn price_by_year(pickups: &[PickupListing], bounds: &ScatterBounds) -> ScatterView {
    let series = scatter(pickups, |p| {
        let l = &p.listing;
        bounds
            .contains(l.model_year, l.price)
            .then_some((f64::from(l.model_year), l.price as f64))
    });
    ScatterView {
        series,
        x_range: (f64::from(bounds.min_year), f64::from(bounds.max_year)),
        y_range: (bounds.min_price as f64, bounds.max_price as f64),
    }
}

/// `(days_listed, price)` per make, axes fitted to the data.
pub fn price_vs_days(pickups: &[PickupListing]) -> ScatterView {
    let series = scatter(pickups, |p| {
        p.listing
            .days_listed
            .map(|d| (d as f64, p.listing.price as f64))
    });
    let xs: Vec<f64> = series.iter().flat_map(|s| s.points.iter().map(|p| p.0)).collect();
    let ys: Vec<f64> = series.iter().flat_map(|s| s.points.iter().map(|p| p.1)).collect();
    ScatterView {
        series,
        x_range: value_range(&xs).unwrap_or((0.0, 1.0)),
        y_range: value_range(&ys).unwrap_or((0.0, 1.0)),
    }
}

/// Group points by make, largest make first. Makes with no points are left out.
fn scatter(
    pickups: &[PickupListing],
    point: impl Fn(&PickupListing) -> Option<(f64, f64)>,
) -> Vec<Series> {
    MakeAggregator::summarize(pickups)
        .into_iter()
        .map(|summary| Series {
            points: pickups
                .iter()
                .filter(|p| p.make == summary.make)
                .filter_map(&point)
                .collect(),
            make: summary.make,
        })
        .filter(|s| !s.points.is_empty())
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
