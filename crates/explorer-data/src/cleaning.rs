//! The listings cleaning pipeline.
//!
//! Every step takes the dataset by value and hands back a new one together
//! with the number of rows or values it touched. [`clean_listings`] runs the
//! steps in their fixed order and collects the counts into a
//! [`CleaningReport`].

use std::collections::HashSet;

use explorer_core::catalog::{
    GapPolicy, YearCorrection, PRICE_FLOOR, UNKNOWN_PAINT_COLOR, YEAR_CORRECTIONS,
};
use explorer_core::models::{normalize_model, Listing, RawListing};
use explorer_core::{ExplorerError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::imputation::{impute_grouped_median, ImputationOutcome, ImputationRule};

/// Knobs for a cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningOptions {
    pub price_floor: i64,
    pub gap_policy: GapPolicy,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            price_floor: PRICE_FLOOR,
            gap_policy: GapPolicy::default(),
        }
    }
}

/// Per-step counts of a cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_loaded: usize,
    pub below_price_floor: usize,
    pub corrections_applied: usize,
    pub models_renamed: usize,
    pub imputations: Vec<ImputationOutcome>,
    pub paint_colors_filled: usize,
    pub is_4wd_filled: usize,
    pub duplicates_removed: usize,
    pub rows_kept: usize,
}

impl CleaningReport {
    pub fn imputation(&self, field: &str) -> Option<&ImputationOutcome> {
        self.imputations.iter().find(|o| o.field == field)
    }

    /// Rows removed because an imputation group could not be resolved.
    pub fn rows_dropped_for_gaps(&self) -> usize {
        self.imputations.iter().map(|o| o.dropped).sum()
    }
}

/// Run the full pipeline over freshly loaded rows.
pub fn clean_listings(
    rows: Vec<RawListing>,
    options: &CleaningOptions,
) -> Result<(Vec<Listing>, CleaningReport)> {
    let mut report = CleaningReport {
        rows_loaded: rows.len(),
        ..Default::default()
    };

    let (rows, dropped) = drop_below_price_floor(rows, options.price_floor);
    report.below_price_floor = dropped;

    let (rows, corrected) = apply_year_corrections(rows, &YEAR_CORRECTIONS);
    report.corrections_applied = corrected;

    let (rows, renamed) = normalize_models(rows);
    report.models_renamed = renamed;

    let mut rows = rows;
    for rule in ImputationRule::pipeline() {
        let (imputed, outcome) = impute_grouped_median(rows, &rule, options.gap_policy)?;
        rows = imputed;
        report.imputations.push(outcome);
    }

    let (rows, filled) = fill_paint_color(rows);
    report.paint_colors_filled = filled;

    let (rows, filled) = fill_is_4wd(rows);
    report.is_4wd_filled = filled;

    let listings = normalize_types(rows)?;

    let (listings, removed) = deduplicate(listings);
    report.duplicates_removed = removed;
    report.rows_kept = listings.len();

    info!(
        "Cleaned {} listings down to {} ({} below price floor, {} duplicates, {} dropped for gaps)",
        report.rows_loaded,
        report.rows_kept,
        report.below_price_floor,
        report.duplicates_removed,
        report.rows_dropped_for_gaps()
    );

    Ok((listings, report))
}

// ── Steps ─────────────────────────────────────────────────────────────────────

/// Keep rows priced at or above `floor`.
pub fn drop_below_price_floor(rows: Vec<RawListing>, floor: i64) -> (Vec<RawListing>, usize) {
    let before = rows.len();
    let kept: Vec<RawListing> = rows.into_iter().filter(|r| r.price >= floor).collect();
    let dropped = before - kept.len();
    debug!("Price floor {}: {} -> {} rows", floor, before, kept.len());
    (kept, dropped)
}

/// Overwrite the model year of each listing matched by `corrections`.
///
/// Models are compared in hyphenated form so `ford f150` and `ford f-150`
/// identify the same listing. A correction that matches nothing is logged
/// at `warn!`.
pub fn apply_year_corrections(
    rows: Vec<RawListing>,
    corrections: &[YearCorrection],
) -> (Vec<RawListing>, usize) {
    let targets: Vec<(String, f64, i32)> = corrections
        .iter()
        .map(|c| (normalize_model(c.model), f64::from(c.listed_year), c.model_year))
        .collect();
    let mut hits = vec![0usize; targets.len()];

    let rows: Vec<RawListing> = rows
        .into_iter()
        .map(|mut row| {
            let model = normalize_model(&row.model);
            let hit = targets
                .iter()
                .position(|(m, listed, _)| *m == model && row.model_year == Some(*listed));
            if let Some(i) = hit {
                let year = targets[i].2;
                debug!(
                    "Correcting model year of line {} ({}): {:?} -> {}",
                    row.line, row.model, row.model_year, year
                );
                row.model_year = Some(f64::from(year));
                hits[i] += 1;
            }
            row
        })
        .collect();

    for (correction, _) in corrections.iter().zip(&hits).filter(|(_, n)| **n == 0) {
        warn!(
            "No listing matched the year correction for {} listed as {}",
            correction.model, correction.listed_year
        );
    }
    (rows, hits.iter().sum())
}

/// Hyphenate the Ford truck trims in every model name.
pub fn normalize_models(rows: Vec<RawListing>) -> (Vec<RawListing>, usize) {
    let mut renamed = 0;
    let rows = rows
        .into_iter()
        .map(|mut row| {
            let normalized = normalize_model(&row.model);
            if normalized != row.model {
                row.model = normalized;
                renamed += 1;
            }
            row
        })
        .collect();
    debug!("Normalized {} model names", renamed);
    (rows, renamed)
}

pub fn fill_paint_color(rows: Vec<RawListing>) -> (Vec<RawListing>, usize) {
    let mut filled = 0;
    let rows = rows
        .into_iter()
        .map(|mut row| {
            if row.paint_color.is_none() {
                row.paint_color = Some(UNKNOWN_PAINT_COLOR.to_string());
                filled += 1;
            }
            row
        })
        .collect();
    debug!("Filled {} missing paint colors", filled);
    (rows, filled)
}

pub fn fill_is_4wd(rows: Vec<RawListing>) -> (Vec<RawListing>, usize) {
    let mut filled = 0;
    let rows = rows
        .into_iter()
        .map(|mut row| {
            if row.is_4wd.is_none() {
                row.is_4wd = Some(false);
                filled += 1;
            }
            row
        })
        .collect();
    debug!("Filled {} missing 4wd flags", filled);
    (rows, filled)
}

/// Convert imputed rows into typed [`Listing`]s.
///
/// Fractional medians are truncated toward zero. A value still missing here
/// means an earlier step was skipped and is reported as a malformed row.
pub fn normalize_types(rows: Vec<RawListing>) -> Result<Vec<Listing>> {
    rows.into_iter()
        .map(|row| {
            let line = row.line;
            let model_year = row.model_year.ok_or_else(|| unfilled(line, "model_year"))?;
            let cylinders = row.cylinders.ok_or_else(|| unfilled(line, "cylinders"))?;
            let odometer = row.odometer.ok_or_else(|| unfilled(line, "odometer"))?;
            Ok(Listing {
                line,
                price: row.price,
                model_year: model_year.trunc() as i32,
                model: row.model,
                condition: row.condition,
                cylinders: cylinders.trunc() as i32,
                odometer: odometer.trunc() as i64,
                paint_color: row
                    .paint_color
                    .unwrap_or_else(|| UNKNOWN_PAINT_COLOR.to_string()),
                is_4wd: row.is_4wd.unwrap_or(false),
                date_posted: row.date_posted,
                days_listed: row.days_listed,
                extra: row.extra,
            })
        })
        .collect()
}

/// Keep the most recently posted listing per `(model_year, model, odometer)`.
///
/// Rows are stably sorted by posting date first, so among listings posted on
/// the same day the one that came last in the file wins. Survivors stay in
/// date order.
pub fn deduplicate(mut listings: Vec<Listing>) -> (Vec<Listing>, usize) {
    let before = listings.len();
    listings.sort_by_key(|l| l.date_posted);

    let mut seen: HashSet<(i32, String, i64)> = HashSet::with_capacity(before);
    let mut kept: Vec<Listing> = Vec::with_capacity(before);
    for listing in listings.into_iter().rev() {
        let (year, model, odometer) = listing.dedup_key();
        if seen.insert((year, model.to_string(), odometer)) {
            kept.push(listing);
        }
    }
    kept.reverse();

    let removed = before - kept.len();
    debug!("Removed {} duplicate listings", removed);
    (kept, removed)
}

fn unfilled(line: u64, column: &str) -> ExplorerError {
    ExplorerError::MalformedRow {
        line,
        column: column.to_string(),
        value: String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
