//! Grouped-median imputation.
//!
//! One operation, parameterized by [`ImputationRule`]: fill the missing
//! values of a numeric field with the median of that field among listings
//! that share a grouping key.

use std::collections::BTreeMap;

use explorer_core::catalog::{GapPolicy, ODOMETER_FALLBACK};
use explorer_core::models::RawListing;
use explorer_core::stats::median;
use explorer_core::{ExplorerError, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Group label used when the grouping key itself is missing.
const MISSING_KEY_LABEL: &str = "<missing>";

// ── Rule building blocks ──────────────────────────────────────────────────────

/// A numeric column that may be imputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    ModelYear,
    Cylinders,
    Odometer,
}

impl NumericField {
    pub fn name(&self) -> &'static str {
        match self {
            NumericField::ModelYear => "model_year",
            NumericField::Cylinders => "cylinders",
            NumericField::Odometer => "odometer",
        }
    }

    pub fn get(&self, listing: &RawListing) -> Option<f64> {
        match self {
            NumericField::ModelYear => listing.model_year,
            NumericField::Cylinders => listing.cylinders,
            NumericField::Odometer => listing.odometer,
        }
    }

    fn set(&self, listing: &mut RawListing, value: f64) {
        let slot = match self {
            NumericField::ModelYear => &mut listing.model_year,
            NumericField::Cylinders => &mut listing.cylinders,
            NumericField::Odometer => &mut listing.odometer,
        };
        *slot = Some(value);
    }
}

/// The column whose value defines a peer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Model,
    ModelYear,
}

impl GroupKey {
    pub fn name(&self) -> &'static str {
        match self {
            GroupKey::Model => "model",
            GroupKey::ModelYear => "model_year",
        }
    }

    /// The group a listing belongs to, `None` when the key column is blank.
    ///
    /// Model years are keyed by their exact value, so an imputed `2010.5`
    /// forms its own group rather than joining `2010`.
    pub fn key_of(&self, listing: &RawListing) -> Option<String> {
        match self {
            GroupKey::Model => Some(listing.model.clone()),
            GroupKey::ModelYear => listing.model_year.map(|y| y.to_string()),
        }
    }
}

/// What happens to a missing value whose group has no known values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GapFallback {
    /// Substitute a fixed value.
    Constant(f64),
    /// No sensible default exists; defer to the [`GapPolicy`].
    Unresolved,
}

/// `fill missing <field> using median of <field> grouped by <key>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImputationRule {
    pub field: NumericField,
    pub key: GroupKey,
    pub fallback: GapFallback,
}

impl ImputationRule {
    pub const MODEL_YEAR_BY_MODEL: ImputationRule = ImputationRule {
        field: NumericField::ModelYear,
        key: GroupKey::Model,
        fallback: GapFallback::Unresolved,
    };

    pub const CYLINDERS_BY_MODEL: ImputationRule = ImputationRule {
        field: NumericField::Cylinders,
        key: GroupKey::Model,
        fallback: GapFallback::Unresolved,
    };

    pub const ODOMETER_BY_MODEL_YEAR: ImputationRule = ImputationRule {
        field: NumericField::Odometer,
        key: GroupKey::ModelYear,
        fallback: GapFallback::Constant(ODOMETER_FALLBACK),
    };

    /// The three rules of the cleaning pipeline, in the order they run.
    pub fn pipeline() -> [ImputationRule; 3] {
        [
            Self::MODEL_YEAR_BY_MODEL,
            Self::CYLINDERS_BY_MODEL,
            Self::ODOMETER_BY_MODEL_YEAR,
        ]
    }
}

/// Counts produced by one imputation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImputationOutcome {
    pub field: String,
    pub key: String,
    /// Values filled from a group median.
    pub filled: usize,
    /// Values filled from the rule's constant fallback.
    pub fell_back: usize,
    /// Rows removed because their group could not be resolved.
    pub dropped: usize,
}

// ── Imputation ────────────────────────────────────────────────────────────────

/// Apply `rule` to `rows` and return the imputed rows.
///
/// Medians are computed from the known values only, once, before any value
/// is filled. Missing values in groups with no known values take the rule's
/// constant fallback if it has one; otherwise `policy` decides between
/// failing with [`ExplorerError::ImputationGap`] (first group in sorted
/// order) and dropping the affected rows.
pub fn impute_grouped_median(
    rows: Vec<RawListing>,
    rule: &ImputationRule,
    policy: GapPolicy,
) -> Result<(Vec<RawListing>, ImputationOutcome)> {
    let field = rule.field;
    let group_medians = group_medians(&rows, rule);

    let mut outcome = ImputationOutcome {
        field: field.name().to_string(),
        key: rule.key.name().to_string(),
        ..Default::default()
    };

    // Groups with missing values and no median, with their row counts.
    let mut unresolved: BTreeMap<String, usize> = BTreeMap::new();
    if rule.fallback == GapFallback::Unresolved {
        for row in rows.iter().filter(|r| field.get(r).is_none()) {
            let key = rule.key.key_of(row);
            if lookup(&group_medians, key.as_deref()).is_none() {
                let label = key.unwrap_or_else(|| MISSING_KEY_LABEL.to_string());
                *unresolved.entry(label).or_default() += 1;
            }
        }
    }

    if let Some((group, count)) = unresolved.iter().next() {
        if policy == GapPolicy::Fail {
            return Err(ExplorerError::ImputationGap {
                field: field.name().to_string(),
                key: rule.key.name().to_string(),
                group: group.clone(),
                rows: *count,
            });
        }
        warn!(
            "Dropping {} rows: no known {} for {} group(s) by {}",
            unresolved.values().sum::<usize>(),
            field.name(),
            unresolved.len(),
            rule.key.name()
        );
    }

    let mut imputed = Vec::with_capacity(rows.len());
    for mut row in rows {
        if field.get(&row).is_some() {
            imputed.push(row);
            continue;
        }
        let key = rule.key.key_of(&row);
        match (lookup(&group_medians, key.as_deref()), rule.fallback) {
            (Some(value), _) => {
                field.set(&mut row, value);
                outcome.filled += 1;
            }
            (None, GapFallback::Constant(value)) => {
                field.set(&mut row, value);
                outcome.fell_back += 1;
            }
            (None, GapFallback::Unresolved) => {
                outcome.dropped += 1;
                continue;
            }
        }
        imputed.push(row);
    }

    debug!(
        "Imputed {} by {}: {} from medians, {} from fallback, {} dropped",
        outcome.field, outcome.key, outcome.filled, outcome.fell_back, outcome.dropped
    );

    Ok((imputed, outcome))
}

/// Median of the known values of `rule.field` per group.
fn group_medians(rows: &[RawListing], rule: &ImputationRule) -> BTreeMap<String, f64> {
    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let (Some(key), Some(value)) = (rule.key.key_of(row), rule.field.get(row)) {
            samples.entry(key).or_default().push(value);
        }
    }
    samples
        .into_iter()
        .filter_map(|(key, values)| median(&values).map(|m| (key, m)))
        .collect()
}

fn lookup(medians: &BTreeMap<String, f64>, key: Option<&str>) -> Option<f64> {
    key.and_then(|k| medians.get(k).copied())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
