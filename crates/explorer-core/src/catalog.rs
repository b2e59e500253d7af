use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── Cleaning constants ────────────────────────────────────────────────────────

/// Prices below this are placeholder or data-entry errors and are dropped.
pub const PRICE_FLOOR: i64 = 500;

/// Category written into blank `paint_color` cells.
pub const UNKNOWN_PAINT_COLOR: &str = "unknown";

/// Odometer value used when no other listing shares the model year.
pub const ODOMETER_FALLBACK: f64 = 0.0;

// ── Pickup catalog ────────────────────────────────────────────────────────────

/// "make model" strings that identify a pickup truck listing.
///
/// Matched against the hyphenated model name, so the Ford trims are spelled
/// `f-150` here.
pub const PICKUP_MODELS: [&str; 14] = [
    "ford f-150",
    "ford f-250",
    "ford f-350",
    "ford ranger",
    "toyota tacoma",
    "toyota tundra",
    "chevrolet colorado",
    "chevrolet silverado",
    "ram 1500",
    "ram 2500",
    "ram 3500",
    "gmc sierra",
    "nissan frontier",
    "dodge dakota",
];

/// The three makes with the most pickup listings.
pub const MAJOR_MAKES: [&str; 3] = ["ford", "chevrolet", "ram"];

/// Three smaller makes compared on their own chart.
pub const MINOR_MAKES: [&str; 3] = ["toyota", "gmc", "nissan"];

/// Default cutoff applied to the major-makes price chart when toggled on.
pub const DEFAULT_PRICE_CUTOFF: i64 = 100_000;

/// Default fixed cutoff for the minor-makes price chart.
pub const DEFAULT_MINOR_PRICE_CUTOFF: i64 = 60_000;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 40;

/// Model-year window of the price-vs-year scatter chart.
pub const SCATTER_YEAR_RANGE: (i32, i32) = (1990, 2019);

/// Price window of the price-vs-year scatter chart.
pub const SCATTER_PRICE_RANGE: (i64, i64) = (PRICE_FLOOR, 100_000);

/// How a model string is compared with [`PICKUP_MODELS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Plain substring containment. Can over-match (`"ram 15000"`); kept as
    /// the default because that is how the dataset was always filtered.
    #[default]
    Substring,
    /// The catalog entry must start and end on word boundaries.
    Token,
}

impl FromStr for MatchMode {
    type Err = ExplorerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "token" => Ok(MatchMode::Token),
            other => Err(ExplorerError::Config(format!("unknown match mode: {other}"))),
        }
    }
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Substring => "substring",
            MatchMode::Token => "token",
        }
    }
}

/// What to do with a group whose median cannot be computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// Abort the run with [`ExplorerError::ImputationGap`].
    #[default]
    Fail,
    /// Drop the affected rows and keep going.
    Drop,
}

impl FromStr for GapPolicy {
    type Err = ExplorerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "fail" => Ok(GapPolicy::Fail),
            "drop" => Ok(GapPolicy::Drop),
            other => Err(ExplorerError::Config(format!(
                "unknown imputation gap policy: {other}"
            ))),
        }
    }
}

impl GapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapPolicy::Fail => "fail",
            GapPolicy::Drop => "drop",
        }
    }
}

// ── Hand-verified corrections ─────────────────────────────────────────────────

/// A listing whose model year was checked by hand and found to be wrong.
///
/// The dataset has no vehicle id, so a listing is identified by its model
/// together with the impossible year it was posted with. The model is
/// compared in hyphenated form on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCorrection {
    pub model: &'static str,
    /// Model year as it appears in the input.
    pub listed_year: i32,
    /// Verified replacement.
    pub model_year: i32,
}

/// Listings with a known-bad model year and the verified replacement.
pub const YEAR_CORRECTIONS: [YearCorrection; 3] = [
    YearCorrection {
        model: "cadillac escalade",
        listed_year: 1908,
        model_year: 2008,
    },
    YearCorrection {
        model: "gmc yukon",
        listed_year: 1908,
        model_year: 2008,
    },
    // the f-series starts in 1948
    YearCorrection {
        model: "ford f150",
        listed_year: 1929,
        model_year: 1958,
    },
];
