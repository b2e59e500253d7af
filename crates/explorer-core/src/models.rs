use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single advertisement as loaded from the listings CSV, before cleaning.
///
/// Numeric columns that may be blank are kept as `Option<f64>`: the source
/// writes them as floats (`2011.0`) and imputed medians can be fractional
/// until the pipeline normalizes types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    /// 1-based line number in the source file (header is line 1).
    pub line: u64,
    /// Advertised price in US dollars.
    pub price: i64,
    /// Model year, if given.
    pub model_year: Option<f64>,
    /// Free-text "make model" string, e.g. `"ford f150"`.
    pub model: String,
    /// Condition category (`"good"`, `"like new"`, ...).
    pub condition: String,
    /// Engine cylinder count, if given.
    pub cylinders: Option<f64>,
    /// Odometer reading in miles, if given.
    pub odometer: Option<f64>,
    /// Paint colour category, if given.
    pub paint_color: Option<String>,
    /// Four-wheel-drive flag, if given.
    pub is_4wd: Option<bool>,
    /// Date the ad was posted.
    pub date_posted: NaiveDate,
    /// Days the ad stayed up, when the source has the column.
    pub days_listed: Option<i64>,
    /// Every other column, keyed by header name.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// A cleaned advertisement: every imputed field is present and integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub line: u64,
    pub price: i64,
    pub model_year: i32,
    pub model: String,
    pub condition: String,
    pub cylinders: i32,
    pub odometer: i64,
    pub paint_color: String,
    pub is_4wd: bool,
    pub date_posted: NaiveDate,
    pub days_listed: Option<i64>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Listing {
    /// The triple used to recognise re-posted ads for the same vehicle.
    pub fn dedup_key(&self) -> (i32, &str, i64) {
        (self.model_year, self.model.as_str(), self.odometer)
    }
}

/// A cleaned listing that matched the pickup catalog, plus its make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupListing {
    #[serde(flatten)]
    pub listing: Listing,
    /// Manufacturer, the first word of `model`.
    pub make: String,
}

impl PickupListing {
    pub fn new(listing: Listing) -> Self {
        let make = derive_make(&listing.model).to_string();
        Self { listing, make }
    }
}

/// Unhyphenated Ford truck trims and their canonical spelling.
pub const TRUCK_TRIM_SPELLINGS: [(&str, &str); 3] =
    [("f150", "f-150"), ("f250", "f-250"), ("f350", "f-350")];

/// Rewrite unhyphenated Ford truck trims to their hyphenated form.
///
/// Plain substring replacement, so it also rewrites the trims when they are
/// glued to other text. Idempotent: `f-150` contains no `f150`.
///
/// # Examples
///
/// ```
/// use explorer_core::models::normalize_model;
///
/// assert_eq!(normalize_model("ford f150"), "ford f-150");
/// assert_eq!(normalize_model("ford f-250 sd"), "ford f-250 sd");
/// assert_eq!(normalize_model("honda civic"), "honda civic");
/// ```
pub fn normalize_model(model: &str) -> String {
    let mut normalized = model.to_string();
    for (raw, hyphenated) in TRUCK_TRIM_SPELLINGS {
        if normalized.contains(raw) {
            normalized = normalized.replace(raw, hyphenated);
        }
    }
    normalized
}

/// Fallback make for model strings that are blank.
pub const UNKNOWN_MAKE: &str = "unknown";

/// Return the manufacturer part of a "make model" string.
///
/// The make is everything before the first whitespace. A single-word model
/// is its own make, and a blank model yields [`UNKNOWN_MAKE`].
///
/// # Examples
///
/// ```
/// use explorer_core::models::derive_make;
///
/// assert_eq!(derive_make("ford f-150"), "ford");
/// assert_eq!(derive_make("chevrolet silverado 1500 crew"), "chevrolet");
/// assert_eq!(derive_make("tacoma"), "tacoma");
/// assert_eq!(derive_make("   "), "unknown");
/// ```
pub fn derive_make(model: &str) -> &str {
    model.split_whitespace().next().unwrap_or(UNKNOWN_MAKE)
}
