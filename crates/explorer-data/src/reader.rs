//! CSV loading for the listings dataset.
//!
//! Reads `vehicles_us.csv`-shaped files into [`RawListing`] records. Loading
//! is strict: a missing required column or an unparseable field aborts the
//! run instead of silently skipping the row.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use explorer_core::models::RawListing;
use explorer_core::{ExplorerError, Result};
use tracing::{debug, info};

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "price",
    "model_year",
    "model",
    "condition",
    "cylinders",
    "odometer",
    "paint_color",
    "is_4wd",
    "date_posted",
];

/// Optional column used by the days-listed charts.
pub const DAYS_LISTED_COLUMN: &str = "days_listed";

/// Cell contents treated as a missing value (compared case-insensitively).
const MISSING_TOKENS: [&str; 5] = ["", "nan", "na", "null", "none"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Open `path` and parse every row into a [`RawListing`].
pub fn load_listings(path: &Path) -> Result<Vec<RawListing>> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExplorerError::DataFileNotFound(path.to_path_buf()),
        _ => ExplorerError::FileRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let listings = read_listings(file, path)?;
    info!("Loaded {} listings from {}", listings.len(), path.display());
    Ok(listings)
}

/// Parse listings from any reader. `source` is only used in error messages.
pub fn read_listings<R: Read>(input: R, source: &Path) -> Result<Vec<RawListing>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers, source)?;

    let mut listings = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // Header is line 1; fall back to the row index when the reader has
        // no position (it always does for file input).
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        listings.push(parse_record(&record, &columns, line)?);
    }

    debug!(
        "Parsed {} rows ({} passthrough columns) from {}",
        listings.len(),
        columns.extra.len(),
        source.display()
    );

    Ok(listings)
}

// ── Column resolution ─────────────────────────────────────────────────────────

/// Header name → field index for the columns the pipeline knows about.
#[derive(Debug)]
struct ColumnMap {
    known: HashMap<&'static str, usize>,
    days_listed: Option<usize>,
    extra: Vec<(String, usize)>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, source: &Path) -> Result<Self> {
        let by_name: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !by_name.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ExplorerError::MissingColumns {
                path: source.to_path_buf(),
                columns: missing,
            });
        }

        let known = REQUIRED_COLUMNS
            .iter()
            .filter_map(|c| by_name.get(*c).map(|&i| (*c, i)))
            .collect();
        let days_listed = by_name.get(DAYS_LISTED_COLUMN).copied();

        let mut extra: Vec<(String, usize)> = by_name
            .into_iter()
            .filter(|(name, _)| {
                name != DAYS_LISTED_COLUMN && !REQUIRED_COLUMNS.contains(&name.as_str())
            })
            .collect();
        extra.sort_by_key(|(_, i)| *i);

        Ok(Self {
            known,
            days_listed,
            extra,
        })
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &'static str) -> &'r str {
        self.known
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }
}

// ── Row parsing ───────────────────────────────────────────────────────────────

fn parse_record(record: &StringRecord, columns: &ColumnMap, line: u64) -> Result<RawListing> {
    let field = |column: &'static str| columns.get(record, column);

    let price = parse_whole_number(field("price"), "price", line)?
        .ok_or_else(|| malformed(line, "price", field("price")))?;

    let model = field("model");
    if is_missing(model) {
        return Err(malformed(line, "model", model));
    }

    let days_listed = match columns.days_listed.and_then(|i| record.get(i)) {
        Some(raw) => parse_whole_number(raw, DAYS_LISTED_COLUMN, line)?,
        None => None,
    };

    let extra: BTreeMap<String, String> = columns
        .extra
        .iter()
        .filter_map(|(name, i)| record.get(*i).map(|v| (name.clone(), v.to_string())))
        .collect();

    Ok(RawListing {
        line,
        price,
        model_year: parse_float(field("model_year"), "model_year", line)?,
        model: model.to_string(),
        condition: field("condition").to_string(),
        cylinders: parse_float(field("cylinders"), "cylinders", line)?,
        odometer: parse_float(field("odometer"), "odometer", line)?,
        paint_color: optional_text(field("paint_color")),
        is_4wd: parse_flag(field("is_4wd"), "is_4wd", line)?,
        date_posted: parse_date(field("date_posted"), "date_posted", line)?,
        days_listed,
        extra,
    })
}

fn malformed(line: u64, column: &str, value: &str) -> ExplorerError {
    ExplorerError::MalformedRow {
        line,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

fn optional_text(value: &str) -> Option<String> {
    if is_missing(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}

/// Blank → `None`; otherwise a finite float or a malformed-row error.
fn parse_float(value: &str, column: &str, line: u64) -> Result<Option<f64>> {
    if is_missing(value) {
        return Ok(None);
    }
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(malformed(line, column, value)),
    }
}

/// Like [`parse_float`] but the value must be integral (`2011` or `2011.0`).
fn parse_whole_number(value: &str, column: &str, line: u64) -> Result<Option<i64>> {
    match parse_float(value, column, line)? {
        Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
        Some(_) => Err(malformed(line, column, value)),
        None => Ok(None),
    }
}

fn parse_flag(value: &str, column: &str, line: u64) -> Result<Option<bool>> {
    if is_missing(value) {
        return Ok(None);
    }
    match value.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(Some(true)),
        "0" | "0.0" | "false" | "no" => Ok(Some(false)),
        _ => Err(malformed(line, column, value)),
    }
}

/// `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(value: &str, column: &str, line: u64) -> Result<NaiveDate> {
    let date_part = value.trim().split(['T', ' ']).next().unwrap_or("");
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| malformed(line, column, value))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
