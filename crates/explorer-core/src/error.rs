use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the pickup explorer.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The listings file was not found at any of the searched locations.
    #[error("Data file not found: {0}")]
    DataFileNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV header lacks one or more columns the pipeline depends on.
    #[error("Missing required columns in {path}: {}", columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// A field could not be converted to its expected type.
    #[error("Malformed row at line {line}: column `{column}` has invalid value {value:?}")]
    MalformedRow {
        line: u64,
        column: String,
        value: String,
    },

    /// The CSV reader itself failed (bad quoting, I/O mid-stream, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A grouped median could not be computed because no record in the
    /// group has a known value.
    #[error("Cannot impute {field}: no known values for {key} = {group:?} ({rows} rows affected)")]
    ImputationGap {
        field: String,
        key: String,
        group: String,
        rows: usize,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExplorerError {
    /// `true` for every failure that happens while loading the input file.
    pub fn is_data_load(&self) -> bool {
        matches!(
            self,
            ExplorerError::DataFileNotFound(_)
                | ExplorerError::FileRead { .. }
                | ExplorerError::MissingColumns { .. }
                | ExplorerError::MalformedRow { .. }
                | ExplorerError::Csv(_)
        )
    }
}

/// Convenience alias used throughout the explorer crates.
pub type Result<T> = std::result::Result<T, ExplorerError>;
