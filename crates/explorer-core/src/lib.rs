//! Shared types for the pickup explorer.
//!
//! Holds the error type, the listing data model, the reference catalog of
//! pickup models and hand-verified corrections, small statistics helpers,
//! display formatting, and the command-line settings.

pub mod catalog;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{ExplorerError, Result};
