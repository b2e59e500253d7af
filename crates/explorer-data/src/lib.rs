//! Data layer for Pickup Explorer.
//!
//! Reads the used-vehicle listings CSV, runs the cleaning pipeline, selects
//! the pickup trucks and derives the per-make summaries and chart inputs
//! the UI draws.

pub mod aggregator;
pub mod analysis;
pub mod cleaning;
pub mod imputation;
pub mod pickups;
pub mod reader;
pub mod views;

pub use explorer_core as core;
