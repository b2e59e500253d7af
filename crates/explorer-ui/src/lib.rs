//! Terminal UI layer for Pickup Explorer.
//!
//! Provides themes, the header and narrative components, the sectioned chart
//! dashboard, the per-make summary table and the application event loop,
//! all built on [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod table_view;
pub mod themes;

pub use explorer_core as core;
