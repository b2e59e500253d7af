pub mod header;
pub mod narrative;
