//! `entsync-io` — file ingestion for the sync pipeline.
//!
//! Reads CSV and Excel files into flat string rows (header row skipped)
//! and normalizes rows into engine [`Record`]s through a configured
//! field→column mapping.
//!
//! [`Record`]: entsync_engine::Record

pub mod csv;
pub mod mapping;
pub mod xlsx;

pub use mapping::{normalize, MappingConfig};
