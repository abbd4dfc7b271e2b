//! Data layer for the caliper maintenance dashboard.
//!
//! Loads the maintenance spreadsheet, normalizes its rows into typed
//! records, narrows them to a reporting year and aggregates them into
//! per-scope metrics.

pub mod filter;
pub mod metrics;
pub mod normalizer;
pub mod reader;
