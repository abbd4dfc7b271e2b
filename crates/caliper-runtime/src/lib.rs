//! Runtime layer for the caliper maintenance dashboard.
//!
//! Assembles the per-scope metrics into the dashboard document and
//! persists it for the visualization front end.

pub mod assembler;
pub mod writer;
