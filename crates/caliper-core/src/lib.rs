//! Shared domain types for the caliper maintenance dashboard.
//!
//! Holds the raw and normalized record types, the per-scope metrics snapshot
//! and root dashboard document, the error taxonomy, date coercion, the color
//! palette and command-line settings.

pub mod colors;
pub mod dates;
pub mod error;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
