//! Scope narrowing over the normalized record set.

use std::collections::BTreeSet;

use caliper_core::models::MaintenanceRecord;
use chrono::Datelike;

/// Keep records whose replacement-year date falls in `year`.
///
/// `None` passes every record through. Records without a replacement-year
/// date never match a specific year.
pub fn filter_by_year(records: &[MaintenanceRecord], year: Option<i32>) -> Vec<MaintenanceRecord> {
    match year {
        None => records.to_vec(),
        Some(y) => records
            .iter()
            .filter(|r| r.replacement_year_date.map(|d| d.year()) == Some(y))
            .cloned()
            .collect(),
    }
}

/// Distinct replacement years present in the records, ascending.
pub fn available_years(records: &[MaintenanceRecord]) -> Vec<i32> {
    records
        .iter()
        .filter_map(|r| r.replacement_year_date.map(|d| d.year()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
