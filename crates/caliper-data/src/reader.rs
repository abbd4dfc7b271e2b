//! Spreadsheet loading for the caliper maintenance log.
//!
//! Opens the workbook with `calamine`, reads the first sheet and turns every
//! data row into a [`RawRecord`] keyed by the header row.

use std::io::ErrorKind;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use caliper_core::models::{CellValue, RawRecord};
use caliper_core::{DashboardError, Result};
use tracing::{debug, info};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every non-blank data row of the first worksheet in `path`.
///
/// Fails with [`DashboardError::InputNotFound`] when the file is absent,
/// [`DashboardError::FileRead`] when it cannot be accessed, and
/// [`DashboardError::Spreadsheet`] / [`DashboardError::EmptyWorkbook`] when it
/// cannot be read as tabular data.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>> {
    let read_err = |source: std::io::Error| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    match std::fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DashboardError::InputNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(read_err(e)),
        Ok(_) => {}
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| match e {
        calamine::Error::Io(source) => read_err(source),
        other => DashboardError::Spreadsheet {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashboardError::EmptyWorkbook(path.to_path_buf()))?
        .map_err(|e| DashboardError::Spreadsheet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if range.is_empty() {
        return Err(DashboardError::EmptyWorkbook(path.to_path_buf()));
    }

    let records = records_from_rows(range.rows());
    info!(
        "Loaded {} rows from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Convert sheet rows into raw records, treating the first row as headers.
///
/// Columns with a blank header are ignored and fully blank rows are skipped.
pub fn records_from_rows<'a, I>(rows: I) -> Vec<RawRecord>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| convert_cell(cell).as_text())
        .collect();

    info!(
        "Columns found: {:?}",
        headers.iter().flatten().collect::<Vec<_>>()
    );

    let mut records = Vec::new();
    let mut blank_rows = 0usize;

    for row in rows {
        let record = RawRecord::from_pairs(
            headers
                .iter()
                .zip(row.iter())
                .filter_map(|(header, cell)| {
                    header
                        .as_ref()
                        .map(|h| (h.clone(), convert_cell(cell)))
                }),
        );
        if record.is_blank() {
            blank_rows += 1;
            continue;
        }
        records.push(record);
    }

    if blank_rows > 0 {
        debug!("Skipped {} blank rows", blank_rows);
    }

    records
}

/// Map a `calamine` cell onto the workspace's [`CellValue`].
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::Text(s.clone())
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Number(dt.as_f64()),
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
