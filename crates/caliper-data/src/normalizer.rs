//! Raw spreadsheet rows → validated [`MaintenanceRecord`]s.

use caliper_core::dates::DateParser;
use caliper_core::models::{CellValue, MaintenanceRecord, RawRecord, NOT_INFORMED};
use chrono::NaiveDate;
use tracing::{info, warn};

// ── Column mapping ────────────────────────────────────────────────────────────

// Exact header text of the columns that are kept. Anything else is dropped.
const SITE: &str = "PARQUE";
const REPLACEMENT_YEAR: &str = "ANO DE SUBSTITUICAO";
const TURBINE_ID: &str = "WTG";
const CALIPER_POSITION: &str = "POSSICAO DO CALLIPER";
const ORING_REPLACED: &str = "SUBSTITUICAO DO ORING";
const PAD_REPLACED: &str = "SUBSTITUICAO DAS PASTILHA";
const CONDITION: &str = "CONDICAO CALLIPER";
const STATUS: &str = "STATUS";
const TECHNICIAN: &str = "TECNICO";

fn text(raw: &RawRecord, header: &str) -> Option<String> {
    raw.get(header).and_then(CellValue::as_text)
}

/// Parse a date column, reporting whether a non-blank value was rejected.
fn date(raw: &RawRecord, header: &str) -> (Option<NaiveDate>, bool) {
    match raw.get(header) {
        Some(cell) if !cell.is_blank() => {
            let parsed = DateParser::parse_cell(cell);
            (parsed, parsed.is_none())
        }
        _ => (None, false),
    }
}

// ── NormalizationReport ───────────────────────────────────────────────────────

/// Diagnostic counters gathered while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows dropped because the turbine id was blank.
    pub missing_turbine_id: usize,
    /// Rows dropped because the caliper position was blank (turbine id present).
    pub missing_caliper_position: usize,
    /// Non-blank date cells that could not be read as a date.
    pub unparseable_dates: usize,
}

impl NormalizationReport {
    pub fn rows_dropped(&self) -> usize {
        self.missing_turbine_id + self.missing_caliper_position
    }
}

/// Normalized records plus the diagnostics gathered while building them.
#[derive(Debug, Clone, Default)]
pub struct NormalizedLog {
    pub records: Vec<MaintenanceRecord>,
    pub report: NormalizationReport,
}

// ── RecordNormalizer ──────────────────────────────────────────────────────────

/// Stateless helper that cleans raw rows into typed maintenance records.
pub struct RecordNormalizer;

impl RecordNormalizer {
    /// Normalize every raw row.
    ///
    /// Rows without a turbine id or caliper position are excluded and only
    /// show up in the report; unparseable dates become `None`; blank
    /// `site`, `status` and `technician` (or a technician of `"-"`) become
    /// [`NOT_INFORMED`].
    pub fn normalize(rows: &[RawRecord]) -> NormalizedLog {
        let mut report = NormalizationReport {
            rows_read: rows.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(rows.len());

        for raw in rows {
            let (replacement_year_date, bad_year) = date(raw, REPLACEMENT_YEAR);
            let (oring_replaced_date, bad_oring) = date(raw, ORING_REPLACED);
            let (pad_replaced_date, bad_pad) = date(raw, PAD_REPLACED);
            report.unparseable_dates += [bad_year, bad_oring, bad_pad]
                .iter()
                .filter(|bad| **bad)
                .count();

            let Some(turbine_id) = text(raw, TURBINE_ID) else {
                report.missing_turbine_id += 1;
                continue;
            };
            let Some(caliper_position) = text(raw, CALIPER_POSITION) else {
                report.missing_caliper_position += 1;
                continue;
            };

            let technician = text(raw, TECHNICIAN)
                .filter(|t| t != "-")
                .unwrap_or_else(|| NOT_INFORMED.to_string());

            records.push(MaintenanceRecord {
                site: text(raw, SITE).unwrap_or_else(|| NOT_INFORMED.to_string()),
                turbine_id,
                caliper_position,
                replacement_year_date,
                oring_replaced_date,
                pad_replaced_date,
                condition: text(raw, CONDITION),
                status: text(raw, STATUS).unwrap_or_else(|| NOT_INFORMED.to_string()),
                technician,
            });
        }

        report.rows_kept = records.len();

        info!(
            "Normalized {} of {} rows",
            report.rows_kept, report.rows_read
        );
        if report.rows_dropped() > 0 {
            warn!(
                "Dropped {} rows without identifiers ({} missing WTG, {} missing caliper position)",
                report.rows_dropped(),
                report.missing_turbine_id,
                report.missing_caliper_position
            );
        }
        if report.unparseable_dates > 0 {
            warn!(
                "{} date cells could not be parsed and were left empty",
                report.unparseable_dates
            );
        }

        NormalizedLog { records, report }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
