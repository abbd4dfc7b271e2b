//! Dashboard assembly pipeline.
//!
//! Normalizes the raw log once, then computes and colors one snapshot for
//! the unfiltered scope and one per replacement year found in the data,
//! returning a [`DashboardRun`] ready for the snapshot writer.

use std::collections::BTreeMap;

use caliper_core::colors::ColorAnnotator;
use caliper_core::models::{
    DashboardDocument, MaintenanceRecord, MetricsSnapshot, RawRecord, Scope, PART_ORING,
    PART_PADS,
};
use caliper_core::Result;
use caliper_data::filter::{available_years, filter_by_year};
use caliper_data::metrics::MetricsCalculator;
use caliper_data::normalizer::{NormalizationReport, RecordNormalizer};
use tracing::{info, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// The complete output of one assembly run.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    /// The document to persist.
    pub document: DashboardDocument,
    /// Diagnostics from the normalization step.
    pub normalization: NormalizationReport,
    /// Scope keys whose computation failed and were replaced by empty snapshots.
    pub degraded_scopes: Vec<String>,
}

// ── DashboardAssembler ────────────────────────────────────────────────────────

/// Stateless orchestrator for the normalize → filter → compute → color steps.
pub struct DashboardAssembler;

impl DashboardAssembler {
    /// Run the full pipeline over raw spreadsheet rows.
    pub fn assemble_raw(rows: &[RawRecord]) -> DashboardRun {
        // ── Step 1: Normalize ─────────────────────────────────────────────────
        let log = RecordNormalizer::normalize(rows);

        // ── Steps 2-4: Per-scope snapshots ────────────────────────────────────
        let (document, degraded_scopes) =
            Self::assemble_with(&log.records, MetricsCalculator::calculate);

        DashboardRun {
            document,
            normalization: log.report,
            degraded_scopes,
        }
    }

    /// Build the document from already-normalized records.
    pub fn assemble(records: &[MaintenanceRecord]) -> DashboardDocument {
        Self::assemble_with(records, MetricsCalculator::calculate).0
    }

    /// Build the document using `calculate` for every scope.
    ///
    /// A scope whose calculation fails is logged and stored as
    /// [`MetricsSnapshot::empty`]; the other scopes are unaffected. Returns
    /// the document and the keys of the degraded scopes.
    pub fn assemble_with<F>(
        records: &[MaintenanceRecord],
        calculate: F,
    ) -> (DashboardDocument, Vec<String>)
    where
        F: Fn(&[MaintenanceRecord], Scope) -> Result<MetricsSnapshot>,
    {
        let years = available_years(records);
        info!("Available years: {:?}", years);

        let mut degraded = Vec::new();
        let mut compute = |scope: Scope| {
            let scoped = filter_by_year(records, scope.year());
            match calculate(&scoped, scope) {
                Ok(snapshot) => ColorAnnotator::annotate(snapshot),
                Err(e) => {
                    warn!("Scope {} degraded to an empty snapshot: {}", scope, e);
                    degraded.push(scope.key());
                    MetricsSnapshot::empty()
                }
            }
        };

        let all = compute(Scope::All);
        let by_year: BTreeMap<String, MetricsSnapshot> = years
            .iter()
            .map(|&y| (Scope::Year(y).key(), compute(Scope::Year(y))))
            .collect();

        let document = DashboardDocument {
            all,
            years: by_year,
            available_years: years,
            sites: distinct_sites(records),
        };

        (document, degraded)
    }
}

/// Distinct site names in order of first appearance.
pub fn distinct_sites(records: &[MaintenanceRecord]) -> Vec<String> {
    let mut sites: Vec<String> = Vec::new();
    for record in records {
        if !sites.contains(&record.site) {
            sites.push(record.site.clone());
        }
    }
    sites
}

/// Log the end-of-run summary for the unfiltered scope.
pub fn log_summary(document: &DashboardDocument) {
    let all = &document.all;
    let orings = all.part_count(PART_ORING);
    let pads = all.part_count(PART_PADS);

    info!("Summary:");
    info!(
        "  - All years: {} turbines, {} calipers",
        all.total_turbines, all.total_calipers
    );
    info!("  - Calipers replaced: {}", all.calipers_replaced);
    info!("  - Calipers by-passed: {}", all.calipers_bypass);
    info!("  - Calipers without leak or pending: {}", all.calipers_no_leak);
    info!("  - Machines with problems: {}", all.problem_machines.len());
    info!("  - O-rings replaced: {}", orings);
    info!("  - Pads replaced: {}", pads);
    info!("  - Total interventions: {}", orings + pads);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
