//! Per-scope aggregation of the maintenance log into a [`MetricsSnapshot`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use caliper_core::models::{
    MaintenanceRecord, MetricsSnapshot, MonthCount, PartTypeShare, PositionCount,
    ProblemMachine, Scope, SiteCount, StatusCount, AWAITING_SCHEDULING, PART_ORING, PART_PADS,
};
use caliper_core::{DashboardError, Result};
use chrono::Datelike;
use regex::Regex;
use tracing::{debug, info};

/// Tolerance for the O-ring + pad percentages adding up to 100.
const PERCENT_TOLERANCE: f64 = 1e-6;

// ── Status classification ─────────────────────────────────────────────────────

fn bypass_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)by.pass|bypass").expect("regex is valid"))
}

fn no_leak_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)sem vazamento|pendente|no leak|pending").expect("regex is valid")
    })
}

/// Caliper safety function disabled pending resolution.
pub fn is_bypass(status: &str) -> bool {
    bypass_pattern().is_match(status)
}

/// Inspected without leak, or awaiting intervention.
pub fn is_no_leak(status: &str) -> bool {
    no_leak_pattern().is_match(status)
}

/// Any status that flags an unresolved operational problem.
pub fn is_problem(status: &str) -> bool {
    is_bypass(status) || is_no_leak(status)
}

/// A completed part swap: some part has a swap date and the row is not a
/// problem flag.
pub fn is_real_replacement(record: &MaintenanceRecord) -> bool {
    record.has_part_swap() && !is_problem(&record.status)
}

// ── Grouping helpers ──────────────────────────────────────────────────────────

/// Count occurrences of each key, in order of first appearance.
fn count_first_seen<'a, I>(keys: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }
    counts
}

// ── MetricsCalculator ─────────────────────────────────────────────────────────

/// Stateless aggregation engine turning one scope's records into metrics.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute the full snapshot for `records`, already narrowed to `scope`.
    ///
    /// An empty record set yields [`MetricsSnapshot::empty`]. The result is
    /// checked against its own invariants before it is returned; a violation
    /// is reported as [`DashboardError::Metrics`].
    pub fn calculate(records: &[MaintenanceRecord], scope: Scope) -> Result<MetricsSnapshot> {
        info!("Processing {} records for scope {}", records.len(), scope);

        if records.is_empty() {
            return Ok(MetricsSnapshot::empty());
        }

        let replacements: Vec<&MaintenanceRecord> =
            records.iter().filter(|r| is_real_replacement(r)).collect();
        info!("Real replacements found: {}", replacements.len());

        let total_turbines = records
            .iter()
            .map(|r| r.turbine_id.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        let calipers_bypass = records.iter().filter(|r| is_bypass(&r.status)).count() as u64;
        let calipers_no_leak = records.iter().filter(|r| is_no_leak(&r.status)).count() as u64;

        let snapshot = MetricsSnapshot {
            total_turbines,
            total_calipers: records.len() as u64,
            calipers_bypass,
            calipers_no_leak,
            calipers_replaced: replacements.len() as u64,
            by_site: Self::by_site(&replacements),
            by_status: Self::by_status(records),
            by_month: Self::by_month(&replacements),
            part_types: Self::part_types(&replacements),
            by_position: Self::by_position(&replacements),
            problem_machines: Self::problem_machines(records),
        };

        debug!(
            scope = %scope,
            sites = ?snapshot.by_site,
            months = ?snapshot.by_month,
            "scope breakdowns"
        );

        Self::validate(&snapshot, scope)?;
        Ok(snapshot)
    }

    /// Real replacements per site.
    fn by_site(replacements: &[&MaintenanceRecord]) -> Vec<SiteCount> {
        count_first_seen(replacements.iter().map(|r| r.site.as_str()))
            .into_iter()
            .map(|(site, count)| SiteCount { site, count })
            .collect()
    }

    /// All rows per raw status value.
    fn by_status(records: &[MaintenanceRecord]) -> Vec<StatusCount> {
        count_first_seen(records.iter().map(|r| r.status.as_str()))
            .into_iter()
            .map(|(status, count)| StatusCount {
                status,
                count,
                color: None,
            })
            .collect()
    }

    /// Dated real replacements per calendar month, ascending.
    fn by_month(replacements: &[&MaintenanceRecord]) -> Vec<MonthCount> {
        let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();
        for date in replacements.iter().filter_map(|r| r.replacement_year_date) {
            *months.entry((date.year(), date.month())).or_insert(0) += 1;
        }
        months
            .into_iter()
            .map(|((year, month), count)| MonthCount {
                month: format!("{:04}-{:02}", year, month),
                count,
            })
            .collect()
    }

    /// O-ring vs pad share of all part swaps. A row swapping both parts
    /// counts once for each.
    fn part_types(replacements: &[&MaintenanceRecord]) -> Vec<PartTypeShare> {
        let oring_count = replacements
            .iter()
            .filter(|r| r.oring_replaced_date.is_some())
            .count() as u64;
        let pad_count = replacements
            .iter()
            .filter(|r| r.pad_replaced_date.is_some())
            .count() as u64;
        let total = oring_count + pad_count;

        debug!(
            "Part swaps: {} O-rings, {} pads, {} interventions",
            oring_count, pad_count, total
        );

        let share = |part_type: &str, count: u64| PartTypeShare {
            part_type: part_type.to_string(),
            percentage: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
            count,
            color: None,
        };
        vec![share(PART_ORING, oring_count), share(PART_PADS, pad_count)]
    }

    /// Real replacements per caliper position.
    fn by_position(replacements: &[&MaintenanceRecord]) -> Vec<PositionCount> {
        count_first_seen(replacements.iter().map(|r| r.caliper_position.as_str()))
            .into_iter()
            .map(|(position, count)| PositionCount {
                position,
                count,
                color: None,
            })
            .collect()
    }

    /// Every row flagged by-pass, no-leak or pending; each row appears once.
    fn problem_machines(records: &[MaintenanceRecord]) -> Vec<ProblemMachine> {
        records
            .iter()
            .filter(|r| is_problem(&r.status))
            .map(|r| ProblemMachine {
                turbine_id: r.turbine_id.clone(),
                site: r.site.clone(),
                position: r.caliper_position.clone(),
                status: r.status.clone(),
                replacement_date: r
                    .replacement_year_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| AWAITING_SCHEDULING.to_string()),
            })
            .collect()
    }

    fn validate(snapshot: &MetricsSnapshot, scope: Scope) -> Result<()> {
        let fail = |reason: String| {
            Err(DashboardError::Metrics {
                scope: scope.key(),
                reason,
            })
        };

        if snapshot.calipers_replaced > snapshot.total_calipers {
            return fail(format!(
                "{} replacements out of {} calipers",
                snapshot.calipers_replaced, snapshot.total_calipers
            ));
        }

        let interventions: u64 = snapshot.part_types.iter().map(|p| p.count).sum();
        let percent_sum: f64 = snapshot.part_types.iter().map(|p| p.percentage).sum();
        if !percent_sum.is_finite() {
            return fail("non-finite part-type percentage".to_string());
        }
        let expected = if interventions == 0 { 0.0 } else { 100.0 };
        if (percent_sum - expected).abs() > PERCENT_TOLERANCE {
            return fail(format!("part-type percentages sum to {}", percent_sum));
        }

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
