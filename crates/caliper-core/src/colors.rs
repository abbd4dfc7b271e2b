//! Fixed categorical palette attached to breakdown entries for rendering.

use crate::models::{MetricsSnapshot, PART_ORING};

pub const RED: &str = "#ef4444";
pub const GREEN: &str = "#22c55e";
pub const AMBER: &str = "#f59e0b";
pub const BLUE: &str = "#3b82f6";
pub const VIOLET: &str = "#8b5cf6";
pub const GRAY: &str = "#6b7280";

/// Status (lower-cased, trimmed) → color.
const STATUS_COLORS: &[(&str, &str)] = &[
    ("by-passado", RED),
    ("bypassado", RED),
    ("sem vazamento", GREEN),
    ("pendente", AMBER),
    ("reparos substituidos", BLUE),
    ("reparado", BLUE),
    ("operacional", GREEN),
    ("não informado", GRAY),
];

/// Caliper position → color.
const POSITION_COLORS: &[(&str, &str)] = &[
    ("1", BLUE),
    ("2", GREEN),
    ("3", AMBER),
    ("4", RED),
    ("5", VIOLET),
];

/// Color for a raw status value; unknown statuses are gray.
pub fn status_color(status: &str) -> &'static str {
    let key = status.trim().to_lowercase();
    lookup(STATUS_COLORS, &key)
}

/// Color for a part-type label.
pub fn part_type_color(part_type: &str) -> &'static str {
    if part_type == PART_ORING {
        BLUE
    } else {
        AMBER
    }
}

/// Color for a caliper position; anything outside `1`..`5` is gray.
pub fn position_color(position: &str) -> &'static str {
    lookup(POSITION_COLORS, position.trim())
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> &'static str {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, color)| *color)
        .unwrap_or(GRAY)
}

// ── ColorAnnotator ────────────────────────────────────────────────────────────

/// Attaches a `color` to every status, part-type and position entry.
///
/// Counts and ordering are left untouched.
pub struct ColorAnnotator;

impl ColorAnnotator {
    pub fn annotate(mut snapshot: MetricsSnapshot) -> MetricsSnapshot {
        for entry in &mut snapshot.by_status {
            entry.color = Some(status_color(&entry.status).to_string());
        }
        for entry in &mut snapshot.part_types {
            entry.color = Some(part_type_color(&entry.part_type).to_string());
        }
        for entry in &mut snapshot.by_position {
            entry.color = Some(position_color(&entry.position).to_string());
        }
        snapshot
    }
}
