use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Placeholder written into categorical fields that the log left blank.
pub const NOT_INFORMED: &str = "Não Informado";

/// Date text used in the problem list when no replacement date is scheduled.
pub const AWAITING_SCHEDULING: &str = "Aguardando Programação";

/// Part-type labels, in the order they appear in the document.
pub const PART_ORING: &str = "O-Ring";
pub const PART_PADS: &str = "Pastilhas";

/// Document key of the unfiltered scope.
pub const SCOPE_ALL_KEY: &str = "todos";

// ── Raw input ─────────────────────────────────────────────────────────────────

/// A single untyped spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Render the cell as trimmed text, or `None` when it carries nothing.
    ///
    /// Integral numbers drop their fractional part so that a turbine id typed
    /// as `12` in the sheet reads back as `"12"` rather than `"12.0"`.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.date().format("%Y-%m-%d").to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().is_none()
    }
}

/// One spreadsheet row keyed by its (trimmed) column header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    cells: HashMap<String, CellValue>,
}

impl RawRecord {
    /// Build a record from `(header, value)` pairs.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        Self {
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// `true` when every cell in the row is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }
}

// ── Normalized record ─────────────────────────────────────────────────────────

/// A validated caliper inspection/replacement event.
///
/// `turbine_id` and `caliper_position` are always non-empty; `site`,
/// `status` and `technician` fall back to [`NOT_INFORMED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub site: String,
    pub turbine_id: String,
    pub caliper_position: String,
    pub replacement_year_date: Option<NaiveDate>,
    pub oring_replaced_date: Option<NaiveDate>,
    pub pad_replaced_date: Option<NaiveDate>,
    pub condition: Option<String>,
    pub status: String,
    pub technician: String,
}

impl MaintenanceRecord {
    /// At least one part (O-ring or pads) carries a swap date.
    pub fn has_part_swap(&self) -> bool {
        self.oring_replaced_date.is_some() || self.pad_replaced_date.is_some()
    }
}

// ── Reporting scope ───────────────────────────────────────────────────────────

/// The reporting partition a snapshot is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    All,
    Year(i32),
}

impl Scope {
    /// Key under which the snapshot is stored in the document.
    pub fn key(&self) -> String {
        match self {
            Scope::All => SCOPE_ALL_KEY.to_string(),
            Scope::Year(y) => y.to_string(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Scope::All => None,
            Scope::Year(y) => Some(*y),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// ── Snapshot entries ──────────────────────────────────────────────────────────

/// Real replacements counted for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCount {
    #[serde(rename = "PARQUE")]
    pub site: String,
    #[serde(rename = "Total_Substituicoes")]
    pub count: u64,
}

/// Rows carrying one raw status value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Quantidade")]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Real replacements dated within one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    #[serde(rename = "Mes_Ano")]
    pub month: String,
    #[serde(rename = "Total_Substituicoes")]
    pub count: u64,
}

/// Share of part swaps attributed to one part type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTypeShare {
    #[serde(rename = "Tipo")]
    pub part_type: String,
    #[serde(rename = "Percentual")]
    pub percentage: f64,
    #[serde(rename = "Quantidade")]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Real replacements counted for one caliper mount position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCount {
    #[serde(rename = "Posicao")]
    pub position: String,
    #[serde(rename = "Quantidade")]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A row flagged with an unresolved operational problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemMachine {
    #[serde(rename = "WTG")]
    pub turbine_id: String,
    #[serde(rename = "PARQUE")]
    pub site: String,
    #[serde(rename = "POSICAO_CALLIPER")]
    pub position: String,
    #[serde(rename = "STATUS")]
    pub status: String,
    /// `YYYY-MM-DD`, or [`AWAITING_SCHEDULING`].
    #[serde(rename = "ANO_SUBSTITUICAO")]
    pub replacement_date: String,
}

// ── MetricsSnapshot ───────────────────────────────────────────────────────────

/// All dashboard metrics for one reporting scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(rename = "totalTurbinas")]
    pub total_turbines: u64,
    #[serde(rename = "totalCallipers")]
    pub total_calipers: u64,
    #[serde(rename = "callipersByPass")]
    pub calipers_bypass: u64,
    #[serde(rename = "callipersSemVazamento")]
    pub calipers_no_leak: u64,
    #[serde(rename = "callipersSubstituidos")]
    pub calipers_replaced: u64,
    #[serde(rename = "substituicoesPorParque", default)]
    pub by_site: Vec<SiteCount>,
    #[serde(rename = "statusCallipers", default)]
    pub by_status: Vec<StatusCount>,
    #[serde(rename = "substituicoesPorMes", default)]
    pub by_month: Vec<MonthCount>,
    #[serde(rename = "percentualTipoSubstituicao", default)]
    pub part_types: Vec<PartTypeShare>,
    #[serde(rename = "posicaoCallipers", default)]
    pub by_position: Vec<PositionCount>,
    #[serde(rename = "maquinasProblema", default)]
    pub problem_machines: Vec<ProblemMachine>,
}

impl MetricsSnapshot {
    /// The all-zero, all-empty snapshot used for empty or failed scopes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up the raw count recorded for a part type label.
    pub fn part_count(&self, part_type: &str) -> u64 {
        self.part_types
            .iter()
            .find(|p| p.part_type == part_type)
            .map(|p| p.count)
            .unwrap_or(0)
    }
}

// ── DashboardDocument ─────────────────────────────────────────────────────────

/// Root document consumed by the visualization front end.
///
/// Serializes as `{"todos": …, "<year>": …, "anosDisponiveis": […],
/// "parques": […]}` with one entry per year found in the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardDocument {
    #[serde(rename = "todos", default)]
    pub all: MetricsSnapshot,
    #[serde(flatten)]
    pub years: BTreeMap<String, MetricsSnapshot>,
    #[serde(rename = "anosDisponiveis", default)]
    pub available_years: Vec<i32>,
    #[serde(rename = "parques", default)]
    pub sites: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── CellValue ─────────────────────────────────────────────────────────────

    #[test]
    fn test_cell_as_text_trims_strings() {
        let cell = CellValue::Text("  WTG-07 ".to_string());
        assert_eq!(cell.as_text().as_deref(), Some("WTG-07"));
    }

    #[test]
    fn test_cell_as_text_integral_number() {
        assert_eq!(CellValue::Number(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(CellValue::Number(2.5).as_text().as_deref(), Some("2.5"));
    }

    #[test]
    fn test_cell_blank_variants() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn test_raw_record_blank_row() {
        let row = RawRecord::from_pairs([
            ("WTG", CellValue::Empty),
            ("STATUS", CellValue::Text(" ".to_string())),
        ]);
        assert!(row.is_blank());
    }

    // ── Scope ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_scope_keys() {
        assert_eq!(Scope::All.key(), "todos");
        assert_eq!(Scope::Year(2031).key(), "2031");
        assert_eq!(Scope::Year(2024).year(), Some(2024));
        assert_eq!(Scope::All.year(), None);
    }

    // ── Serialization ─────────────────────────────────────────────────────────

    #[test]
    fn test_empty_snapshot_serializes_every_list_key() {
        let value = serde_json::to_value(MetricsSnapshot::empty()).unwrap();
        for key in [
            "substituicoesPorParque",
            "statusCallipers",
            "substituicoesPorMes",
            "percentualTipoSubstituicao",
            "posicaoCallipers",
            "maquinasProblema",
        ] {
            assert_eq!(value[key], serde_json::json!([]), "missing list {key}");
        }
        assert_eq!(value["totalCallipers"], 0);
    }

    #[test]
    fn test_snapshot_missing_lists_default_to_empty() {
        let json = r#"{
            "totalTurbinas": 2,
            "totalCallipers": 3,
            "callipersByPass": 0,
            "callipersSemVazamento": 1,
            "callipersSubstituidos": 2
        }"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.total_calipers, 3);
        assert!(snapshot.by_site.is_empty());
        assert!(snapshot.problem_machines.is_empty());
    }

    #[test]
    fn test_color_omitted_until_annotated() {
        let entry = StatusCount {
            status: "Pendente".to_string(),
            count: 1,
            color: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("color").is_none());
    }

    #[test]
    fn test_document_flattens_year_scopes() {
        let mut doc = DashboardDocument {
            available_years: vec![2024],
            sites: vec!["Parque A".to_string()],
            ..Default::default()
        };
        doc.years.insert("2024".to_string(), MetricsSnapshot::empty());

        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("todos").is_some());
        assert!(value.get("2024").is_some());
        assert_eq!(value["anosDisponiveis"], serde_json::json!([2024]));
        assert_eq!(value["parques"], serde_json::json!(["Parque A"]));

        let back: DashboardDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
        assert!(back.years.contains_key("2024"));
        assert_eq!(back.years.len(), 1);
    }
}
