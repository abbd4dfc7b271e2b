use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::CellValue;

/// Largest spreadsheet serial day accepted (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Whole numbers in this range are calendar years typed into the cell, not
/// serial days.
const YEAR_RANGE: std::ops::RangeInclusive<f64> = 1900.0..=2100.0;

// ── DateParser ────────────────────────────────────────────────────────────────

/// Coerces the date-bearing cells of the maintenance log into calendar dates.
///
/// Never fails: anything that cannot be read as a date becomes `None`.
pub struct DateParser;

impl DateParser {
    /// Attempt to interpret a cell as a calendar date.
    ///
    /// Handles:
    /// * native spreadsheet date cells → their date part
    /// * whole numbers in 1900..=2100 → January 1st of that year
    /// * other numbers → spreadsheet serial days (1900 date system)
    /// * text → ISO 8601 / RFC 3339, day-first `DD/MM/YYYY` and friends,
    ///   or a bare `YYYY` / `MM/YYYY` / `YYYY-MM` period (its first day)
    /// * anything else → `None`
    pub fn parse_cell(cell: &CellValue) -> Option<NaiveDate> {
        match cell {
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::Number(n) if n.fract() == 0.0 && YEAR_RANGE.contains(n) => {
                NaiveDate::from_ymd_opt(*n as i32, 1, 1)
            }
            CellValue::Number(n) => Self::from_serial(*n),
            CellValue::Text(s) => Self::parse_str(s.trim()),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }

    /// Convert a spreadsheet serial day number into a date.
    pub fn from_serial(serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || !(1.0..=MAX_SERIAL_DAY).contains(&serial) {
            return None;
        }
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
    }

    /// Parse a textual date.
    pub fn parse_str(s: &str) -> Option<NaiveDate> {
        if s.is_empty() || s == "-" {
            return None;
        }

        // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.date_naive());
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%d/%m/%Y %H:%M:%S",
            "%d/%m/%Y %H:%M",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        // `%Y` accepts short years, so the two-digit form must be tried before
        // it or "05/03/25" would land in year 25.
        const DATE_FORMATS: &[&str] = &[
            "%Y-%m-%d",
            "%d/%m/%y",
            "%d/%m/%Y",
            "%Y/%m/%d",
            "%d-%m-%Y",
            "%d.%m.%Y",
        ];
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        if let Some(date) = Self::parse_period(s) {
            return Some(date);
        }

        debug!("DateParser: could not parse date string \"{}\"", s);
        None
    }

    /// First day of a year-only or month-and-year value.
    fn parse_period(s: &str) -> Option<NaiveDate> {
        let is_year = |y: &str| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit());
        if is_year(s) {
            return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
        }

        let (year, month) = match (s.split_once('/'), s.split_once('-')) {
            (Some((m, y)), None) => (y, m),
            (None, Some((y, m))) => (y, m),
            _ => return None,
        };
        let is_month = (1..=2).contains(&month.len()) && month.bytes().all(|b| b.is_ascii_digit());
        if !is_year(year) || !is_month {
            return None;
        }
        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── parse_str ─────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(DateParser::parse_str("2024-03-15"), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(
            DateParser::parse_str("2024-03-15 08:30:00"),
            Some(ymd(2024, 3, 15))
        );
        assert_eq!(
            DateParser::parse_str("2024-03-15T08:30:00Z"),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_day_first() {
        assert_eq!(DateParser::parse_str("05/03/2025"), Some(ymd(2025, 3, 5)));
        assert_eq!(DateParser::parse_str("05-03-2025"), Some(ymd(2025, 3, 5)));
        assert_eq!(DateParser::parse_str("05/03/25"), Some(ymd(2025, 3, 5)));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(DateParser::parse_str("pendente"), None);
        assert_eq!(DateParser::parse_str("31/02/2024"), None);
        assert_eq!(DateParser::parse_str(""), None);
        assert_eq!(DateParser::parse_str("-"), None);
    }

    #[test]
    fn test_parse_year_and_month_periods() {
        assert_eq!(DateParser::parse_str("2024"), Some(ymd(2024, 1, 1)));
        assert_eq!(DateParser::parse_str("03/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(DateParser::parse_str("3/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(DateParser::parse_str("2024-03"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_parse_malformed_periods_are_none() {
        assert_eq!(DateParser::parse_str("13/2024"), None);
        assert_eq!(DateParser::parse_str("2024-3-"), None);
        assert_eq!(DateParser::parse_str("03/24"), None);
        assert_eq!(DateParser::parse_str("202"), None);
    }

    #[test]
    fn test_parse_single_digit_day_first() {
        assert_eq!(DateParser::parse_str("5/3/2025"), Some(ymd(2025, 3, 5)));
    }

    // ── parse_cell ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_cell_native_datetime() {
        let dt = ymd(2024, 11, 2).and_hms_opt(14, 0, 0).unwrap();
        assert_eq!(
            DateParser::parse_cell(&CellValue::DateTime(dt)),
            Some(ymd(2024, 11, 2))
        );
    }

    #[test]
    fn test_parse_cell_serial_number() {
        // 45366 is 2024-03-15 in the 1900 date system.
        assert_eq!(
            DateParser::parse_cell(&CellValue::Number(45366.0)),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_cell_whole_number_year() {
        assert_eq!(
            DateParser::parse_cell(&CellValue::Number(2024.0)),
            Some(ymd(2024, 1, 1))
        );
        assert_eq!(
            DateParser::parse_cell(&CellValue::Number(1900.0)),
            Some(ymd(1900, 1, 1))
        );
        // Fractional values in the year range stay serial days.
        assert_eq!(
            DateParser::parse_cell(&CellValue::Number(2024.5)),
            DateParser::from_serial(2024.5)
        );
    }

    #[test]
    fn test_parse_cell_out_of_range_serial() {
        assert_eq!(DateParser::parse_cell(&CellValue::Number(-4.0)), None);
        assert_eq!(DateParser::parse_cell(&CellValue::Number(1e9)), None);
    }

    #[test]
    fn test_parse_cell_blank_and_bool() {
        assert_eq!(DateParser::parse_cell(&CellValue::Empty), None);
        assert_eq!(DateParser::parse_cell(&CellValue::Bool(true)), None);
    }
}
