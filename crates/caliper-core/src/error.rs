use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the caliper dashboard pipeline.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The maintenance spreadsheet does not exist.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// The spreadsheet exists but could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook could not be opened or parsed as tabular data.
    #[error("Failed to load spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// The workbook has no sheet, or its first sheet has no header row.
    #[error("No worksheet with a header row in {0}")]
    EmptyWorkbook(PathBuf),

    /// A computed snapshot violated one of its own invariants.
    #[error("Metrics for scope '{scope}' are inconsistent: {reason}")]
    Metrics { scope: String, reason: String },

    /// The dashboard document could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dashboard document could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

/// Convenience alias used throughout the caliper crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_input_not_found() {
        let err = DashboardError::InputNotFound(PathBuf::from("/data/log.xlsx"));
        assert_eq!(err.to_string(), "Input file not found: /data/log.xlsx");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/data/log.xlsx"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/log.xlsx"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_spreadsheet() {
        let err = DashboardError::Spreadsheet {
            path: PathBuf::from("broken.xlsx"),
            message: "invalid zip header".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load spreadsheet broken.xlsx: invalid zip header"
        );
    }

    #[test]
    fn test_error_display_empty_workbook() {
        let err = DashboardError::EmptyWorkbook(PathBuf::from("empty.xlsx"));
        assert_eq!(err.to_string(), "No worksheet with a header row in empty.xlsx");
    }

    #[test]
    fn test_error_display_metrics() {
        let err = DashboardError::Metrics {
            scope: "2024".to_string(),
            reason: "percentages sum to 90".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Metrics for scope '2024' are inconsistent: percentages sum to 90"
        );
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = DashboardError::FileWrite {
            path: PathBuf::from("public/dashboard_data.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write file public/dashboard_data.json"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(err.to_string().contains("Failed to serialize JSON"));
    }
}
