//! Persists the dashboard document as indented UTF-8 JSON.

use std::path::Path;

use caliper_core::models::DashboardDocument;
use caliper_core::{DashboardError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

/// Indentation used by the front end's checked-in data files.
const INDENT: &[u8] = b"    ";

/// Writes [`DashboardDocument`]s to disk.
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Render the document as pretty-printed JSON bytes.
    pub fn to_json(document: &DashboardDocument) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        document.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Atomically write the document to `path`, creating parent directories.
    ///
    /// The JSON is fully rendered before anything touches the disk, then
    /// written to a temporary sibling and renamed into place.
    pub fn write(document: &DashboardDocument, path: &Path) -> Result<()> {
        let json = Self::to_json(document)?;

        let write_err = |source: std::io::Error| DashboardError::FileWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(write_err)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(write_err(e));
        }

        info!("Dashboard data saved to {}", path.display());
        Ok(())
    }
}
