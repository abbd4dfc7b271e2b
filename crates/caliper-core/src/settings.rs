use clap::Parser;
use std::path::{Path, PathBuf};

/// Spreadsheet read when `--input` is not given, relative to the base dir.
pub const DEFAULT_INPUT_FILE: &str = "Analise-de-substituicao-de-calliper.xlsx";

/// Directory and file name of the dashboard document, relative to the base dir.
pub const DEFAULT_OUTPUT_DIR: &str = "public";
pub const DEFAULT_OUTPUT_FILE: &str = "dashboard_data.json";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Build the caliper maintenance dashboard data from the inspection log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "caliper-dashboard",
    about = "Build the caliper maintenance dashboard data from the inspection log",
    version
)]
pub struct Settings {
    /// Maintenance log spreadsheet (defaults to the file next to the program)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Dashboard JSON output path (defaults to public/dashboard_data.json)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            log_level: "INFO".to_string(),
            debug: false,
        }
    }
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::parse()
    }

    /// Same as [`load`](Self::load) but from an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// Level handed to the logging bootstrap; `--debug` wins.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }

    /// Input spreadsheet path, defaulting to [`DEFAULT_INPUT_FILE`] in `base_dir`.
    pub fn input_path(&self, base_dir: &Path) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| base_dir.join(DEFAULT_INPUT_FILE))
    }

    /// Output document path, defaulting to `public/dashboard_data.json` in `base_dir`.
    pub fn output_path(&self, base_dir: &Path) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            base_dir
                .join(DEFAULT_OUTPUT_DIR)
                .join(DEFAULT_OUTPUT_FILE)
        })
    }
}
