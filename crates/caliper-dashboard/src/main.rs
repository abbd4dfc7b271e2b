mod bootstrap;

use std::process::ExitCode;

use anyhow::{Context, Result};
use caliper_core::settings::Settings;
use caliper_core::DashboardError;
use caliper_data::reader::load_raw_records;
use caliper_runtime::assembler::{log_summary, DashboardAssembler};
use caliper_runtime::writer::SnapshotWriter;

fn main() -> ExitCode {
    let settings = Settings::load();

    if let Err(e) = bootstrap::setup_logging(settings.effective_log_level()) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!("Caliper dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    let base_dir = bootstrap::base_dir();
    let input = settings.input_path(&base_dir);
    let output = settings.output_path(&base_dir);

    let rows = match load_raw_records(&input) {
        Ok(rows) => rows,
        Err(DashboardError::InputNotFound(path)) => {
            anyhow::bail!(
                "Maintenance log not found at {}; nothing was written",
                path.display()
            );
        }
        Err(e) => return Err(e).context("Failed to load the maintenance log"),
    };

    tracing::info!("Processing data...");
    let run = DashboardAssembler::assemble_raw(&rows);
    if !run.degraded_scopes.is_empty() {
        tracing::warn!(
            "{} scope(s) were written as empty snapshots: {:?}",
            run.degraded_scopes.len(),
            run.degraded_scopes
        );
    }

    SnapshotWriter::write(&run.document, &output)
        .with_context(|| format!("Failed to save dashboard data to {}", output.display()))?;

    log_summary(&run.document);
    Ok(())
}
