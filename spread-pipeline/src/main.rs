//! Spread Pipeline - one selection run over a market snapshot.
//!
//! Configuration comes from `~/.spread-pipeline/config.json` (or the file
//! named by `SPREAD_CONFIG`) plus `SPREAD_*` environment overrides. The
//! report is written to stdout; logs go to stderr.

use anyhow::{Context, Result};
use spread_common::logging::init_logging_with_exclusions;
use spread_pipeline::{PipelineConfig, ReportFormat, SelectionPipeline, SnapshotProvider};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let started = std::time::Instant::now();

    // Load configuration
    let config = PipelineConfig::load().context("Failed to load pipeline configuration")?;

    // Initialize logging
    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.exclude_targets,
    );

    tracing::info!("Spread Pipeline v{}", env!("CARGO_PKG_VERSION"));

    let snapshot_path = config
        .snapshot_path()
        .context("No market snapshot configured (set data.snapshot_path or SPREAD_SNAPSHOT_PATH)")?;
    let provider = SnapshotProvider::from_file(&snapshot_path)?;

    let mut universe = config.resolve_universe()?;
    if universe.is_empty() {
        universe = provider.symbols();
        tracing::info!(symbols = universe.len(), "No universe configured, using snapshot symbols");
    }

    let as_of = config
        .as_of
        .or(provider.as_of())
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let format: ReportFormat = config
        .report
        .format
        .parse()
        .map_err(anyhow::Error::msg)?;

    let pipeline = SelectionPipeline::new(config, Arc::new(provider))
        .context("Invalid pipeline configuration")?;
    let outcome = pipeline.run(&universe, as_of).await;

    let rendered = spread_pipeline::report::render(&outcome, format)?;
    println!("{}", rendered);

    tracing::info!(
        duration_ms = started.elapsed().as_millis() as u64,
        "Run finished"
    );
    Ok(())
}
