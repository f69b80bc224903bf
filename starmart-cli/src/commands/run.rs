use std::path::Path;
use std::time::Instant;

use tracing::info;

use starmart_store::StoreConfig;

use crate::commands;
use crate::error::CliResult;

/// The whole pipeline in order: transform, check, load, verify.
///
/// The store configuration is resolved by the caller before the transform
/// starts, so a missing database URL fails the run before any work is done.
pub async fn run(config: &StoreConfig, input: &Path, staged: &Path, quiet: bool) -> CliResult<()> {
    let started = Instant::now();

    commands::transform::run(input, staged, quiet)?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "transform done");

    commands::check::run(staged, quiet)?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "pre-load check done");

    commands::load::run(config, staged, quiet).await?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "load done");

    commands::verify::run(config, quiet).await?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "pipeline complete");
    Ok(())
}
