use std::path::Path;

use starmart_core::stage;
use starmart_store::{preflight, BulkLoader, StoreConfig};

use crate::error::CliResult;
use crate::output;

/// Load the staged star schema into the store.
///
/// The pre-load validation always re-runs here, even after a separate
/// `check` invocation: the staged files may have changed in between, and
/// the store must never receive an unvalidated schema.
pub async fn run(config: &StoreConfig, staged: &Path, quiet: bool) -> CliResult<()> {
    let star = stage::read_star_schema(staged)?;
    let report = starmart_check::validate(&star);
    output::print_report(&report, quiet);
    output::gate(&report, "pre-load")?;

    let pool = config.connect().await?;
    preflight::ping(&pool).await?;
    preflight::check_schema(&pool).await?;

    let loader = BulkLoader::new(pool);
    let summary = loader.load(&star).await?;
    output::print_load_summary(&summary, quiet);
    if !quiet {
        println!("load committed");
    }
    Ok(())
}
