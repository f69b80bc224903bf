use starmart_store::{postload, StoreConfig};

use crate::error::CliResult;
use crate::output;

/// Re-check the loaded schema in the store. Failures are diagnostic: the
/// committed data stays, the exit code tells the operator to look.
pub async fn run(config: &StoreConfig, quiet: bool) -> CliResult<()> {
    let pool = config.connect().await?;
    let report = postload::validate(&pool).await?;
    output::print_report(&report, quiet);
    output::gate(&report, "post-load")
}
