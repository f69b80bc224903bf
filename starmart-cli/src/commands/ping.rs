use starmart_store::{preflight, StoreConfig};

use crate::error::CliResult;

/// Prove the store is reachable and its schema is provisioned.
pub async fn run(config: &StoreConfig, quiet: bool) -> CliResult<()> {
    let pool = config.connect().await?;
    preflight::ping(&pool).await?;
    preflight::check_schema(&pool).await?;
    if !quiet {
        println!("store reachable, schema provisioned");
    }
    Ok(())
}
