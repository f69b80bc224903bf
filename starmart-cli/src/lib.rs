//! Starmart CLI library.
//!
//! This crate provides the types, command handlers, and output helpers that
//! power the `starmart` binary. Each pipeline stage is a subcommand so the
//! stages can be run separately or end to end with `run`.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

use cli::{Cli, Commands};
use error::CliResult;
use starmart_store::StoreConfig;

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
///
/// The binary calls this after parsing args and initializing tracing.
pub async fn run(cli: Cli) -> CliResult<()> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Transform { input, output } => commands::transform::run(&input, &output, quiet),

        Commands::Check { staged } => commands::check::run(&staged, quiet),

        Commands::Load { staged } => {
            let config = StoreConfig::resolve(cli.database_url)?;
            commands::load::run(&config, &staged, quiet).await
        }

        Commands::Verify => {
            let config = StoreConfig::resolve(cli.database_url)?;
            commands::verify::run(&config, quiet).await
        }

        Commands::Run { input, staged } => {
            // Resolved before the transform so a missing URL fails fast.
            let config = StoreConfig::resolve(cli.database_url)?;
            commands::run::run(&config, &input, &staged, quiet).await
        }

        Commands::Ping => {
            let config = StoreConfig::resolve(cli.database_url)?;
            commands::ping::run(&config, quiet).await
        }
    }
}
