use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "starmart", about = "Insurance BI star-schema pipeline", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// PostgreSQL connection string for the analytics store
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform raw entity CSVs into staged star-schema tables
    Transform {
        /// Directory holding the five raw entity CSV files
        #[arg(long, short = 'i', default_value = "data/raw")]
        input: PathBuf,

        /// Directory to write the nine staged star tables into
        #[arg(long, short = 'o', default_value = "data/star")]
        output: PathBuf,
    },

    /// Validate staged star tables before any load
    Check {
        /// Directory holding the staged star tables
        #[arg(long, short = 's', default_value = "data/star")]
        staged: PathBuf,
    },

    /// Bulk-load staged star tables into the store (re-validates first)
    Load {
        /// Directory holding the staged star tables
        #[arg(long, short = 's', default_value = "data/star")]
        staged: PathBuf,
    },

    /// Re-check integrity of the loaded schema in the store
    Verify,

    /// Run the whole pipeline: transform, check, load, verify
    Run {
        /// Directory holding the five raw entity CSV files
        #[arg(long, short = 'i', default_value = "data/raw")]
        input: PathBuf,

        /// Directory to stage the star tables in
        #[arg(long, short = 's', default_value = "data/star")]
        staged: PathBuf,
    },

    /// Check store connectivity and schema provisioning
    Ping,
}
