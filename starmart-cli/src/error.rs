use colored::Colorize;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
#[allow(dead_code)]
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error reading or decoding table data.
    Core(starmart_core::CoreError),
    /// Error building dimensions or facts.
    Transform(starmart_transform::TransformError),
    /// Error talking to the store.
    Store(starmart_store::StoreError),
    /// A validation checkpoint failed and gated the pipeline.
    GateFailed { stage: &'static str, failed: usize },
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Transform(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Store(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::GateFailed { stage, failed } => write!(
                f,
                "{} {stage} validation failed ({failed} failed {})",
                "error:".red().bold(),
                if *failed == 1 { "check" } else { "checks" },
            ),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<starmart_core::CoreError> for CliError {
    fn from(e: starmart_core::CoreError) -> Self {
        CliError::Core(e)
    }
}

impl From<starmart_transform::TransformError> for CliError {
    fn from(e: starmart_transform::TransformError) -> Self {
        CliError::Transform(e)
    }
}

impl From<starmart_store::StoreError> for CliError {
    fn from(e: starmart_store::StoreError) -> Self {
        CliError::Store(e)
    }
}

pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
