//! Error types for the dimensional transform.

use starmart_core::CoreError;
use thiserror::Error;

/// Result type alias using TransformError.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors from building dimensions or facts.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A source table has no rows to transform.
    #[error("{table} has no rows to transform")]
    EmptySource { table: String },

    /// No parseable date exists anywhere in policies or claims, so the time
    /// dimension has no range to span.
    #[error("no parseable dates found in policies or claims")]
    EmptyDateRange,

    /// Decode or derivation error from the core data model.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl TransformError {
    /// Create an empty source error.
    pub fn empty_source(table: impl Into<String>) -> Self {
        TransformError::EmptySource {
            table: table.into(),
        }
    }
}
