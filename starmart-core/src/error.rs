//! Error types for the core data model.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors from reading, decoding, or deriving core table data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Expected input file does not exist.
    #[error("missing input file: {path}")]
    MissingInput { path: String },

    /// Table exists but has zero data rows.
    #[error("{table} is empty")]
    EmptySource { table: String },

    /// Date string does not parse under the expected calendar format.
    #[error("malformed date: '{value}'")]
    MalformedDate { value: String },

    /// Header row lacks a column the contract requires.
    #[error("{table} is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Cell value does not parse as the contracted type.
    #[error("{table}.{column}: invalid value '{value}'")]
    InvalidValue {
        table: String,
        column: String,
        value: String,
    },

    /// Structural CSV error (unterminated quote, stray quote).
    #[error("CSV parse error at line {line}: {message}")]
    Csv { line: usize, message: String },

    /// Filesystem error while reading or writing a table.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a missing input error.
    pub fn missing_input(path: impl Into<String>) -> Self {
        CoreError::MissingInput { path: path.into() }
    }

    /// Create an empty source error.
    pub fn empty_source(table: impl Into<String>) -> Self {
        CoreError::EmptySource {
            table: table.into(),
        }
    }

    /// Create a malformed date error.
    pub fn malformed_date(value: impl Into<String>) -> Self {
        CoreError::MalformedDate {
            value: value.into(),
        }
    }

    /// Create a missing column error.
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        CoreError::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(
        table: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        CoreError::InvalidValue {
            table: table.into(),
            column: column.into(),
            value: value.into(),
        }
    }
}
