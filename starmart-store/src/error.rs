//! Error types for store access.

use thiserror::Error;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from connecting to, loading, or verifying the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection string was supplied by flag or environment.
    #[error("no database URL configured; pass --database-url or set DATABASE_URL")]
    MissingDatabaseUrl,

    /// The store could not be reached.
    #[error("failed to connect to the store: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// The bulk load transaction failed and was rolled back; the store keeps
    /// whatever state it had before the load began.
    #[error("bulk load rolled back: {source}")]
    LoadTransaction {
        #[source]
        source: sqlx::Error,
    },

    /// Required tables or views are not provisioned.
    #[error("store schema is missing: {}", names.join(", "))]
    MissingObjects { names: Vec<String> },

    /// Any other SQL error.
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(source: sqlx::Error) -> Self {
        StoreError::Connection { source }
    }

    /// Create a rolled-back load error.
    pub fn load_transaction(source: sqlx::Error) -> Self {
        StoreError::LoadTransaction { source }
    }
}
