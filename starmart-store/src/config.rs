//! Store configuration.

use sqlx::PgPool;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Connection settings for the analytics store, resolved once at process
/// start and threaded into every stage that touches the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    database_url: String,
}

impl StoreConfig {
    /// Resolve the configuration from an optional explicit URL (flag or
    /// environment, the CLI decides precedence). Absence is fatal before any
    /// stage runs.
    pub fn resolve(database_url: Option<String>) -> Result<Self> {
        match database_url {
            Some(url) if !url.trim().is_empty() => Ok(StoreConfig { database_url: url }),
            _ => Err(StoreError::MissingDatabaseUrl),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Open a connection pool against the configured store.
    pub async fn connect(&self) -> Result<PgPool> {
        debug!("connecting to store");
        PgPool::connect(&self.database_url)
            .await
            .map_err(StoreError::connection)
    }
}
