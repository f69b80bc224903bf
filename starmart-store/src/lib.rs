//! PostgreSQL side of the pipeline: connection configuration, the atomic
//! bulk loader, post-load validation, and the schema preflight.

pub mod config;
pub mod error;
pub mod loader;
pub mod postload;
pub mod preflight;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use loader::{BulkLoader, LoadSummary};
