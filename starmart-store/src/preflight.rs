//! Store preflight: connectivity and schema-existence checks run before a
//! load is attempted. Provisioning itself is external; this only verifies
//! the provisioned objects are actually there.

use std::collections::HashSet;

use sqlx::{PgPool, Row};
use tracing::debug;

use starmart_core::schema::{ANALYTICS_VIEWS, STAR_TABLES};

use crate::error::{Result, StoreError};

/// Round-trip a trivial query to prove the store is reachable.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    debug!("store reachable");
    Ok(())
}

/// Verify the nine star tables and four dashboard views exist in the public
/// schema. Missing objects are reported together in one error.
pub async fn check_schema(pool: &PgPool) -> Result<()> {
    let tables = existing(pool, "tables", &STAR_TABLES).await?;
    let views = existing(pool, "views", &ANALYTICS_VIEWS).await?;

    let mut missing: Vec<String> = STAR_TABLES
        .iter()
        .filter(|t| !tables.contains(**t))
        .map(|t| format!("table {t}"))
        .collect();
    missing.extend(
        ANALYTICS_VIEWS
            .iter()
            .filter(|v| !views.contains(**v))
            .map(|v| format!("view {v}")),
    );

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreError::MissingObjects { names: missing })
    }
}

async fn existing(pool: &PgPool, catalog: &str, names: &[&str]) -> Result<HashSet<String>> {
    let query = format!(
        "SELECT table_name FROM information_schema.{catalog} \
         WHERE table_schema = 'public' AND table_name = ANY($1)"
    );
    let wanted: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let rows = sqlx::query(&query).bind(&wanted).fetch_all(pool).await?;
    Ok(rows.iter().map(|row| row.get("table_name")).collect())
}
