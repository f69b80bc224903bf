//! Atomic bulk load: truncate-and-reload of all nine star tables inside a
//! single transaction.
//!
//! The store is never observed half-loaded: either the transaction commits
//! with every table replaced, or it rolls back and the previous contents
//! survive intact. Rows travel over the COPY protocol with the same CSV
//! encoding used for staged files.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};

use starmart_core::csv::Record;
use starmart_core::schema::TRUNCATE_ORDER;
use starmart_core::stage;
use starmart_core::star::StarSchema;

use crate::error::{Result, StoreError};

/// Rows written per table, in load order.
pub type LoadSummary = Vec<(&'static str, u64)>;

/// Loads a transformed star schema into the store.
pub struct BulkLoader {
    pool: PgPool,
}

impl BulkLoader {
    pub fn new(pool: PgPool) -> Self {
        BulkLoader { pool }
    }

    /// Replace the star schema's contents in one transaction.
    ///
    /// Any error rolls the whole load back and surfaces as
    /// [`StoreError::LoadTransaction`]; there is no retry.
    pub async fn load(&self, star: &StarSchema) -> Result<LoadSummary> {
        let mut tx = self.pool.begin().await?;
        match run_load(&mut tx, star).await {
            Ok(summary) => {
                tx.commit().await?;
                for (table, rows) in &summary {
                    info!(table, rows, "loaded");
                }
                Ok(summary)
            }
            Err(source) => {
                if let Err(error) = tx.rollback().await {
                    warn!(%error, "rollback after failed load also failed");
                }
                Err(StoreError::load_transaction(source))
            }
        }
    }
}

async fn run_load(
    tx: &mut Transaction<'_, Postgres>,
    star: &StarSchema,
) -> sqlx::Result<LoadSummary> {
    for table in TRUNCATE_ORDER {
        sqlx::query(&truncate_statement(table))
            .execute(&mut **tx)
            .await?;
    }

    // Dimensions first, then facts: the reverse of the truncate order.
    let mut summary = LoadSummary::new();
    summary.push(copy_table(tx, &star.dim_time).await?);
    summary.push(copy_table(tx, &star.dim_state).await?);
    summary.push(copy_table(tx, &star.dim_clients).await?);
    summary.push(copy_table(tx, &star.dim_products).await?);
    summary.push(copy_table(tx, &star.dim_policies).await?);
    summary.push(copy_table(tx, &star.fact_policies).await?);
    summary.push(copy_table(tx, &star.fact_claims).await?);
    summary.push(copy_table(tx, &star.fact_expenses).await?);
    summary.push(copy_table(tx, &star.fact_taxes).await?);
    Ok(summary)
}

async fn copy_table<R: Record>(
    tx: &mut Transaction<'_, Postgres>,
    records: &[R],
) -> sqlx::Result<(&'static str, u64)> {
    let statement = copy_statement::<R>();
    let mut copy = (&mut **tx).copy_in_raw(&statement).await?;
    copy.send(stage::encode_table(records)).await?;
    let rows = copy.finish().await?;
    Ok((R::TABLE, rows))
}

fn truncate_statement(table: &str) -> String {
    format!("TRUNCATE TABLE public.{table} CASCADE")
}

fn copy_statement<R: Record>() -> String {
    format!(
        "COPY public.{} ({}) FROM STDIN WITH CSV HEADER",
        R::TABLE,
        R::COLUMNS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use starmart_core::star::{FactClaim, FactTax, StateDim, TimeDay};

    #[test]
    fn truncate_statement_shape() {
        assert_eq!(
            truncate_statement("fact_claims"),
            "TRUNCATE TABLE public.fact_claims CASCADE"
        );
    }

    #[test]
    fn truncate_order_clears_facts_first() {
        assert_eq!(TRUNCATE_ORDER[0], "fact_claims");
        assert_eq!(TRUNCATE_ORDER[TRUNCATE_ORDER.len() - 1], "dim_time");
    }

    #[test]
    fn copy_statement_lists_contract_columns() {
        let statement = copy_statement::<StateDim>();
        assert_eq!(
            statement,
            "COPY public.dim_state (state_code, region_code, market_tier) FROM STDIN WITH CSV HEADER"
        );
    }

    #[test]
    fn copy_statement_covers_every_table() {
        for statement in [
            copy_statement::<TimeDay>(),
            copy_statement::<FactClaim>(),
            copy_statement::<FactTax>(),
        ] {
            assert!(statement.starts_with("COPY public."));
            assert!(statement.ends_with("FROM STDIN WITH CSV HEADER"));
        }
    }

    #[test]
    fn claim_payload_encodes_fraud_flag_as_digits() {
        let claim = FactClaim {
            claim_id: "CL1".into(),
            policy_id: "P1".into(),
            product_key: Some("AUTO_BASIC".into()),
            line_of_business: Some("Auto".into()),
            state_code: Some("TX".into()),
            region_code: Some("SOUTH".into()),
            claim_type: "COLLISION".into(),
            claim_status: "OPEN".into(),
            fraud_flag: true,
            incident_date_key: 20240110,
            report_date_key: 20240112,
            settlement_date_key: None,
            days_to_settle: None,
            claim_amount_requested: 500.0,
            claim_amount_approved: 400.0,
            claim_amount_paid: 0.0,
        };
        let payload = String::from_utf8(stage::encode_table(&[claim])).unwrap();
        let data_row = payload.lines().nth(1).unwrap();
        let cells: Vec<&str> = data_row.split(',').collect();
        assert_eq!(cells[8], "1");
    }
}
