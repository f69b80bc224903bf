//! Post-load validation: re-check the loaded star schema through SQL.
//!
//! Runs after the load transaction commits. Failures here are diagnostic;
//! the committed data stays in place and the operator decides what to do.

use sqlx::{PgPool, Row};
use tracing::debug;

use starmart_check::{CheckKind, ValidationReport};
use starmart_core::schema::{ANALYTICS_VIEWS, LOAD_ORDER};

use crate::error::Result;

/// One enforced foreign-key relationship re-checked in the store.
struct FkCheck {
    child: &'static str,
    child_col: &'static str,
    parent: &'static str,
    parent_col: &'static str,
}

/// Every enforced relationship of the star schema. Advisory keys
/// (expiration_date_key, settlement_date_key) are deliberately absent.
const FK_CHECKS: &[FkCheck] = &[
    fk("dim_clients", "state_code", "dim_state", "state_code"),
    fk("dim_policies", "client_id", "dim_clients", "client_id"),
    fk("dim_policies", "state_code", "dim_state", "state_code"),
    fk("fact_policies", "policy_id", "dim_policies", "policy_id"),
    fk("fact_policies", "product_key", "dim_products", "product_key"),
    fk("fact_policies", "state_code", "dim_state", "state_code"),
    fk("fact_policies", "effective_date_key", "dim_time", "date_key"),
    fk("fact_claims", "policy_id", "dim_policies", "policy_id"),
    fk("fact_claims", "product_key", "dim_products", "product_key"),
    fk("fact_claims", "state_code", "dim_state", "state_code"),
    fk("fact_claims", "incident_date_key", "dim_time", "date_key"),
    fk("fact_claims", "report_date_key", "dim_time", "date_key"),
    fk("fact_expenses", "date_key", "dim_time", "date_key"),
    fk("fact_expenses", "state_code", "dim_state", "state_code"),
    fk("fact_taxes", "policy_id", "dim_policies", "policy_id"),
    fk("fact_taxes", "state_code", "dim_state", "state_code"),
];

const fn fk(
    child: &'static str,
    child_col: &'static str,
    parent: &'static str,
    parent_col: &'static str,
) -> FkCheck {
    FkCheck {
        child,
        child_col,
        parent,
        parent_col,
    }
}

impl FkCheck {
    fn subject(&self) -> String {
        format!("{}.{} -> {}", self.child, self.child_col, self.parent)
    }

    /// Count child rows whose non-null key has no parent.
    fn query(&self) -> String {
        format!(
            "SELECT COUNT(*) AS n FROM public.{child} c \
             LEFT JOIN public.{parent} p ON c.{ccol} = p.{pcol} \
             WHERE c.{ccol} IS NOT NULL AND p.{pcol} IS NULL",
            child = self.child,
            parent = self.parent,
            ccol = self.child_col,
            pcol = self.parent_col,
        )
    }
}

/// Run the full post-load check suite against the live store.
pub async fn validate(pool: &PgPool) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();

    for table in LOAD_ORDER {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM public.{table}"))
            .fetch_one(pool)
            .await?;
        let count: i64 = row.get("n");
        if count == 0 {
            report.fail(CheckKind::RowCount, table, "no rows after load");
        } else {
            report.pass(CheckKind::RowCount, table);
        }
    }

    for check in FK_CHECKS {
        let row = sqlx::query(&check.query()).fetch_one(pool).await?;
        let orphans: i64 = row.get("n");
        if orphans > 0 {
            report.fail(
                CheckKind::ReferentialIntegrity,
                check.subject(),
                format!("{orphans} orphan rows"),
            );
        } else {
            report.pass(CheckKind::ReferentialIntegrity, check.subject());
        }
    }

    // A view that errors or returns nothing is equally unusable for the
    // dashboards, so both outcomes fail the check rather than abort the run.
    for view in ANALYTICS_VIEWS {
        let probe = sqlx::query(&format!("SELECT 1 FROM public.{view} LIMIT 1"))
            .fetch_optional(pool)
            .await;
        match probe {
            Ok(Some(_)) => report.pass(CheckKind::ViewExecution, view),
            Ok(None) => report.fail(CheckKind::ViewExecution, view, "returned no rows"),
            Err(error) => report.fail(CheckKind::ViewExecution, view, error.to_string()),
        }
    }

    let (passed, warned, failed) = report.tally();
    debug!(passed, warned, failed, "post-load validation finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fk_query_shape() {
        let check = fk("fact_claims", "report_date_key", "dim_time", "date_key");
        assert_eq!(
            check.query(),
            "SELECT COUNT(*) AS n FROM public.fact_claims c \
             LEFT JOIN public.dim_time p ON c.report_date_key = p.date_key \
             WHERE c.report_date_key IS NOT NULL AND p.date_key IS NULL"
        );
        assert_eq!(check.subject(), "fact_claims.report_date_key -> dim_time");
    }

    #[test]
    fn advisory_keys_are_not_enforced() {
        assert!(!FK_CHECKS
            .iter()
            .any(|c| c.child_col == "expiration_date_key" || c.child_col == "settlement_date_key"));
    }

    #[test]
    fn every_fact_table_is_covered() {
        for table in ["fact_policies", "fact_claims", "fact_expenses", "fact_taxes"] {
            assert!(FK_CHECKS.iter().any(|c| c.child == table), "{table}");
        }
    }
}
