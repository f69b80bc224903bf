//! Dimensional transform: raw entity tables in, star schema out.
//!
//! The transform is a pure function of its inputs. Dimensions are built
//! first, then facts; both sides derive surrogate keys through
//! `starmart_core::keys` so they always agree.

pub mod dims;
pub mod error;
pub mod facts;

pub use error::{Result, TransformError};

use tracing::info;

use starmart_core::raw::RawDataset;
use starmart_core::star::StarSchema;

/// Run the full dimensional transform over one raw dataset.
pub fn build_star_schema(raw: &RawDataset) -> Result<StarSchema> {
    let star = StarSchema {
        dim_time: dims::build_time_dimension(&raw.policies, &raw.claims)?,
        dim_state: dims::build_state_dimension(&raw.clients)?,
        dim_clients: dims::build_client_dimension(&raw.clients)?,
        dim_products: dims::build_product_dimension(&raw.policies)?,
        dim_policies: dims::build_policy_dimension(&raw.policies)?,
        fact_policies: facts::build_policy_facts(&raw.policies)?,
        fact_claims: facts::build_claim_facts(&raw.claims, &raw.policies)?,
        fact_expenses: facts::build_expense_facts(&raw.expenses)?,
        fact_taxes: facts::build_tax_facts(&raw.taxes)?,
    };
    for (table, rows) in star.row_counts() {
        info!(table, rows, "transformed");
    }
    Ok(star)
}
