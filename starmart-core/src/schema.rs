//! Table catalog: names, load ordering, and the analytics views the store
//! is expected to provision.

/// Classifier stamped on every tax fact.
pub const PREMIUM_TAX: &str = "PREMIUM_TAX";

/// All nine star tables, dimensions first.
pub const STAR_TABLES: [&str; 9] = [
    "dim_time",
    "dim_state",
    "dim_clients",
    "dim_products",
    "dim_policies",
    "fact_policies",
    "fact_claims",
    "fact_expenses",
    "fact_taxes",
];

/// Truncate order: facts before the dimensions they reference, and within
/// each group children before parents (fact_policies last among facts,
/// dim_time last overall).
pub const TRUNCATE_ORDER: [&str; 9] = [
    "fact_claims",
    "fact_expenses",
    "fact_taxes",
    "fact_policies",
    "dim_policies",
    "dim_products",
    "dim_clients",
    "dim_state",
    "dim_time",
];

/// Load order: dimensions before the facts that reference them.
pub const LOAD_ORDER: [&str; 9] = [
    "dim_time",
    "dim_state",
    "dim_clients",
    "dim_products",
    "dim_policies",
    "fact_policies",
    "fact_claims",
    "fact_expenses",
    "fact_taxes",
];

/// Dashboard views checked after every load.
pub const ANALYTICS_VIEWS: [&str; 4] = [
    "vw_dash_exec_portfolio",
    "vw_dash_claims_loss",
    "vw_dash_operations_daily",
    "vw_dash_risk_daily",
];
