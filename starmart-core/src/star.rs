//! Star-schema row types: five dimensions and four fact tables.
//!
//! Column order in each `COLUMNS` constant is the staged-file order and the
//! store COPY order. Keep them in sync with the provisioned DDL.

use chrono::{Datelike, NaiveDate};

use crate::csv::{self, Header, Record};
use crate::error::Result;
use crate::keys;

fn opt_i32_cell(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_f64_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_str_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_str(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// One calendar day of `dim_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDay {
    pub date_key: i32,
    pub full_date: String,
    pub year: i32,
    pub month: i32,
    pub month_name: String,
    pub quarter: i32,
    pub year_month: String,
    pub day_of_week: i32,
    pub is_weekend: bool,
}

impl TimeDay {
    /// Derive the full calendar attribute set for one date.
    pub fn for_date(date: NaiveDate) -> Self {
        let month = date.month() as i32;
        let day_of_week = date.weekday().number_from_monday() as i32;
        TimeDay {
            date_key: keys::date_key(date),
            full_date: date.format("%Y-%m-%d").to_string(),
            year: date.year(),
            month,
            month_name: date.format("%B").to_string(),
            quarter: (month + 2) / 3,
            year_month: date.format("%Y-%m").to_string(),
            day_of_week,
            is_weekend: day_of_week >= 6,
        }
    }
}

impl Record for TimeDay {
    const TABLE: &'static str = "dim_time";
    const COLUMNS: &'static [&'static str] = &[
        "date_key",
        "full_date",
        "year",
        "month",
        "month_name",
        "quarter",
        "year_month",
        "day_of_week",
        "is_weekend",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(TimeDay {
            date_key: csv::parse_i32(t, "date_key", get("date_key")?)?,
            full_date: get("full_date")?.to_string(),
            year: csv::parse_i32(t, "year", get("year")?)?,
            month: csv::parse_i32(t, "month", get("month")?)?,
            month_name: get("month_name")?.to_string(),
            quarter: csv::parse_i32(t, "quarter", get("quarter")?)?,
            year_month: get("year_month")?.to_string(),
            day_of_week: csv::parse_i32(t, "day_of_week", get("day_of_week")?)?,
            is_weekend: csv::parse_bool(t, "is_weekend", get("is_weekend")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.date_key.to_string());
        row.push(self.full_date.clone());
        row.push(self.year.to_string());
        row.push(self.month.to_string());
        row.push(self.month_name.clone());
        row.push(self.quarter.to_string());
        row.push(self.year_month.clone());
        row.push(self.day_of_week.to_string());
        row.push(self.is_weekend.to_string());
    }
}

/// One row of `dim_state`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDim {
    pub state_code: String,
    pub region_code: String,
    pub market_tier: String,
}

impl Record for StateDim {
    const TABLE: &'static str = "dim_state";
    const COLUMNS: &'static [&'static str] = &["state_code", "region_code", "market_tier"];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(StateDim {
            state_code: get("state_code")?.to_string(),
            region_code: get("region_code")?.to_string(),
            market_tier: get("market_tier")?.to_string(),
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.state_code.clone());
        row.push(self.region_code.clone());
        row.push(self.market_tier.clone());
    }
}

/// One row of `dim_clients`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDim {
    pub client_id: String,
    pub registration_year: i32,
    pub age: i32,
    pub gender: String,
    pub customer_segment: String,
    pub state_code: String,
    pub region_code: String,
    pub market_tier: String,
    pub max_policies_allowed: i32,
}

impl Record for ClientDim {
    const TABLE: &'static str = "dim_clients";
    const COLUMNS: &'static [&'static str] = &[
        "client_id",
        "registration_year",
        "age",
        "gender",
        "customer_segment",
        "state_code",
        "region_code",
        "market_tier",
        "max_policies_allowed",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(ClientDim {
            client_id: get("client_id")?.to_string(),
            registration_year: csv::parse_i32(t, "registration_year", get("registration_year")?)?,
            age: csv::parse_i32(t, "age", get("age")?)?,
            gender: get("gender")?.to_string(),
            customer_segment: get("customer_segment")?.to_string(),
            state_code: get("state_code")?.to_string(),
            region_code: get("region_code")?.to_string(),
            market_tier: get("market_tier")?.to_string(),
            max_policies_allowed: csv::parse_i32(
                t,
                "max_policies_allowed",
                get("max_policies_allowed")?,
            )?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.client_id.clone());
        row.push(self.registration_year.to_string());
        row.push(self.age.to_string());
        row.push(self.gender.clone());
        row.push(self.customer_segment.clone());
        row.push(self.state_code.clone());
        row.push(self.region_code.clone());
        row.push(self.market_tier.clone());
        row.push(self.max_policies_allowed.to_string());
    }
}

/// One row of `dim_products`. `product_key` is derived, see [`keys::product_key`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDim {
    pub product_key: String,
    pub line_of_business: String,
    pub plan_name: String,
}

impl Record for ProductDim {
    const TABLE: &'static str = "dim_products";
    const COLUMNS: &'static [&'static str] = &["product_key", "line_of_business", "plan_name"];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(ProductDim {
            product_key: get("product_key")?.to_string(),
            line_of_business: get("line_of_business")?.to_string(),
            plan_name: get("plan_name")?.to_string(),
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.product_key.clone());
        row.push(self.line_of_business.clone());
        row.push(self.plan_name.clone());
    }
}

/// One row of `dim_policies`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDim {
    pub policy_id: String,
    pub policy_number: String,
    pub client_id: String,
    pub state_code: String,
    pub region_code: String,
    pub is_renewal: bool,
}

impl Record for PolicyDim {
    const TABLE: &'static str = "dim_policies";
    const COLUMNS: &'static [&'static str] = &[
        "policy_id",
        "policy_number",
        "client_id",
        "state_code",
        "region_code",
        "is_renewal",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(PolicyDim {
            policy_id: get("policy_id")?.to_string(),
            policy_number: get("policy_number")?.to_string(),
            client_id: get("client_id")?.to_string(),
            state_code: get("state_code")?.to_string(),
            region_code: get("region_code")?.to_string(),
            is_renewal: csv::parse_bool(t, "is_renewal", get("is_renewal")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.policy_id.clone());
        row.push(self.policy_number.clone());
        row.push(self.client_id.clone());
        row.push(self.state_code.clone());
        row.push(self.region_code.clone());
        row.push(self.is_renewal.to_string());
    }
}

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// One row of `fact_policies`.
#[derive(Debug, Clone, PartialEq)]
pub struct FactPolicy {
    pub policy_id: String,
    pub product_key: String,
    pub state_code: String,
    pub region_code: String,
    pub effective_date_key: i32,
    pub expiration_date_key: i32,
    pub policy_year: i32,
    pub policy_month: i32,
    pub status: String,
    pub risk_score: f64,
    pub monthly_premium: f64,
    pub annual_premium: f64,
}

impl Record for FactPolicy {
    const TABLE: &'static str = "fact_policies";
    const COLUMNS: &'static [&'static str] = &[
        "policy_id",
        "product_key",
        "state_code",
        "region_code",
        "effective_date_key",
        "expiration_date_key",
        "policy_year",
        "policy_month",
        "status",
        "risk_score",
        "monthly_premium",
        "annual_premium",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(FactPolicy {
            policy_id: get("policy_id")?.to_string(),
            product_key: get("product_key")?.to_string(),
            state_code: get("state_code")?.to_string(),
            region_code: get("region_code")?.to_string(),
            effective_date_key: csv::parse_i32(t, "effective_date_key", get("effective_date_key")?)?,
            expiration_date_key: csv::parse_i32(
                t,
                "expiration_date_key",
                get("expiration_date_key")?,
            )?,
            policy_year: csv::parse_i32(t, "policy_year", get("policy_year")?)?,
            policy_month: csv::parse_i32(t, "policy_month", get("policy_month")?)?,
            status: get("status")?.to_string(),
            risk_score: csv::parse_f64(t, "risk_score", get("risk_score")?)?,
            monthly_premium: csv::parse_f64(t, "monthly_premium", get("monthly_premium")?)?,
            annual_premium: csv::parse_f64(t, "annual_premium", get("annual_premium")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.policy_id.clone());
        row.push(self.product_key.clone());
        row.push(self.state_code.clone());
        row.push(self.region_code.clone());
        row.push(self.effective_date_key.to_string());
        row.push(self.expiration_date_key.to_string());
        row.push(self.policy_year.to_string());
        row.push(self.policy_month.to_string());
        row.push(self.status.clone());
        row.push(self.risk_score.to_string());
        row.push(self.monthly_premium.to_string());
        row.push(self.annual_premium.to_string());
    }
}

/// One row of `fact_claims`.
///
/// The enrichment columns (product_key, line_of_business, state_code,
/// region_code) come from a left join against the raw policy table. A claim
/// whose policy was never seen keeps `None` enrichment and is surfaced by the
/// validator rather than silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FactClaim {
    pub claim_id: String,
    pub policy_id: String,
    pub product_key: Option<String>,
    pub line_of_business: Option<String>,
    pub state_code: Option<String>,
    pub region_code: Option<String>,
    pub claim_type: String,
    pub claim_status: String,
    pub fraud_flag: bool,
    pub incident_date_key: i32,
    pub report_date_key: i32,
    pub settlement_date_key: Option<i32>,
    pub days_to_settle: Option<i32>,
    pub claim_amount_requested: f64,
    pub claim_amount_approved: f64,
    pub claim_amount_paid: f64,
}

impl Record for FactClaim {
    const TABLE: &'static str = "fact_claims";
    const COLUMNS: &'static [&'static str] = &[
        "claim_id",
        "policy_id",
        "product_key",
        "line_of_business",
        "state_code",
        "region_code",
        "claim_type",
        "claim_status",
        "fraud_flag",
        "incident_date_key",
        "report_date_key",
        "settlement_date_key",
        "days_to_settle",
        "claim_amount_requested",
        "claim_amount_approved",
        "claim_amount_paid",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(FactClaim {
            claim_id: get("claim_id")?.to_string(),
            policy_id: get("policy_id")?.to_string(),
            product_key: opt_str(get("product_key")?),
            line_of_business: opt_str(get("line_of_business")?),
            state_code: opt_str(get("state_code")?),
            region_code: opt_str(get("region_code")?),
            claim_type: get("claim_type")?.to_string(),
            claim_status: get("claim_status")?.to_string(),
            fraud_flag: csv::truthy(get("fraud_flag")?),
            incident_date_key: csv::parse_i32(t, "incident_date_key", get("incident_date_key")?)?,
            report_date_key: csv::parse_i32(t, "report_date_key", get("report_date_key")?)?,
            settlement_date_key: csv::parse_opt_i32(
                t,
                "settlement_date_key",
                get("settlement_date_key")?,
            )?,
            days_to_settle: csv::parse_opt_i32(t, "days_to_settle", get("days_to_settle")?)?,
            claim_amount_requested: csv::parse_f64(
                t,
                "claim_amount_requested",
                get("claim_amount_requested")?,
            )?,
            claim_amount_approved: csv::parse_f64(
                t,
                "claim_amount_approved",
                get("claim_amount_approved")?,
            )?,
            claim_amount_paid: csv::parse_f64(t, "claim_amount_paid", get("claim_amount_paid")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.claim_id.clone());
        row.push(self.policy_id.clone());
        row.push(opt_str_cell(&self.product_key));
        row.push(opt_str_cell(&self.line_of_business));
        row.push(opt_str_cell(&self.state_code));
        row.push(opt_str_cell(&self.region_code));
        row.push(self.claim_type.clone());
        row.push(self.claim_status.clone());
        row.push(if self.fraud_flag { "1" } else { "0" }.to_string());
        row.push(self.incident_date_key.to_string());
        row.push(self.report_date_key.to_string());
        row.push(opt_i32_cell(self.settlement_date_key));
        row.push(opt_i32_cell(self.days_to_settle));
        row.push(self.claim_amount_requested.to_string());
        row.push(self.claim_amount_approved.to_string());
        row.push(self.claim_amount_paid.to_string());
    }
}

/// One row of `fact_expenses`. Month-grained; `date_key` is always a
/// first-of-month key.
#[derive(Debug, Clone, PartialEq)]
pub struct FactExpense {
    pub expense_id: String,
    pub expense_category: String,
    pub state_code: String,
    pub region_code: String,
    pub date_key: i32,
    pub expense_amount: f64,
}

impl Record for FactExpense {
    const TABLE: &'static str = "fact_expenses";
    const COLUMNS: &'static [&'static str] = &[
        "expense_id",
        "expense_category",
        "state_code",
        "region_code",
        "date_key",
        "expense_amount",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(FactExpense {
            expense_id: get("expense_id")?.to_string(),
            expense_category: get("expense_category")?.to_string(),
            state_code: get("state_code")?.to_string(),
            region_code: get("region_code")?.to_string(),
            date_key: csv::parse_i32(t, "date_key", get("date_key")?)?,
            expense_amount: csv::parse_f64(t, "expense_amount", get("expense_amount")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.expense_id.clone());
        row.push(self.expense_category.clone());
        row.push(self.state_code.clone());
        row.push(self.region_code.clone());
        row.push(self.date_key.to_string());
        row.push(self.expense_amount.to_string());
    }
}

/// One row of `fact_taxes`. `date_key` is NULL by design (the tax feed
/// carries no event date); `tax_type` is a constant classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FactTax {
    pub tax_id: String,
    pub policy_id: String,
    pub tax_type: String,
    pub state_code: String,
    pub date_key: Option<i32>,
    pub tax_base: Option<f64>,
    pub tax_rate: f64,
    pub tax_amount: f64,
}

impl Record for FactTax {
    const TABLE: &'static str = "fact_taxes";
    const COLUMNS: &'static [&'static str] = &[
        "tax_id",
        "policy_id",
        "tax_type",
        "state_code",
        "date_key",
        "tax_base",
        "tax_rate",
        "tax_amount",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(FactTax {
            tax_id: get("tax_id")?.to_string(),
            policy_id: get("policy_id")?.to_string(),
            tax_type: get("tax_type")?.to_string(),
            state_code: get("state_code")?.to_string(),
            date_key: csv::parse_opt_i32(t, "date_key", get("date_key")?)?,
            tax_base: csv::parse_opt_f64(t, "tax_base", get("tax_base")?)?,
            tax_rate: csv::parse_f64(t, "tax_rate", get("tax_rate")?)?,
            tax_amount: csv::parse_f64(t, "tax_amount", get("tax_amount")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.tax_id.clone());
        row.push(self.policy_id.clone());
        row.push(self.tax_type.clone());
        row.push(self.state_code.clone());
        row.push(opt_i32_cell(self.date_key));
        row.push(opt_f64_cell(self.tax_base));
        row.push(self.tax_rate.to_string());
        row.push(self.tax_amount.to_string());
    }
}

// ---------------------------------------------------------------------------
// Schema aggregate
// ---------------------------------------------------------------------------

/// The full star schema produced by one transform run.
#[derive(Debug, Clone, Default)]
pub struct StarSchema {
    pub dim_time: Vec<TimeDay>,
    pub dim_state: Vec<StateDim>,
    pub dim_clients: Vec<ClientDim>,
    pub dim_products: Vec<ProductDim>,
    pub dim_policies: Vec<PolicyDim>,
    pub fact_policies: Vec<FactPolicy>,
    pub fact_claims: Vec<FactClaim>,
    pub fact_expenses: Vec<FactExpense>,
    pub fact_taxes: Vec<FactTax>,
}

impl StarSchema {
    /// Row counts per table, in load order. Used for summary logging.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (TimeDay::TABLE, self.dim_time.len()),
            (StateDim::TABLE, self.dim_state.len()),
            (ClientDim::TABLE, self.dim_clients.len()),
            (ProductDim::TABLE, self.dim_products.len()),
            (PolicyDim::TABLE, self.dim_policies.len()),
            (FactPolicy::TABLE, self.fact_policies.len()),
            (FactClaim::TABLE, self.fact_claims.len()),
            (FactExpense::TABLE, self.fact_expenses.len()),
            (FactTax::TABLE, self.fact_taxes.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_day_attributes() {
        // 2024-03-09 is a Saturday.
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let day = TimeDay::for_date(d);
        assert_eq!(day.date_key, 20240309);
        assert_eq!(day.full_date, "2024-03-09");
        assert_eq!(day.month_name, "March");
        assert_eq!(day.quarter, 1);
        assert_eq!(day.year_month, "2024-03");
        assert_eq!(day.day_of_week, 6);
        assert!(day.is_weekend);
    }

    #[test]
    fn time_day_weekday() {
        // 2024-10-02 is a Wednesday in Q4.
        let day = TimeDay::for_date(NaiveDate::from_ymd_opt(2024, 10, 2).unwrap());
        assert_eq!(day.quarter, 4);
        assert_eq!(day.day_of_week, 3);
        assert!(!day.is_weekend);
    }

    #[test]
    fn fact_claim_encodes_fraud_flag_as_digit() {
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
            incident_date_key: 20240201,
            report_date_key: 20240203,
            settlement_date_key: None,
            days_to_settle: None,
            claim_amount_requested: 1000.0,
            claim_amount_approved: 800.0,
            claim_amount_paid: 0.0,
        };
        let mut row = Vec::new();
        claim.encode(&mut row);
        assert_eq!(row.len(), FactClaim::COLUMNS.len());
        assert_eq!(row[8], "1");
        assert_eq!(row[11], ""); // settlement_date_key NULL
    }

    #[test]
    fn fact_claim_none_enrichment_encodes_empty() {
        let claim = FactClaim {
            claim_id: "CL1".into(),
            policy_id: "GHOST".into(),
            product_key: None,
            line_of_business: None,
            state_code: None,
            region_code: None,
            claim_type: "FIRE".into(),
            claim_status: "OPEN".into(),
            fraud_flag: false,
            incident_date_key: 20240201,
            report_date_key: 20240203,
            settlement_date_key: None,
            days_to_settle: None,
            claim_amount_requested: 1.0,
            claim_amount_approved: 0.0,
            claim_amount_paid: 0.0,
        };
        let mut row = Vec::new();
        claim.encode(&mut row);
        assert_eq!(row[2], "");
        assert_eq!(row[4], "");
    }

    #[test]
    fn column_counts_match_encodes() {
        let day = TimeDay::for_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let mut row = Vec::new();
        day.encode(&mut row);
        assert_eq!(row.len(), TimeDay::COLUMNS.len());

        let tax = FactTax {
            tax_id: "T1".into(),
            policy_id: "P1".into(),
            tax_type: "PREMIUM_TAX".into(),
            state_code: "TX".into(),
            date_key: None,
            tax_base: Some(1000.0),
            tax_rate: 0.05,
            tax_amount: 50.0,
        };
        let mut row = Vec::new();
        tax.encode(&mut row);
        assert_eq!(row.len(), FactTax::COLUMNS.len());
        assert_eq!(row[4], ""); // date_key NULL by design
    }
}
