//! Raw entity rows as produced by the upstream generator.
//!
//! These are the transactional shapes the transform consumes. Dates stay as
//! strings at this layer; the transform decides where parsing is strict
//! (fact grain) and where it is lenient (the time-dimension scan).

use crate::csv::{self, Header, Record};
use crate::error::Result;

/// One raw client row (`clients.csv`).
#[derive(Debug, Clone, PartialEq)]
pub struct RawClient {
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

impl Record for RawClient {
    const TABLE: &'static str = "clients";
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
        Ok(RawClient {
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

/// One raw policy row (`policies.csv`).
#[derive(Debug, Clone, PartialEq)]
pub struct RawPolicy {
    pub policy_id: String,
    pub policy_number: String,
    pub client_id: String,
    pub state_code: String,
    pub region_code: String,
    pub is_renewal: bool,
    pub line_of_business: String,
    pub plan_name: String,
    pub effective_date: String,
    pub expiration_date: String,
    pub status: String,
    pub risk_score: f64,
    pub monthly_premium: f64,
    pub annual_premium: f64,
}

impl Record for RawPolicy {
    const TABLE: &'static str = "policies";
    const COLUMNS: &'static [&'static str] = &[
        "policy_id",
        "policy_number",
        "client_id",
        "state_code",
        "region_code",
        "is_renewal",
        "line_of_business",
        "plan_name",
        "effective_date",
        "expiration_date",
        "status",
        "risk_score",
        "monthly_premium",
        "annual_premium",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(RawPolicy {
            policy_id: get("policy_id")?.to_string(),
            policy_number: get("policy_number")?.to_string(),
            client_id: get("client_id")?.to_string(),
            state_code: get("state_code")?.to_string(),
            region_code: get("region_code")?.to_string(),
            is_renewal: csv::parse_bool(t, "is_renewal", get("is_renewal")?)?,
            line_of_business: get("line_of_business")?.to_string(),
            plan_name: get("plan_name")?.to_string(),
            effective_date: get("effective_date")?.to_string(),
            expiration_date: get("expiration_date")?.to_string(),
            status: get("status")?.to_string(),
            risk_score: csv::parse_f64(t, "risk_score", get("risk_score")?)?,
            monthly_premium: csv::parse_f64(t, "monthly_premium", get("monthly_premium")?)?,
            annual_premium: csv::parse_f64(t, "annual_premium", get("annual_premium")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.policy_id.clone());
        row.push(self.policy_number.clone());
        row.push(self.client_id.clone());
        row.push(self.state_code.clone());
        row.push(self.region_code.clone());
        row.push(self.is_renewal.to_string());
        row.push(self.line_of_business.clone());
        row.push(self.plan_name.clone());
        row.push(self.effective_date.clone());
        row.push(self.expiration_date.clone());
        row.push(self.status.clone());
        row.push(self.risk_score.to_string());
        row.push(self.monthly_premium.to_string());
        row.push(self.annual_premium.to_string());
    }
}

/// One raw claim row (`claims.csv`).
///
/// `fraud_flag` may be missing as a column entirely in older generator
/// output; both an absent column and an empty cell decode as `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawClaim {
    pub claim_id: String,
    pub policy_id: String,
    pub claim_type: String,
    pub claim_status: String,
    pub fraud_flag: bool,
    pub incident_date: String,
    pub report_date: String,
    pub claim_amount_requested: f64,
    pub claim_amount_approved: f64,
    pub claim_amount_paid: f64,
}

impl Record for RawClaim {
    const TABLE: &'static str = "claims";
    const COLUMNS: &'static [&'static str] = &[
        "claim_id",
        "policy_id",
        "claim_type",
        "claim_status",
        "fraud_flag",
        "incident_date",
        "report_date",
        "claim_amount_requested",
        "claim_amount_approved",
        "claim_amount_paid",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        let fraud_flag = header
            .find("fraud_flag")
            .map(|idx| csv::truthy(csv::cell(row, idx)))
            .unwrap_or(false);
        Ok(RawClaim {
            claim_id: get("claim_id")?.to_string(),
            policy_id: get("policy_id")?.to_string(),
            claim_type: get("claim_type")?.to_string(),
            claim_status: get("claim_status")?.to_string(),
            fraud_flag,
            incident_date: get("incident_date")?.to_string(),
            report_date: get("report_date")?.to_string(),
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
        row.push(self.claim_type.clone());
        row.push(self.claim_status.clone());
        row.push(if self.fraud_flag { "1" } else { "0" }.to_string());
        row.push(self.incident_date.clone());
        row.push(self.report_date.clone());
        row.push(self.claim_amount_requested.to_string());
        row.push(self.claim_amount_approved.to_string());
        row.push(self.claim_amount_paid.to_string());
    }
}

/// One raw expense row (`expenses.csv`). Month-grained.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExpense {
    pub expense_id: String,
    pub expense_category: String,
    pub state_code: String,
    pub region_code: String,
    pub expense_month: String,
    pub expense_amount: f64,
}

impl Record for RawExpense {
    const TABLE: &'static str = "expenses";
    const COLUMNS: &'static [&'static str] = &[
        "expense_id",
        "expense_category",
        "state_code",
        "region_code",
        "expense_month",
        "expense_amount",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        Ok(RawExpense {
            expense_id: get("expense_id")?.to_string(),
            expense_category: get("expense_category")?.to_string(),
            state_code: get("state_code")?.to_string(),
            region_code: get("region_code")?.to_string(),
            expense_month: get("expense_month")?.to_string(),
            expense_amount: csv::parse_f64(t, "expense_amount", get("expense_amount")?)?,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.expense_id.clone());
        row.push(self.expense_category.clone());
        row.push(self.state_code.clone());
        row.push(self.region_code.clone());
        row.push(self.expense_month.clone());
        row.push(self.expense_amount.to_string());
    }
}

/// One raw tax row (`taxes.csv`).
///
/// `tax_base` is an optional column; when absent or empty the fact builder
/// derives it from the amount and the rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTax {
    pub tax_id: String,
    pub policy_id: String,
    pub state_code: String,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub tax_base: Option<f64>,
}

impl Record for RawTax {
    const TABLE: &'static str = "taxes";
    const COLUMNS: &'static [&'static str] = &[
        "tax_id",
        "policy_id",
        "state_code",
        "tax_rate",
        "tax_amount",
        "tax_base",
    ];

    fn decode(header: &Header, row: &[String]) -> Result<Self> {
        let t = Self::TABLE;
        let get = |col: &str| -> Result<&str> { Ok(csv::cell(row, header.require(t, col)?)) };
        let tax_base = match header.find("tax_base") {
            Some(idx) => csv::parse_opt_f64(t, "tax_base", csv::cell(row, idx))?,
            None => None,
        };
        Ok(RawTax {
            tax_id: get("tax_id")?.to_string(),
            policy_id: get("policy_id")?.to_string(),
            state_code: get("state_code")?.to_string(),
            tax_rate: csv::parse_f64(t, "tax_rate", get("tax_rate")?)?,
            tax_amount: csv::parse_f64(t, "tax_amount", get("tax_amount")?)?,
            tax_base,
        })
    }

    fn encode(&self, row: &mut Vec<String>) {
        row.push(self.tax_id.clone());
        row.push(self.policy_id.clone());
        row.push(self.state_code.clone());
        row.push(self.tax_rate.to_string());
        row.push(self.tax_amount.to_string());
        row.push(
            self.tax_base
                .map(|v| v.to_string())
                .unwrap_or_default(),
        );
    }
}

/// The five raw tables as one dataset.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub clients: Vec<RawClient>,
    pub policies: Vec<RawPolicy>,
    pub claims: Vec<RawClaim>,
    pub expenses: Vec<RawExpense>,
    pub taxes: Vec<RawTax>,
}
