//! Fact builders.
//!
//! Unlike the time-dimension scan, fact builders parse dates strictly: a
//! malformed date in a fact-grain column is a hard error, because a fact row
//! with a silently wrong date key would corrupt every date join downstream.

use std::collections::HashMap;

use chrono::Datelike;
use tracing::debug;

use starmart_core::keys;
use starmart_core::raw::{RawClaim, RawExpense, RawPolicy, RawTax};
use starmart_core::schema::PREMIUM_TAX;
use starmart_core::star::{FactClaim, FactExpense, FactPolicy, FactTax};

use crate::error::{Result, TransformError};

/// Build `fact_policies`: one row per raw policy row, with derived date keys
/// and the product key shared with `dim_products`.
pub fn build_policy_facts(policies: &[RawPolicy]) -> Result<Vec<FactPolicy>> {
    if policies.is_empty() {
        return Err(TransformError::empty_source("policies"));
    }
    policies
        .iter()
        .map(|p| {
            let effective = keys::parse_date(&p.effective_date)?;
            let expiration = keys::parse_date(&p.expiration_date)?;
            Ok(FactPolicy {
                policy_id: p.policy_id.clone(),
                product_key: keys::product_key(&p.line_of_business, &p.plan_name),
                state_code: p.state_code.clone(),
                region_code: p.region_code.clone(),
                effective_date_key: keys::date_key(effective),
                expiration_date_key: keys::date_key(expiration),
                policy_year: effective.year(),
                policy_month: effective.month() as i32,
                status: p.status.clone(),
                risk_score: p.risk_score,
                monthly_premium: p.monthly_premium,
                annual_premium: p.annual_premium,
            })
        })
        .collect()
}

/// Build `fact_claims`: left join each claim against the raw policy table on
/// policy_id. An unmatched claim keeps `None` enrichment columns so the
/// validator can surface it; it is never dropped here.
///
/// settlement_date_key and days_to_settle are reserved columns with no
/// upstream feed yet, so every row carries `None`.
pub fn build_claim_facts(claims: &[RawClaim], policies: &[RawPolicy]) -> Result<Vec<FactClaim>> {
    if claims.is_empty() {
        return Err(TransformError::empty_source("claims"));
    }
    // First occurrence wins, matching the policy dimension's dedupe.
    let mut by_id: HashMap<&str, &RawPolicy> = HashMap::new();
    for policy in policies {
        by_id.entry(policy.policy_id.as_str()).or_insert(policy);
    }

    let mut unmatched = 0usize;
    let facts = claims
        .iter()
        .map(|c| {
            let matched = by_id.get(c.policy_id.as_str());
            if matched.is_none() {
                unmatched += 1;
            }
            Ok(FactClaim {
                claim_id: c.claim_id.clone(),
                policy_id: c.policy_id.clone(),
                product_key: matched
                    .map(|p| keys::product_key(&p.line_of_business, &p.plan_name)),
                line_of_business: matched.map(|p| p.line_of_business.clone()),
                state_code: matched.map(|p| p.state_code.clone()),
                region_code: matched.map(|p| p.region_code.clone()),
                claim_type: c.claim_type.clone(),
                claim_status: c.claim_status.clone(),
                fraud_flag: c.fraud_flag,
                incident_date_key: keys::date_key(keys::parse_date(&c.incident_date)?),
                report_date_key: keys::date_key(keys::parse_date(&c.report_date)?),
                settlement_date_key: None,
                days_to_settle: None,
                claim_amount_requested: c.claim_amount_requested,
                claim_amount_approved: c.claim_amount_approved,
                claim_amount_paid: c.claim_amount_paid,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if unmatched > 0 {
        debug!(unmatched, "claims without a matching policy kept with null enrichment");
    }
    Ok(facts)
}

/// Build `fact_expenses`: date key normalized to the first of the expense
/// month.
pub fn build_expense_facts(expenses: &[RawExpense]) -> Result<Vec<FactExpense>> {
    if expenses.is_empty() {
        return Err(TransformError::empty_source("expenses"));
    }
    expenses
        .iter()
        .map(|e| {
            Ok(FactExpense {
                expense_id: e.expense_id.clone(),
                expense_category: e.expense_category.clone(),
                state_code: e.state_code.clone(),
                region_code: e.region_code.clone(),
                date_key: keys::date_key(keys::parse_month(&e.expense_month)?),
                expense_amount: e.expense_amount,
            })
        })
        .collect()
}

/// Build `fact_taxes`: tax base kept when present, otherwise derived as
/// amount over rate. A zero rate yields no base rather than infinity.
/// date_key is always NULL (the tax feed carries no event date).
pub fn build_tax_facts(taxes: &[RawTax]) -> Result<Vec<FactTax>> {
    if taxes.is_empty() {
        return Err(TransformError::empty_source("taxes"));
    }
    Ok(taxes
        .iter()
        .map(|t| {
            let tax_base = t.tax_base.or_else(|| {
                (t.tax_rate != 0.0).then(|| t.tax_amount / t.tax_rate)
            });
            FactTax {
                tax_id: t.tax_id.clone(),
                policy_id: t.policy_id.clone(),
                tax_type: PREMIUM_TAX.to_string(),
                state_code: t.state_code.clone(),
                date_key: None,
                tax_base,
                tax_rate: t.tax_rate,
                tax_amount: t.tax_amount,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use starmart_core::CoreError;

    fn policy(id: &str, effective: &str) -> RawPolicy {
        RawPolicy {
            policy_id: id.to_string(),
            policy_number: format!("PN-{id}"),
            client_id: "C001".into(),
            state_code: "TX".into(),
            region_code: "SOUTH".into(),
            is_renewal: true,
            line_of_business: "Auto".into(),
            plan_name: "Full Coverage".into(),
            effective_date: effective.to_string(),
            expiration_date: "2025-06-15".into(),
            status: "ACTIVE".into(),
            risk_score: 0.4,
            monthly_premium: 100.0,
            annual_premium: 1200.0,
        }
    }

    fn claim(id: &str, policy_id: &str) -> RawClaim {
        RawClaim {
            claim_id: id.to_string(),
            policy_id: policy_id.to_string(),
            claim_type: "COLLISION".into(),
            claim_status: "OPEN".into(),
            fraud_flag: true,
            incident_date: "2024-07-01".into(),
            report_date: "2024-07-03".into(),
            claim_amount_requested: 1000.0,
            claim_amount_approved: 800.0,
            claim_amount_paid: 0.0,
        }
    }

    fn tax(id: &str, rate: f64, amount: f64, base: Option<f64>) -> RawTax {
        RawTax {
            tax_id: id.to_string(),
            policy_id: "P001".into(),
            state_code: "TX".into(),
            tax_rate: rate,
            tax_amount: amount,
            tax_base: base,
        }
    }

    #[test]
    fn policy_fact_derives_keys_and_calendar_parts() {
        let facts = build_policy_facts(&[policy("P001", "2024-06-15")]).unwrap();
        let f = &facts[0];
        assert_eq!(f.effective_date_key, 20240615);
        assert_eq!(f.expiration_date_key, 20250615);
        assert_eq!(f.policy_year, 2024);
        assert_eq!(f.policy_month, 6);
        assert_eq!(f.product_key, "AUTO_FULL_COVERAGE");
    }

    #[test]
    fn policy_fact_rejects_malformed_date() {
        let result = build_policy_facts(&[policy("P001", "2024-13-99")]);
        assert!(matches!(
            result,
            Err(TransformError::Core(CoreError::MalformedDate { .. }))
        ));
    }

    #[test]
    fn claim_fact_enriched_from_matching_policy() {
        let policies = vec![policy("P001", "2024-06-15")];
        let facts = build_claim_facts(&[claim("CL001", "P001")], &policies).unwrap();
        let f = &facts[0];
        assert_eq!(f.product_key.as_deref(), Some("AUTO_FULL_COVERAGE"));
        assert_eq!(f.state_code.as_deref(), Some("TX"));
        assert!(f.fraud_flag);
        assert_eq!(f.incident_date_key, 20240701);
        assert_eq!(f.settlement_date_key, None);
        assert_eq!(f.days_to_settle, None);
    }

    #[test]
    fn unmatched_claim_kept_with_null_enrichment() {
        let policies = vec![policy("P001", "2024-06-15")];
        let facts = build_claim_facts(&[claim("CL001", "GHOST")], &policies).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].product_key, None);
        assert_eq!(facts[0].line_of_business, None);
        assert_eq!(facts[0].state_code, None);
    }

    #[test]
    fn expense_fact_normalizes_month() {
        let expense = RawExpense {
            expense_id: "E1".into(),
            expense_category: "MARKETING".into(),
            state_code: "TX".into(),
            region_code: "SOUTH".into(),
            expense_month: "2024-07".into(),
            expense_amount: 5000.0,
        };
        let facts = build_expense_facts(&[expense]).unwrap();
        assert_eq!(facts[0].date_key, 20240701);
    }

    #[test]
    fn tax_fact_keeps_explicit_base() {
        let facts = build_tax_facts(&[tax("T1", 0.05, 50.0, Some(900.0))]).unwrap();
        assert_eq!(facts[0].tax_base, Some(900.0));
        assert_eq!(facts[0].tax_type, "PREMIUM_TAX");
        assert_eq!(facts[0].date_key, None);
    }

    #[test]
    fn tax_fact_derives_base_from_rate() {
        let facts = build_tax_facts(&[tax("T1", 0.05, 50.0, None)]).unwrap();
        assert_eq!(facts[0].tax_base, Some(1000.0));
    }

    #[test]
    fn tax_fact_zero_rate_has_no_base() {
        let facts = build_tax_facts(&[tax("T1", 0.0, 50.0, None)]).unwrap();
        assert_eq!(facts[0].tax_base, None);
    }

    #[test]
    fn empty_sources_rejected() {
        assert!(matches!(
            build_policy_facts(&[]),
            Err(TransformError::EmptySource { .. })
        ));
        assert!(matches!(
            build_expense_facts(&[]),
            Err(TransformError::EmptySource { .. })
        ));
        assert!(matches!(
            build_tax_facts(&[]),
            Err(TransformError::EmptySource { .. })
        ));
    }
}
