//! Pre-load validation: structural and referential integrity of the
//! in-memory star schema, before the store is touched.
//!
//! Every check runs regardless of earlier outcomes; the caller inspects the
//! aggregated report and gates the load on any failure.

use std::collections::HashSet;
use std::hash::Hash;

use chrono::NaiveDate;
use tracing::debug;

use starmart_core::star::StarSchema;

use crate::report::{CheckKind, ValidationReport};

/// Claims-to-policies row ratio considered plausible. Outside this band the
/// data is suspicious but not provably wrong, so the check only warns.
pub const CLAIM_RATIO_BOUNDS: (f64, f64) = (0.03, 0.80);

/// Run the full pre-load check suite over a star schema.
pub fn validate(star: &StarSchema) -> ValidationReport {
    let mut report = ValidationReport::new();

    // Presence: all nine tables must have rows.
    for (table, rows) in star.row_counts() {
        if rows == 0 {
            report.fail(CheckKind::Presence, table, "no rows");
        } else {
            report.pass(CheckKind::Presence, table);
        }
    }

    // Key universes the referential checks resolve against.
    let date_keys: HashSet<i32> = star.dim_time.iter().map(|d| d.date_key).collect();
    let states: HashSet<&str> = star.dim_state.iter().map(|s| s.state_code.as_str()).collect();
    let clients: HashSet<&str> = star
        .dim_clients
        .iter()
        .map(|c| c.client_id.as_str())
        .collect();
    let products: HashSet<&str> = star
        .dim_products
        .iter()
        .map(|p| p.product_key.as_str())
        .collect();
    let policies: HashSet<&str> = star
        .dim_policies
        .iter()
        .map(|p| p.policy_id.as_str())
        .collect();

    // dim_time: unique and daily-contiguous over its own range.
    check_unique(
        &mut report,
        "dim_time.date_key",
        star.dim_time.iter().map(|d| d.date_key),
    );
    check_time_coverage(&mut report, star);

    // Remaining dimension key uniqueness.
    check_unique(
        &mut report,
        "dim_state.state_code",
        star.dim_state.iter().map(|s| s.state_code.as_str()),
    );
    check_unique(
        &mut report,
        "dim_clients.client_id",
        star.dim_clients.iter().map(|c| c.client_id.as_str()),
    );
    check_unique(
        &mut report,
        "dim_products.product_key",
        star.dim_products.iter().map(|p| p.product_key.as_str()),
    );
    check_unique(
        &mut report,
        "dim_policies.policy_id",
        star.dim_policies.iter().map(|p| p.policy_id.as_str()),
    );

    // Dimension-to-dimension references.
    check_refs(
        &mut report,
        "dim_clients.state_code -> dim_state",
        star.dim_clients.iter().map(|c| Some(c.state_code.as_str())),
        &states,
    );
    check_refs(
        &mut report,
        "dim_policies.client_id -> dim_clients",
        star.dim_policies.iter().map(|p| Some(p.client_id.as_str())),
        &clients,
    );
    check_refs(
        &mut report,
        "dim_policies.state_code -> dim_state",
        star.dim_policies.iter().map(|p| Some(p.state_code.as_str())),
        &states,
    );

    // fact_policies.
    check_refs(
        &mut report,
        "fact_policies.policy_id -> dim_policies",
        star.fact_policies.iter().map(|f| Some(f.policy_id.as_str())),
        &policies,
    );
    check_refs(
        &mut report,
        "fact_policies.product_key -> dim_products",
        star.fact_policies.iter().map(|f| Some(f.product_key.as_str())),
        &products,
    );
    check_refs(
        &mut report,
        "fact_policies.state_code -> dim_state",
        star.fact_policies.iter().map(|f| Some(f.state_code.as_str())),
        &states,
    );
    check_refs(
        &mut report,
        "fact_policies.effective_date_key -> dim_time",
        star.fact_policies.iter().map(|f| Some(f.effective_date_key)),
        &date_keys,
    );
    check_advisory_refs(
        &mut report,
        "fact_policies.expiration_date_key -> dim_time",
        star.fact_policies.iter().map(|f| Some(f.expiration_date_key)),
        &date_keys,
    );

    // fact_claims. A missing product_key means the claim never matched a
    // policy, which is exactly what this enforced check is here to catch.
    check_refs(
        &mut report,
        "fact_claims.policy_id -> dim_policies",
        star.fact_claims.iter().map(|f| Some(f.policy_id.as_str())),
        &policies,
    );
    check_refs(
        &mut report,
        "fact_claims.product_key -> dim_products",
        star.fact_claims.iter().map(|f| f.product_key.as_deref()),
        &products,
    );
    check_refs(
        &mut report,
        "fact_claims.state_code -> dim_state",
        star.fact_claims.iter().map(|f| f.state_code.as_deref()),
        &states,
    );
    check_refs(
        &mut report,
        "fact_claims.incident_date_key -> dim_time",
        star.fact_claims.iter().map(|f| Some(f.incident_date_key)),
        &date_keys,
    );
    check_refs(
        &mut report,
        "fact_claims.report_date_key -> dim_time",
        star.fact_claims.iter().map(|f| Some(f.report_date_key)),
        &date_keys,
    );
    check_advisory_refs(
        &mut report,
        "fact_claims.settlement_date_key -> dim_time",
        star.fact_claims.iter().map(|f| f.settlement_date_key),
        &date_keys,
    );

    // fact_expenses.
    check_refs(
        &mut report,
        "fact_expenses.date_key -> dim_time",
        star.fact_expenses.iter().map(|f| Some(f.date_key)),
        &date_keys,
    );
    check_refs(
        &mut report,
        "fact_expenses.state_code -> dim_state",
        star.fact_expenses.iter().map(|f| Some(f.state_code.as_str())),
        &states,
    );
    check_non_negative(
        &mut report,
        "fact_expenses.expense_amount",
        star.fact_expenses.iter().map(|f| f.expense_amount),
    );

    // fact_taxes.
    check_refs(
        &mut report,
        "fact_taxes.policy_id -> dim_policies",
        star.fact_taxes.iter().map(|f| Some(f.policy_id.as_str())),
        &policies,
    );
    check_refs(
        &mut report,
        "fact_taxes.state_code -> dim_state",
        star.fact_taxes.iter().map(|f| Some(f.state_code.as_str())),
        &states,
    );
    check_non_negative(
        &mut report,
        "fact_taxes.tax_amount",
        star.fact_taxes.iter().map(|f| f.tax_amount),
    );

    check_claim_ratio(&mut report, star);

    let (passed, warned, failed) = report.tally();
    debug!(passed, warned, failed, "pre-load validation finished");
    report
}

// ---------------------------------------------------------------------------
// Check primitives
// ---------------------------------------------------------------------------

fn check_unique<T: Eq + Hash>(
    report: &mut ValidationReport,
    subject: &str,
    values: impl Iterator<Item = T>,
) {
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    for value in values {
        if !seen.insert(value) {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        report.fail(
            CheckKind::Uniqueness,
            subject,
            format!("{duplicates} duplicate values"),
        );
    } else {
        report.pass(CheckKind::Uniqueness, subject);
    }
}

/// Enforced reference check: a `None` value counts as unresolved.
fn check_refs<T: Eq + Hash>(
    report: &mut ValidationReport,
    subject: &str,
    values: impl Iterator<Item = Option<T>>,
    universe: &HashSet<T>,
) {
    let unresolved = values
        .filter(|v| match v {
            Some(v) => !universe.contains(v),
            None => true,
        })
        .count();
    if unresolved > 0 {
        report.fail(
            CheckKind::ReferentialIntegrity,
            subject,
            format!("{unresolved} unresolved references"),
        );
    } else {
        report.pass(CheckKind::ReferentialIntegrity, subject);
    }
}

/// Advisory reference check: `None` is fine (the column is nullable), a
/// present-but-unresolved value is only a warning.
fn check_advisory_refs<T: Eq + Hash>(
    report: &mut ValidationReport,
    subject: &str,
    values: impl Iterator<Item = Option<T>>,
    universe: &HashSet<T>,
) {
    let unresolved = values
        .filter(|v| matches!(v, Some(v) if !universe.contains(v)))
        .count();
    if unresolved > 0 {
        report.warn(
            CheckKind::AdvisoryReferenceGap,
            subject,
            format!("{unresolved} references outside the time range"),
        );
    } else {
        report.pass(CheckKind::AdvisoryReferenceGap, subject);
    }
}

fn check_non_negative(
    report: &mut ValidationReport,
    subject: &str,
    values: impl Iterator<Item = f64>,
) {
    let negative = values.filter(|v| *v < 0.0).count();
    if negative > 0 {
        report.fail(
            CheckKind::DomainConstraint,
            subject,
            format!("{negative} negative values"),
        );
    } else {
        report.pass(CheckKind::DomainConstraint, subject);
    }
}

fn check_time_coverage(report: &mut ValidationReport, star: &StarSchema) {
    let subject = "dim_time daily contiguity";
    if star.dim_time.is_empty() {
        // Presence already failed; nothing to measure.
        return;
    }
    let mut dates = Vec::with_capacity(star.dim_time.len());
    for day in &star.dim_time {
        match date_from_key(day.date_key) {
            Some(date) => dates.push(date),
            None => {
                report.fail(
                    CheckKind::Coverage,
                    subject,
                    format!("date_key {} is not a calendar date", day.date_key),
                );
                return;
            }
        }
    }
    let min = dates.iter().min().copied();
    let max = dates.iter().max().copied();
    if let (Some(min), Some(max)) = (min, max) {
        let expected = (max - min).num_days() + 1;
        let distinct: HashSet<NaiveDate> = dates.into_iter().collect();
        if distinct.len() as i64 != expected {
            report.fail(
                CheckKind::Coverage,
                subject,
                format!(
                    "{} distinct days, expected {expected} for {min}..{max}",
                    distinct.len()
                ),
            );
        } else {
            report.pass(CheckKind::Coverage, subject);
        }
    }
}

fn date_from_key(key: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(key / 10_000, (key / 100 % 100) as u32, (key % 100) as u32)
}

fn check_claim_ratio(report: &mut ValidationReport, star: &StarSchema) {
    let subject = "fact_claims / fact_policies ratio";
    if star.fact_policies.is_empty() {
        // Presence already failed; the ratio is meaningless.
        return;
    }
    let ratio = star.fact_claims.len() as f64 / star.fact_policies.len() as f64;
    let (lo, hi) = CLAIM_RATIO_BOUNDS;
    if ratio < lo || ratio > hi {
        report.warn(
            CheckKind::Sanity,
            subject,
            format!("{ratio:.3} outside plausible band [{lo}, {hi}]"),
        );
    } else {
        report.pass(CheckKind::Sanity, subject);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starmart_core::star::{
        ClientDim, FactClaim, FactExpense, FactPolicy, FactTax, PolicyDim, ProductDim, StateDim,
        TimeDay,
    };

    /// A minimal referentially closed schema: two clients, two policies,
    /// one claim, one expense, one tax, over a short contiguous calendar.
    fn closed_schema() -> StarSchema {
        let days: Vec<TimeDay> = (1..=31)
            .map(|d| TimeDay::for_date(NaiveDate::from_ymd_opt(2024, 1, d).unwrap()))
            .collect();
        StarSchema {
            dim_time: days,
            dim_state: vec![
                StateDim {
                    state_code: "NY".into(),
                    region_code: "NORTHEAST".into(),
                    market_tier: "TIER_2".into(),
                },
                StateDim {
                    state_code: "TX".into(),
                    region_code: "SOUTH".into(),
                    market_tier: "TIER_1".into(),
                },
            ],
            dim_clients: vec![
                client_dim("C1", "TX"),
                client_dim("C2", "NY"),
            ],
            dim_products: vec![ProductDim {
                product_key: "AUTO_BASIC".into(),
                line_of_business: "Auto".into(),
                plan_name: "Basic".into(),
            }],
            dim_policies: vec![policy_dim("P1", "C1", "TX"), policy_dim("P2", "C2", "NY")],
            fact_policies: vec![fact_policy("P1", "TX"), fact_policy("P2", "NY")],
            fact_claims: vec![fact_claim("CL1", "P1")],
            fact_expenses: vec![FactExpense {
                expense_id: "E1".into(),
                expense_category: "MARKETING".into(),
                state_code: "TX".into(),
                region_code: "SOUTH".into(),
                date_key: 20240101,
                expense_amount: 2500.0,
            }],
            fact_taxes: vec![FactTax {
                tax_id: "T1".into(),
                policy_id: "P1".into(),
                tax_type: "PREMIUM_TAX".into(),
                state_code: "TX".into(),
                date_key: None,
                tax_base: Some(1000.0),
                tax_rate: 0.05,
                tax_amount: 50.0,
            }],
        }
    }

    fn client_dim(id: &str, state: &str) -> ClientDim {
        ClientDim {
            client_id: id.to_string(),
            registration_year: 2020,
            age: 40,
            gender: "F".into(),
            customer_segment: "RETAIL".into(),
            state_code: state.to_string(),
            region_code: "SOUTH".into(),
            market_tier: "TIER_1".into(),
            max_policies_allowed: 3,
        }
    }

    fn policy_dim(id: &str, client: &str, state: &str) -> PolicyDim {
        PolicyDim {
            policy_id: id.to_string(),
            policy_number: format!("PN-{id}"),
            client_id: client.to_string(),
            state_code: state.to_string(),
            region_code: "SOUTH".into(),
            is_renewal: false,
        }
    }

    fn fact_policy(id: &str, state: &str) -> FactPolicy {
        FactPolicy {
            policy_id: id.to_string(),
            product_key: "AUTO_BASIC".into(),
            state_code: state.to_string(),
            region_code: "SOUTH".into(),
            effective_date_key: 20240102,
            expiration_date_key: 20240130,
            policy_year: 2024,
            policy_month: 1,
            status: "ACTIVE".into(),
            risk_score: 0.3,
            monthly_premium: 90.0,
            annual_premium: 1080.0,
        }
    }

    fn fact_claim(id: &str, policy: &str) -> FactClaim {
        FactClaim {
            claim_id: id.to_string(),
            policy_id: policy.to_string(),
            product_key: Some("AUTO_BASIC".into()),
            line_of_business: Some("Auto".into()),
            state_code: Some("TX".into()),
            region_code: Some("SOUTH".into()),
            claim_type: "COLLISION".into(),
            claim_status: "OPEN".into(),
            fraud_flag: false,
            incident_date_key: 20240110,
            report_date_key: 20240112,
            settlement_date_key: None,
            days_to_settle: None,
            claim_amount_requested: 500.0,
            claim_amount_approved: 400.0,
            claim_amount_paid: 0.0,
        }
    }

    #[test]
    fn closed_schema_passes() {
        let report = validate(&closed_schema());
        assert!(report.passed(), "failures: {:?}", report.failures().collect::<Vec<_>>());
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn orphan_claim_is_fatal() {
        let mut star = closed_schema();
        star.fact_claims.push(FactClaim {
            product_key: None,
            line_of_business: None,
            state_code: None,
            region_code: None,
            ..fact_claim("CL2", "GHOST")
        });
        let report = validate(&star);
        assert!(!report.passed());
        let failed: Vec<&str> = report.failures().map(|f| f.subject.as_str()).collect();
        assert!(failed.contains(&"fact_claims.policy_id -> dim_policies"));
        assert!(failed.contains(&"fact_claims.product_key -> dim_products"));
    }

    #[test]
    fn negative_expense_is_fatal() {
        let mut star = closed_schema();
        star.fact_expenses[0].expense_amount = -10.0;
        let report = validate(&star);
        assert!(!report.passed());
        assert!(report
            .failures()
            .any(|f| f.subject == "fact_expenses.expense_amount"));
    }

    #[test]
    fn expiration_outside_range_only_warns() {
        let mut star = closed_schema();
        star.fact_policies[0].expiration_date_key = 20991231;
        let report = validate(&star);
        assert!(report.passed());
        assert!(report
            .warnings()
            .any(|f| f.subject == "fact_policies.expiration_date_key -> dim_time"));
    }

    #[test]
    fn time_gap_is_fatal() {
        let mut star = closed_schema();
        star.dim_time.remove(15);
        let report = validate(&star);
        assert!(!report.passed());
        assert!(report.failures().any(|f| f.subject == "dim_time daily contiguity"));
    }

    #[test]
    fn duplicate_policy_id_is_fatal() {
        let mut star = closed_schema();
        star.dim_policies.push(policy_dim("P1", "C1", "TX"));
        let report = validate(&star);
        assert!(!report.passed());
        assert!(report.failures().any(|f| f.subject == "dim_policies.policy_id"));
    }

    #[test]
    fn empty_table_is_fatal() {
        let mut star = closed_schema();
        star.fact_taxes.clear();
        let report = validate(&star);
        assert!(!report.passed());
        assert!(report
            .failures()
            .any(|f| f.kind == CheckKind::Presence && f.subject == "fact_taxes"));
    }

    #[test]
    fn implausible_claim_ratio_warns() {
        let mut star = closed_schema();
        for i in 0..5 {
            star.fact_claims.push(fact_claim(&format!("CLX{i}"), "P1"));
        }
        // 6 claims over 2 policies: ratio 3.0, far above the band.
        let report = validate(&star);
        assert!(report.passed());
        assert!(report
            .warnings()
            .any(|f| f.kind == CheckKind::Sanity));
    }
}
