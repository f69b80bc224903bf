//! Dimension builders.
//!
//! Every builder is a pure function from raw rows to a deduplicated
//! dimension table. Deduplication is first-seen-wins so the output is
//! deterministic for a given input order.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use starmart_core::keys;
use starmart_core::raw::{RawClaim, RawClient, RawPolicy};
use starmart_core::star::{ClientDim, PolicyDim, ProductDim, StateDim, TimeDay};

use crate::error::{Result, TransformError};

/// Build `dim_time`: one row per calendar day from the earliest to the latest
/// date observed across policy effective/expiration and claim incident/report
/// dates, inclusive.
///
/// The scan is lenient: an unparseable date cell is skipped here (the fact
/// builders reject it with a hard error later). If no cell parses at all the
/// range is empty and the transform cannot proceed.
pub fn build_time_dimension(policies: &[RawPolicy], claims: &[RawClaim]) -> Result<Vec<TimeDay>> {
    if policies.is_empty() {
        return Err(TransformError::empty_source("policies"));
    }
    if claims.is_empty() {
        return Err(TransformError::empty_source("claims"));
    }

    let mut min: Option<NaiveDate> = None;
    let mut max: Option<NaiveDate> = None;
    let mut observe = |value: &str| {
        if let Ok(date) = keys::parse_date(value) {
            min = Some(min.map_or(date, |m| m.min(date)));
            max = Some(max.map_or(date, |m| m.max(date)));
        }
    };

    for policy in policies {
        observe(&policy.effective_date);
        observe(&policy.expiration_date);
    }
    for claim in claims {
        observe(&claim.incident_date);
        observe(&claim.report_date);
    }

    let (Some(start), Some(end)) = (min, max) else {
        return Err(TransformError::EmptyDateRange);
    };

    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(TimeDay::for_date(current));
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    debug!(start = %start, end = %end, rows = days.len(), "built time dimension");
    Ok(days)
}

/// Build `dim_state`: distinct (state_code, region_code, market_tier)
/// triples, sorted by state code.
pub fn build_state_dimension(clients: &[RawClient]) -> Result<Vec<StateDim>> {
    if clients.is_empty() {
        return Err(TransformError::empty_source("clients"));
    }
    let mut seen = HashSet::new();
    let mut states: Vec<StateDim> = clients
        .iter()
        .filter(|c| {
            seen.insert((
                c.state_code.clone(),
                c.region_code.clone(),
                c.market_tier.clone(),
            ))
        })
        .map(|c| StateDim {
            state_code: c.state_code.clone(),
            region_code: c.region_code.clone(),
            market_tier: c.market_tier.clone(),
        })
        .collect();
    states.sort_by(|a, b| a.state_code.cmp(&b.state_code));
    Ok(states)
}

/// Build `dim_clients`: one row per client_id, first occurrence wins.
pub fn build_client_dimension(clients: &[RawClient]) -> Result<Vec<ClientDim>> {
    if clients.is_empty() {
        return Err(TransformError::empty_source("clients"));
    }
    let mut seen = HashSet::new();
    Ok(clients
        .iter()
        .filter(|c| seen.insert(c.client_id.clone()))
        .map(|c| ClientDim {
            client_id: c.client_id.clone(),
            registration_year: c.registration_year,
            age: c.age,
            gender: c.gender.clone(),
            customer_segment: c.customer_segment.clone(),
            state_code: c.state_code.clone(),
            region_code: c.region_code.clone(),
            market_tier: c.market_tier.clone(),
            max_policies_allowed: c.max_policies_allowed,
        })
        .collect())
}

/// Build `dim_products`: one row per derived product key, first occurrence
/// wins. The key derivation must match the fact builder's exactly.
pub fn build_product_dimension(policies: &[RawPolicy]) -> Result<Vec<ProductDim>> {
    if policies.is_empty() {
        return Err(TransformError::empty_source("policies"));
    }
    let mut seen = HashSet::new();
    Ok(policies
        .iter()
        .filter_map(|p| {
            let key = keys::product_key(&p.line_of_business, &p.plan_name);
            seen.insert(key.clone()).then(|| ProductDim {
                product_key: key,
                line_of_business: p.line_of_business.clone(),
                plan_name: p.plan_name.clone(),
            })
        })
        .collect())
}

/// Build `dim_policies`: one row per policy_id, first occurrence wins.
pub fn build_policy_dimension(policies: &[RawPolicy]) -> Result<Vec<PolicyDim>> {
    if policies.is_empty() {
        return Err(TransformError::empty_source("policies"));
    }
    let mut seen = HashSet::new();
    Ok(policies
        .iter()
        .filter(|p| seen.insert(p.policy_id.clone()))
        .map(|p| PolicyDim {
            policy_id: p.policy_id.clone(),
            policy_number: p.policy_number.clone(),
            client_id: p.client_id.clone(),
            state_code: p.state_code.clone(),
            region_code: p.region_code.clone(),
            is_renewal: p.is_renewal,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, state: &str, region: &str, tier: &str) -> RawClient {
        RawClient {
            client_id: id.to_string(),
            registration_year: 2020,
            age: 40,
            gender: "F".into(),
            customer_segment: "RETAIL".into(),
            state_code: state.to_string(),
            region_code: region.to_string(),
            market_tier: tier.to_string(),
            max_policies_allowed: 3,
        }
    }

    fn policy(id: &str, lob: &str, plan: &str, effective: &str, expiration: &str) -> RawPolicy {
        RawPolicy {
            policy_id: id.to_string(),
            policy_number: format!("PN-{id}"),
            client_id: "C001".into(),
            state_code: "TX".into(),
            region_code: "SOUTH".into(),
            is_renewal: false,
            line_of_business: lob.to_string(),
            plan_name: plan.to_string(),
            effective_date: effective.to_string(),
            expiration_date: expiration.to_string(),
            status: "ACTIVE".into(),
            risk_score: 0.4,
            monthly_premium: 100.0,
            annual_premium: 1200.0,
        }
    }

    fn claim(id: &str, incident: &str, report: &str) -> RawClaim {
        RawClaim {
            claim_id: id.to_string(),
            policy_id: "P001".into(),
            claim_type: "COLLISION".into(),
            claim_status: "OPEN".into(),
            fraud_flag: false,
            incident_date: incident.to_string(),
            report_date: report.to_string(),
            claim_amount_requested: 1000.0,
            claim_amount_approved: 800.0,
            claim_amount_paid: 0.0,
        }
    }

    #[test]
    fn time_dimension_is_contiguous_inclusive() {
        let policies = vec![policy("P001", "Auto", "Basic", "2024-02-27", "2024-03-02")];
        let claims = vec![claim("CL001", "2024-02-28", "2024-03-01")];
        let days = build_time_dimension(&policies, &claims).unwrap();
        // Feb 27 .. Mar 2 inclusive, across the leap-year month boundary.
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date_key, 20240227);
        assert_eq!(days[2].date_key, 20240229);
        assert_eq!(days[4].date_key, 20240302);
        for pair in days.windows(2) {
            assert!(pair[0].date_key < pair[1].date_key);
        }
    }

    #[test]
    fn time_dimension_skips_unparseable_dates() {
        let policies = vec![policy("P001", "Auto", "Basic", "garbage", "2024-01-03")];
        let claims = vec![claim("CL001", "2024-01-01", "also-garbage")];
        let days = build_time_dimension(&policies, &claims).unwrap();
        assert_eq!(days.first().map(|d| d.date_key), Some(20240101));
        assert_eq!(days.last().map(|d| d.date_key), Some(20240103));
    }

    #[test]
    fn time_dimension_requires_some_valid_date() {
        let policies = vec![policy("P001", "Auto", "Basic", "x", "y")];
        let claims = vec![claim("CL001", "x", "y")];
        assert!(matches!(
            build_time_dimension(&policies, &claims),
            Err(TransformError::EmptyDateRange)
        ));
    }

    #[test]
    fn time_dimension_rejects_empty_sources() {
        let claims = vec![claim("CL001", "2024-01-01", "2024-01-02")];
        assert!(matches!(
            build_time_dimension(&[], &claims),
            Err(TransformError::EmptySource { .. })
        ));
    }

    #[test]
    fn state_dimension_dedupes_and_sorts() {
        let clients = vec![
            client("C1", "TX", "SOUTH", "TIER_1"),
            client("C2", "NY", "NORTHEAST", "TIER_2"),
            client("C3", "TX", "SOUTH", "TIER_1"),
        ];
        let states = build_state_dimension(&clients).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].state_code, "NY");
        assert_eq!(states[1].state_code, "TX");
    }

    #[test]
    fn client_dimension_first_seen_wins() {
        let mut duplicate = client("C1", "NY", "NORTHEAST", "TIER_2");
        duplicate.age = 99;
        let clients = vec![client("C1", "TX", "SOUTH", "TIER_1"), duplicate];
        let dims = build_client_dimension(&clients).unwrap();
        assert_eq!(dims.len(), 1);
        assert_eq!(dims[0].state_code, "TX");
        assert_eq!(dims[0].age, 40);
    }

    #[test]
    fn product_dimension_dedupes_by_derived_key() {
        let policies = vec![
            policy("P1", "Auto", "Full Coverage", "2024-01-01", "2025-01-01"),
            policy("P2", "Auto", "Full Coverage", "2024-02-01", "2025-02-01"),
            policy("P3", "Home", "Basic", "2024-01-01", "2025-01-01"),
        ];
        let products = build_product_dimension(&policies).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_key, "AUTO_FULL_COVERAGE");
    }

    #[test]
    fn empty_clients_is_rejected() {
        assert!(matches!(
            build_state_dimension(&[]),
            Err(TransformError::EmptySource { .. })
        ));
    }
}
