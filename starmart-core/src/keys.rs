//! Surrogate-key derivation.
//!
//! Date keys and product keys are the join keys of the star schema. Both
//! derivations are deterministic pure functions so the dimension builder and
//! the fact builder always agree on the key for the same logical entity;
//! referential closure depends on that.

use chrono::{Datelike, NaiveDate};

use crate::error::{CoreError, Result};

/// Derive an integer `YYYYMMDD` key from a calendar date.
pub fn date_key(date: NaiveDate) -> i32 {
    date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::malformed_date(value))
}

/// Parse a month value (`YYYY-MM` or `YYYY-MM-DD`), normalized to the first
/// day of the month. Expenses are month-grained, so their date key is always
/// a first-of-month key.
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .map_err(|_| CoreError::malformed_date(value))?;
    date.with_day(1)
        .ok_or_else(|| CoreError::malformed_date(value))
}

/// Derive a product key from a line of business and a plan name.
///
/// Uppercase both, join with `_`, and replace spaces with underscores.
/// Distinct (line, plan) pairs must never collide; identical pairs must
/// always produce the same key.
pub fn product_key(line_of_business: &str, plan_name: &str) -> String {
    format!("{line_of_business}_{plan_name}")
        .to_uppercase()
        .replace(' ', "_")
}
