//! Check report types shared by the pre-load and post-load validators.
//!
//! Checks never abort mid-run: every check records a finding and the full
//! report is returned to the caller, which decides whether to gate the
//! pipeline. Warnings never gate; a single failure does.

use std::fmt;

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Advisory: logged and reported, never gating.
    Warn(String),
    /// Gating: the pipeline must not proceed to the store.
    Fail(String),
}

/// What family of invariant a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// A table that must exist and have rows.
    Presence,
    /// A key column that must be duplicate-free.
    Uniqueness,
    /// The time dimension's daily coverage of its own range.
    Coverage,
    /// An enforced foreign-key relationship.
    ReferentialIntegrity,
    /// An advisory foreign-key relationship (reported, not gating).
    AdvisoryReferenceGap,
    /// A value-domain rule such as non-negative amounts.
    DomainConstraint,
    /// A plausibility ratio, advisory only.
    Sanity,
    /// Post-load: a table's row count in the store.
    RowCount,
    /// Post-load: a dashboard view that must return rows.
    ViewExecution,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Presence => "presence",
            CheckKind::Uniqueness => "uniqueness",
            CheckKind::Coverage => "coverage",
            CheckKind::ReferentialIntegrity => "referential integrity",
            CheckKind::AdvisoryReferenceGap => "advisory reference",
            CheckKind::DomainConstraint => "domain constraint",
            CheckKind::Sanity => "sanity",
            CheckKind::RowCount => "row count",
            CheckKind::ViewExecution => "view execution",
        };
        f.write_str(name)
    }
}

/// One recorded check outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: CheckKind,
    /// What was checked, e.g. `dim_time.date_key` or `fact_claims -> dim_products`.
    pub subject: String,
    pub status: CheckStatus,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Pass => write!(f, "PASS  {} [{}]", self.subject, self.kind),
            CheckStatus::Warn(detail) => {
                write!(f, "WARN  {} [{}]: {}", self.subject, self.kind, detail)
            }
            CheckStatus::Fail(detail) => {
                write!(f, "FAIL  {} [{}]: {}", self.subject, self.kind, detail)
            }
        }
    }
}

/// Aggregated outcome of a validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        ValidationReport::default()
    }

    pub fn pass(&mut self, kind: CheckKind, subject: impl Into<String>) {
        self.record(kind, subject, CheckStatus::Pass);
    }

    pub fn warn(&mut self, kind: CheckKind, subject: impl Into<String>, detail: impl Into<String>) {
        self.record(kind, subject, CheckStatus::Warn(detail.into()));
    }

    pub fn fail(&mut self, kind: CheckKind, subject: impl Into<String>, detail: impl Into<String>) {
        self.record(kind, subject, CheckStatus::Fail(detail.into()));
    }

    pub fn record(&mut self, kind: CheckKind, subject: impl Into<String>, status: CheckStatus) {
        self.findings.push(Finding {
            kind,
            subject: subject.into(),
            status,
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// True when no finding is a failure. Warnings do not gate.
    pub fn passed(&self) -> bool {
        !self
            .findings
            .iter()
            .any(|f| matches!(f.status, CheckStatus::Fail(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| matches!(f.status, CheckStatus::Fail(_)))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| matches!(f.status, CheckStatus::Warn(_)))
    }

    /// (passed, warned, failed) tallies for the summary line.
    pub fn tally(&self) -> (usize, usize, usize) {
        let mut tally = (0, 0, 0);
        for finding in &self.findings {
            match finding.status {
                CheckStatus::Pass => tally.0 += 1,
                CheckStatus::Warn(_) => tally.1 += 1,
                CheckStatus::Fail(_) => tally.2 += 1,
            }
        }
        tally
    }
}
