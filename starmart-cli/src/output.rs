//! Terminal output for validation reports and load summaries.
//!
//! Check results go to stdout so they can be captured and diffed; logs go to
//! stderr through tracing.

use colored::Colorize;

use starmart_check::{CheckStatus, ValidationReport};
use starmart_store::LoadSummary;

use crate::error::{CliError, CliResult};

/// Print every finding plus a tally line. With `quiet`, passing findings are
/// suppressed and only warnings, failures, and the tally remain.
pub fn print_report(report: &ValidationReport, quiet: bool) {
    for finding in report.findings() {
        match &finding.status {
            CheckStatus::Pass => {
                if !quiet {
                    println!("  {}  {} [{}]", "PASS".green(), finding.subject, finding.kind);
                }
            }
            CheckStatus::Warn(detail) => {
                println!(
                    "  {}  {} [{}]: {detail}",
                    "WARN".yellow().bold(),
                    finding.subject,
                    finding.kind
                );
            }
            CheckStatus::Fail(detail) => {
                println!(
                    "  {}  {} [{}]: {detail}",
                    "FAIL".red().bold(),
                    finding.subject,
                    finding.kind
                );
            }
        }
    }
    let (passed, warned, failed) = report.tally();
    println!("{passed} passed, {warned} warned, {failed} failed");
}

/// Turn a failed report into a gating error for the given stage.
pub fn gate(report: &ValidationReport, stage: &'static str) -> CliResult<()> {
    if report.passed() {
        Ok(())
    } else {
        Err(CliError::GateFailed {
            stage,
            failed: report.failures().count(),
        })
    }
}

/// Print per-table row counts after a committed load.
pub fn print_load_summary(summary: &LoadSummary, quiet: bool) {
    if quiet {
        return;
    }
    for (table, rows) in summary {
        println!("  {table}: {rows} rows");
    }
}
