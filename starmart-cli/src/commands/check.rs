use std::path::Path;

use starmart_core::stage;

use crate::error::CliResult;
use crate::output;

/// Validate the staged star schema; fail the process on any gating finding.
pub fn run(staged: &Path, quiet: bool) -> CliResult<()> {
    let star = stage::read_star_schema(staged)?;
    let report = starmart_check::validate(&star);
    output::print_report(&report, quiet);
    output::gate(&report, "pre-load")
}
