use std::path::Path;

use starmart_core::stage;
use starmart_transform::build_star_schema;

use crate::error::CliResult;

/// Read the raw entity tables, build the star schema, and stage it.
pub fn run(input: &Path, output: &Path, quiet: bool) -> CliResult<()> {
    let raw = stage::read_raw_dataset(input)?;
    let star = build_star_schema(&raw)?;
    stage::write_star_schema(output, &star)?;
    if !quiet {
        for (table, rows) in star.row_counts() {
            println!("  {table}: {rows} rows");
        }
        println!("staged to {}", output.display());
    }
    Ok(())
}
