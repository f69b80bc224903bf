//! Staged-file I/O: reading raw inputs and reading/writing star tables as
//! header-plus-rows CSV files named `<table>.csv` under a directory.

use std::fs;
use std::path::Path;

use crate::csv::{self, CsvWriter, Header, Record};
use crate::error::{CoreError, Result};
use crate::raw::{RawClaim, RawClient, RawDataset, RawExpense, RawPolicy, RawTax};
use crate::star::{
    ClientDim, FactClaim, FactExpense, FactPolicy, FactTax, PolicyDim, ProductDim, StarSchema,
    StateDim, TimeDay,
};

/// Encode a table to CSV bytes: header row, then one row per record in
/// contract column order. This is also the COPY payload shape.
pub fn encode_table<R: Record>(records: &[R]) -> Vec<u8> {
    let mut w = CsvWriter::new();
    w.write_record(R::COLUMNS.iter().copied());
    let mut row: Vec<String> = Vec::with_capacity(R::COLUMNS.len());
    for record in records {
        row.clear();
        record.encode(&mut row);
        w.write_record(row.iter().map(|s| s.as_str()));
    }
    w.into_bytes()
}

/// Decode CSV text into records. A file with a header but no data rows is
/// `EmptySource`; a file without even a header is too.
pub fn decode_table<R: Record>(input: &str) -> Result<Vec<R>> {
    let rows = csv::parse(input)?;
    let Some((header_row, data)) = rows.split_first() else {
        return Err(CoreError::empty_source(R::TABLE));
    };
    if data.is_empty() {
        return Err(CoreError::empty_source(R::TABLE));
    }
    let header = Header::new(header_row);
    data.iter().map(|row| R::decode(&header, row)).collect()
}

/// Read `<dir>/<table>.csv` into records.
pub fn read_table<R: Record>(dir: &Path) -> Result<Vec<R>> {
    let path = dir.join(format!("{}.csv", R::TABLE));
    if !path.exists() {
        return Err(CoreError::missing_input(path.display().to_string()));
    }
    let text = fs::read_to_string(&path)?;
    decode_table(&text)
}

/// Write records to `<dir>/<table>.csv`, creating the directory if needed.
pub fn write_table<R: Record>(dir: &Path, records: &[R]) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", R::TABLE));
    fs::write(path, encode_table(records))?;
    Ok(())
}

/// Read the five raw entity tables from a directory.
pub fn read_raw_dataset(dir: &Path) -> Result<RawDataset> {
    Ok(RawDataset {
        clients: read_table::<RawClient>(dir)?,
        policies: read_table::<RawPolicy>(dir)?,
        claims: read_table::<RawClaim>(dir)?,
        expenses: read_table::<RawExpense>(dir)?,
        taxes: read_table::<RawTax>(dir)?,
    })
}

/// Write all nine star tables to a staging directory.
pub fn write_star_schema(dir: &Path, star: &StarSchema) -> Result<()> {
    write_table(dir, &star.dim_time)?;
    write_table(dir, &star.dim_state)?;
    write_table(dir, &star.dim_clients)?;
    write_table(dir, &star.dim_products)?;
    write_table(dir, &star.dim_policies)?;
    write_table(dir, &star.fact_policies)?;
    write_table(dir, &star.fact_claims)?;
    write_table(dir, &star.fact_expenses)?;
    write_table(dir, &star.fact_taxes)?;
    Ok(())
}

/// Read all nine star tables from a staging directory.
pub fn read_star_schema(dir: &Path) -> Result<StarSchema> {
    Ok(StarSchema {
        dim_time: read_table::<TimeDay>(dir)?,
        dim_state: read_table::<StateDim>(dir)?,
        dim_clients: read_table::<ClientDim>(dir)?,
        dim_products: read_table::<ProductDim>(dir)?,
        dim_policies: read_table::<PolicyDim>(dir)?,
        fact_policies: read_table::<FactPolicy>(dir)?,
        fact_claims: read_table::<FactClaim>(dir)?,
        fact_expenses: read_table::<FactExpense>(dir)?,
        fact_taxes: read_table::<FactTax>(dir)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_table_emits_header_and_rows() {
        let states = vec![StateDim {
            state_code: "TX".into(),
            region_code: "SOUTH".into(),
            market_tier: "TIER_1".into(),
        }];
        let bytes = encode_table(&states);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "state_code,region_code,market_tier\nTX,SOUTH,TIER_1\n");
    }

    #[test]
    fn decode_table_rejects_header_only() {
        let result: Result<Vec<StateDim>> = decode_table("state_code,region_code,market_tier\n");
        assert!(matches!(result, Err(CoreError::EmptySource { .. })));
    }

    #[test]
    fn decode_table_rejects_empty_file() {
        let result: Result<Vec<StateDim>> = decode_table("");
        assert!(matches!(result, Err(CoreError::EmptySource { .. })));
    }

    #[test]
    fn read_missing_file_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Vec<StateDim>> = read_table(dir.path());
        assert!(matches!(result, Err(CoreError::MissingInput { .. })));
    }

    #[test]
    fn table_roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let states = vec![
            StateDim {
                state_code: "TX".into(),
                region_code: "SOUTH".into(),
                market_tier: "TIER_1".into(),
            },
            StateDim {
                state_code: "NY".into(),
                region_code: "NORTHEAST".into(),
                market_tier: "TIER_2".into(),
            },
        ];
        write_table(dir.path(), &states).unwrap();
        let back: Vec<StateDim> = read_table(dir.path()).unwrap();
        assert_eq!(back, states);
    }
}
