//! Delimited-text reading and writing (RFC 4180 CSV).
//!
//! Every tabular surface of the pipeline (raw inputs, staged star tables,
//! the COPY payload streamed to the store) is header-plus-rows CSV, so
//! reading and writing live here rather than in any single stage.
//!
//! Quoting rules: values containing `,`, `"`, or newlines are wrapped in
//! double-quotes with internal `"` doubled. An empty unquoted cell is the
//! NULL encoding for nullable columns.

use std::collections::HashMap;

use crate::error::{CoreError, Result};

// ---------------------------------------------------------------------------
// Record contract
// ---------------------------------------------------------------------------

/// A row type bound to a fixed table contract.
///
/// `COLUMNS` is the authoritative column order for both the staged file and
/// the store's COPY column list. `decode` resolves columns by name through
/// the header so staged files survive benign column reordering; `encode`
/// always emits `COLUMNS` order.
pub trait Record: Sized {
    /// Table name (also the staged file stem).
    const TABLE: &'static str;
    /// Ordered column contract.
    const COLUMNS: &'static [&'static str];

    /// Decode one data row against the parsed header.
    fn decode(header: &Header, row: &[String]) -> Result<Self>;

    /// Encode this row into cells, in `COLUMNS` order.
    fn encode(&self, row: &mut Vec<String>);
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Parsed header row with by-name column lookup.
pub struct Header {
    index: HashMap<String, usize>,
}

impl Header {
    /// Build a header index from the first CSV row.
    pub fn new(cells: &[String]) -> Self {
        let index = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.trim().to_string(), i))
            .collect();
        Header { index }
    }

    /// Position of an optional column.
    pub fn find(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Position of a required column, or `MissingColumn`.
    pub fn require(&self, table: &str, column: &str) -> Result<usize> {
        self.find(column)
            .ok_or_else(|| CoreError::missing_column(table, column))
    }
}

/// Fetch a cell by position; positions past the row's end read as empty.
pub fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Tokens treated as boolean-true, case-insensitive.
pub const TRUTHY_TOKENS: [&str; 4] = ["1", "true", "t", "yes"];

const FALSY_TOKENS: [&str; 4] = ["0", "false", "f", "no"];

/// Lenient boolean coercion: truthy tokens are `true`, everything else
/// (including empty) is `false`. Used for flag columns that may be absent.
pub fn truthy(value: &str) -> bool {
    TRUTHY_TOKENS.contains(&value.trim().to_ascii_lowercase().as_str())
}

/// Strict boolean parse: unrecognized tokens are invalid.
pub fn parse_bool(table: &str, column: &str, value: &str) -> Result<bool> {
    let token = value.trim().to_ascii_lowercase();
    if TRUTHY_TOKENS.contains(&token.as_str()) {
        Ok(true)
    } else if FALSY_TOKENS.contains(&token.as_str()) {
        Ok(false)
    } else {
        Err(CoreError::invalid_value(table, column, value))
    }
}

/// Parse a required integer cell.
pub fn parse_i32(table: &str, column: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_value(table, column, value))
}

/// Parse a nullable integer cell (empty is NULL).
pub fn parse_opt_i32(table: &str, column: &str, value: &str) -> Result<Option<i32>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_i32(table, column, value).map(Some)
}

/// Parse a required float cell.
pub fn parse_f64(table: &str, column: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_value(table, column, value))
}

/// Parse a nullable float cell (empty is NULL).
pub fn parse_opt_f64(table: &str, column: &str, value: &str) -> Result<Option<f64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_f64(table, column, value).map(Some)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// CSV writer accumulating records into an in-memory byte buffer.
pub struct CsvWriter {
    buf: Vec<u8>,
}

impl CsvWriter {
    pub fn new() -> Self {
        CsvWriter { buf: Vec::new() }
    }

    /// Append one record, quoting cells as required.
    pub fn write_record<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(b',');
            }
            write_field(&mut self.buf, field.as_ref());
        }
        self.buf.push(b'\n');
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        CsvWriter::new()
    }
}

/// RFC 4180 quoting: wrap when the value contains `,`, `"`, or a newline;
/// double internal `"`.
fn write_field(out: &mut Vec<u8>, field: &str) {
    let needs_quoting = field
        .bytes()
        .any(|b| b == b',' || b == b'"' || b == b'\n' || b == b'\r');

    if !needs_quoting {
        out.extend_from_slice(field.as_bytes());
        return;
    }

    out.push(b'"');
    for b in field.bytes() {
        if b == b'"' {
            out.push(b'"');
        }
        out.push(b);
    }
    out.push(b'"');
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a full CSV document into rows of cells.
///
/// Handles quoted cells with doubled-quote escapes, embedded newlines inside
/// quotes, and CRLF line endings. Blank lines are skipped.
pub fn parse(input: &str) -> Result<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1usize;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                other => field.push(other),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !field_was_quoted => {
                in_quotes = true;
                field_was_quoted = true;
            }
            '"' => {
                return Err(CoreError::Csv {
                    line,
                    message: "unexpected quote inside field".to_string(),
                });
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                field_was_quoted = false;
            }
            '\r' => {
                // CRLF: the following '\n' terminates the row.
                if chars.peek() != Some(&'\n') {
                    field.push('\r');
                }
            }
            '\n' => {
                line += 1;
                if row.is_empty() && field.is_empty() && !field_was_quoted {
                    continue; // blank line
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                field_was_quoted = false;
            }
            other => field.push(other),
        }
    }

    if in_quotes {
        return Err(CoreError::Csv {
            line,
            message: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !row.is_empty() || field_was_quoted {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
