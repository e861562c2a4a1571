//! Price file loading.
//!
//! The price file is a delimited table with one header row, then one row per
//! bar in chronological order:
//!
//! ```text
//! Date,Open,High,Low,Close,Volume,OpenInterest
//! 2006-01-02,3578.73,3605.95,3578.73,3604.33,0,0
//! ```
//!
//! Columns are positional; the header is skipped, not interpreted. Empty
//! numeric cells become NaN.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use ta_crosscheck_core::table::{PriceRow, PriceTable};

use crate::error::{CliError, Result};

/// Number of columns in a price row.
pub const ROW_WIDTH: usize = 7;

/// Parse a cell to f64, treating empty as NaN.
fn parse_value(value: &str, column: &str, line: usize) -> Result<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Ok(f64::NAN)
    } else {
        trimmed.parse::<f64>().map_err(|_| CliError::CsvParseError {
            message: format!("cannot parse '{trimmed}' as a number in column '{column}'"),
            line: Some(line),
        })
    }
}

/// Load a price file into a [`PriceTable`].
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be opened, or
/// `CliError::CsvParseError` if a row is malformed.
pub fn load_price_table<P: AsRef<Path>>(path: P) -> Result<PriceTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    load_price_table_from_reader(BufReader::new(file))
}

/// Load price data from a reader.
///
/// # Errors
///
/// Returns `CliError::CsvParseError` if a row is malformed or the table has
/// no data rows.
pub fn load_price_table_from_reader<R: Read>(reader: R) -> Result<PriceTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        // +2 for the header and 0-indexing
        let line = idx + 2;
        let record = result.map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(line),
        })?;
        if record.len() != ROW_WIDTH {
            return Err(CliError::CsvParseError {
                message: format!("expected {ROW_WIDTH} columns, found {}", record.len()),
                line: Some(line),
            });
        }

        let cell = |i: usize, column: &str| parse_value(&record[i], column, line);
        rows.push(PriceRow {
            date: record[0].to_string(),
            open: cell(1, "open")?,
            high: cell(2, "high")?,
            low: cell(3, "low")?,
            close: cell(4, "close")?,
            volume: cell(5, "volume")?,
            openinterest: cell(6, "openinterest")?,
        });
    }

    if rows.is_empty() {
        return Err(CliError::CsvParseError {
            message: "no data rows".to_string(),
            line: None,
        });
    }
    Ok(PriceTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Open,High,Low,Close,Volume,OpenInterest\n";

    fn load(body: &str) -> Result<PriceTable> {
        load_price_table_from_reader(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn test_load_rows() {
        let table = load("2006-01-02,1,3,0.5,2,100,0\n2006-01-03,2,4,1.5,3,200,0\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dates(), &["2006-01-02", "2006-01-03"]);
        assert_eq!(table.column("close").unwrap(), &[2.0, 3.0]);
        assert_eq!(table.column("volume").unwrap(), &[100.0, 200.0]);
    }

    #[test]
    fn test_empty_cell_is_nan() {
        let table = load("2006-01-02,1,3,0.5,,100,\n").unwrap();
        assert!(table.column("close").unwrap()[0].is_nan());
        assert!(table.column("openinterest").unwrap()[0].is_nan());
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = load("2006-01-02,1,3,0.5,2,100,0\n2006-01-03,x,4,1.5,3,200,0\n").unwrap_err();
        match err {
            CliError::CsvParseError { message, line } => {
                assert_eq!(line, Some(3));
                assert!(message.contains("'x'"));
                assert!(message.contains("open"));
            }
            other => panic!("expected CsvParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_width_reports_line() {
        let err = load("2006-01-02,1,3,0.5,2\n").unwrap_err();
        assert!(matches!(err, CliError::CsvParseError { line: Some(2), .. }));
    }

    #[test]
    fn test_header_only_is_error() {
        assert!(load("").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_price_table("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, CliError::IoError { path: Some(_), .. }));
    }
}
