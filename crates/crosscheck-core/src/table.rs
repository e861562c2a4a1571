//! The historical price table shared by every test of a run.

use crate::error::{Error, Result};

/// Names of the numeric columns, in file order.
pub const COLUMNS: [&str; 6] = ["open", "high", "low", "close", "volume", "openinterest"];

/// One row of the price file.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    /// Date string, kept verbatim from the input.
    pub date: String,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Volume.
    pub volume: f64,
    /// Open interest.
    pub openinterest: f64,
}

/// Columnar, immutable, chronologically ordered price data.
///
/// Row order defines the position index shared by every indicator output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    dates: Vec<String>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
    openinterest: Vec<f64>,
}

impl PriceTable {
    /// Builds a table from rows.
    #[must_use]
    pub fn from_rows(rows: Vec<PriceRow>) -> Self {
        let mut table = Self::default();
        for row in rows {
            table.dates.push(row.date);
            table.open.push(row.open);
            table.high.push(row.high);
            table.low.push(row.low);
            table.close.push(row.close);
            table.volume.push(row.volume);
            table.openinterest.push(row.openinterest);
        }
        table
    }

    /// Builds a table from whole columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableShape`] if any column length differs from `dates`.
    pub fn from_columns(dates: Vec<String>, columns: [Vec<f64>; 6]) -> Result<Self> {
        let expected = dates.len();
        for (name, col) in COLUMNS.iter().zip(columns.iter()) {
            if col.len() != expected {
                return Err(Error::TableShape {
                    column: *name,
                    expected,
                    actual: col.len(),
                });
            }
        }
        let [open, high, low, close, volume, openinterest] = columns;
        Ok(Self {
            dates,
            open,
            high,
            low,
            close,
            volume,
            openinterest,
        })
    }

    /// Builds a table where open, high, low and close all equal `closes`.
    ///
    /// Volume and open interest are zero; dates are the row numbers. Handy for
    /// single-input indicators and tests.
    #[must_use]
    pub fn from_closes(closes: &[f64]) -> Self {
        let n = closes.len();
        Self {
            dates: (0..n).map(|i| i.to_string()).collect(),
            open: closes.to_vec(),
            high: closes.to_vec(),
            low: closes.to_vec(),
            close: closes.to_vec(),
            volume: vec![0.0; n],
            openinterest: vec![0.0; n],
        }
    }

    /// Looks up a column by name (case-insensitive).
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let col = match name.to_ascii_lowercase().as_str() {
            "open" => &self.open,
            "high" => &self.high,
            "low" => &self.low,
            "close" => &self.close,
            "volume" => &self.volume,
            "openinterest" => &self.openinterest,
            _ => return None,
        };
        Some(col.as_slice())
    }

    /// Resolves several columns at once, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for the first name that is not a column.
    pub fn columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&[f64]>> {
        names
            .iter()
            .map(|n| {
                self.column(n.as_ref()).ok_or_else(|| Error::UnknownColumn {
                    column: n.as_ref().to_string(),
                })
            })
            .collect()
    }

    /// The date index.
    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
