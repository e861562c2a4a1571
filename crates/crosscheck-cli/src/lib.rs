//! ta-crosscheck CLI library
//!
//! Loads the price file and the suite, turns the command line into run
//! options, and runs the suite with the bundled candidate and reference
//! libraries. Exposed as a library for testing and reuse.

pub mod args;
pub mod error;
pub mod price_data;

pub use error::{CliError, Result};

use std::fs;
use std::path::Path;

use ta_crosscheck_core::registry::{Registry, RunOrigin};
use ta_crosscheck_core::runner::{Results, RunStatus, Runner};
use ta_crosscheck_core::table::PriceTable;
use ta_crosscheck_indicators::{candidate_library, reference_library};

use crate::args::Args;

/// The suite run when `--suite` is not given.
pub const DEFAULT_SUITE: &str = include_str!("../suites/default.json");

/// Load a JSON suite from `path`, or the embedded default suite.
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be read and
/// `CliError::SuiteError` if it is not a valid suite.
pub fn load_suite(path: Option<&Path>) -> Result<Registry> {
    match path {
        None => Ok(Registry::from_json(DEFAULT_SUITE)?),
        Some(p) => {
            let display = p.display().to_string();
            let json = fs::read_to_string(p).map_err(|e| CliError::IoError {
                source: e,
                path: Some(display.clone()),
            })?;
            Registry::from_json(&json).map_err(|e| CliError::SuiteError {
                source: e,
                path: Some(display),
            })
        }
    }
}

/// Runs the suite described by `args`.
///
/// Input errors abort before any test runs. Listing names needs no price data.
///
/// # Errors
///
/// Returns a `CliError` for malformed overrides or an unreadable price file
/// or suite.
pub fn run(args: &Args) -> Result<RunStatus> {
    let options = args.run_options()?;
    let registry = load_suite(args.suite.as_deref())?;
    let table = if options.list_names {
        PriceTable::default()
    } else {
        price_data::load_price_table(&args.data)?
    };

    let candidates = candidate_library();
    let references = reference_library();
    let mut results = Results::new();
    Ok(Runner::new(&table, &candidates, &references).run(
        &registry,
        &options,
        RunOrigin::EntryPoint,
        &mut results,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ta_crosscheck_core::registry::TestEntry;

    #[test]
    fn test_default_suite_loads() {
        let registry = load_suite(None).unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["sma", "simple_moving_average", "ema", "wma", "rsi", "atr", "bollinger", "macd"]
        );
        match registry.get("bollinger") {
            Some(TestEntry::Indicator(spec)) => assert_eq!(spec.swapouts, vec![(0, 1)]),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_missing_suite_file() {
        let err = load_suite(Some(Path::new("no/such/suite.json"))).unwrap_err();
        assert!(matches!(err, CliError::IoError { .. }));
    }
}
