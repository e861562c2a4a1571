//! CLI error types for file I/O, price-table parsing, suite loading and
//! argument validation.
//!
//! Error messages are actionable: they say what went wrong and, where there is
//! an obvious fix, how to fix it. Every [`CliError`] aborts the run before any
//! test executes and maps to exit status 2.

use std::fmt;
use std::io;

/// Process exit status for input errors.
pub const EXIT_INPUT_ERROR: i32 = 2;

/// CLI error type encompassing all input and setup failures.
#[derive(Debug)]
pub enum CliError {
    /// An I/O error occurred while reading a file.
    IoError {
        /// The underlying I/O error.
        source: io::Error,
        /// Path that caused the error, if known.
        path: Option<String>,
    },
    /// The price table could not be parsed.
    CsvParseError {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred, if known.
        line: Option<usize>,
    },
    /// A suite document could not be loaded.
    SuiteError {
        /// The underlying harness error.
        source: ta_crosscheck_core::Error,
        /// Path of the suite, or `None` for the embedded one.
        path: Option<String>,
    },
    /// An invalid argument was provided.
    InvalidArgument {
        /// Name of the invalid argument.
        argument: String,
        /// Description of why it's invalid.
        reason: String,
        /// Suggestion for valid values.
        suggestion: Option<String>,
    },
}

impl CliError {
    /// Exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        EXIT_INPUT_ERROR
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError { source, path } => {
                if let Some(p) = path {
                    write!(f, "I/O error with file '{p}': {source}. ")?;
                    write!(f, "Check that the file exists and you have read permissions.")
                } else {
                    write!(f, "I/O error: {source}")
                }
            }
            CliError::CsvParseError { message, line } => {
                if let Some(l) = line {
                    write!(f, "price data parse error on line {l}: {message}. ")?;
                } else {
                    write!(f, "price data parse error: {message}. ")?;
                }
                write!(
                    f,
                    "Expected a header row, then date,open,high,low,close,volume,openinterest rows."
                )
            }
            CliError::SuiteError { source, path } => {
                match path {
                    Some(p) => write!(f, "cannot load suite '{p}': {source}. ")?,
                    None => write!(f, "cannot load the embedded suite: {source}. ")?,
                }
                write!(f, "Each test needs a unique name and exactly one of 'indicator' or 'same_as'.")
            }
            CliError::InvalidArgument {
                argument,
                reason,
                suggestion,
            } => {
                write!(f, "Invalid argument '{argument}': {reason}")?;
                if let Some(s) = suggestion {
                    write!(f, ". {s}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::IoError { source, .. } => Some(source),
            CliError::SuiteError { source, .. } => Some(source),
            CliError::CsvParseError { .. } | CliError::InvalidArgument { .. } => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::IoError {
            source: err,
            path: None,
        }
    }
}

impl From<ta_crosscheck_core::Error> for CliError {
    fn from(err: ta_crosscheck_core::Error) -> Self {
        match err {
            ta_crosscheck_core::Error::ParamSyntax { input, reason } => CliError::InvalidArgument {
                argument: "parameter overrides".to_string(),
                reason: format!("cannot parse '{input}': {reason}"),
                suggestion: Some(
                    "Use comma-separated key=value pairs, e.g. \"period=20, devs=2.0\"".to_string(),
                ),
            },
            other => CliError::SuiteError {
                source: other,
                path: None,
            },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        ta_crosscheck_core::Error::from(err).into()
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().and_then(|p| usize::try_from(p.line()).ok());
        CliError::CsvParseError {
            message: err.to_string(),
            line,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Display Implementation Tests
    // ==========================================================================

    #[test]
    fn test_display_io_error_with_path() {
        let err = CliError::IoError {
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            path: Some("data/missing.txt".to_string()),
        };
        let display = format!("{err}");
        assert!(display.contains("data/missing.txt"));
        assert!(display.contains("Check that the file exists"));
    }

    #[test]
    fn test_display_csv_parse_error_with_line() {
        let err = CliError::CsvParseError {
            message: "cannot parse 'abc' as number".to_string(),
            line: Some(10),
        };
        let display = format!("{err}");
        assert!(display.contains("line 10"));
        assert!(display.contains("openinterest"));
    }

    #[test]
    fn test_display_suite_error_embedded() {
        let err = CliError::SuiteError {
            source: ta_crosscheck_core::Error::Suite {
                reason: "duplicate test name 'sma'".to_string(),
            },
            path: None,
        };
        let display = format!("{err}");
        assert!(display.contains("embedded suite"));
        assert!(display.contains("duplicate test name 'sma'"));
    }

    #[test]
    fn test_display_invalid_argument_with_suggestion() {
        let err = CliError::InvalidArgument {
            argument: "--decimals".to_string(),
            reason: "not a number".to_string(),
            suggestion: Some("Use an integer like 6".to_string()),
        };
        assert_eq!(
            format!("{err}"),
            "Invalid argument '--decimals': not a number. Use an integer like 6"
        );
    }

    // ==========================================================================
    // From Trait Tests
    // ==========================================================================

    #[test]
    fn test_from_param_syntax_is_invalid_argument() {
        let core = ta_crosscheck_core::params::parse_kwargs("period=").unwrap_err();
        let err: CliError = core.into();
        assert!(matches!(err, CliError::InvalidArgument { suggestion: Some(_), .. }));
        assert_eq!(err.exit_code(), EXIT_INPUT_ERROR);
        match err {
            CliError::InvalidArgument { argument, reason, .. } => {
                assert_eq!(argument, "parameter overrides");
                assert!(reason.starts_with("cannot parse 'period=': "));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CliError = json_err.into();
        assert!(matches!(err, CliError::SuiteError { path: None, .. }));
    }

    #[test]
    fn test_from_csv_error() {
        let result: std::result::Result<csv::StringRecord, csv::Error> = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\n1,2,3".as_bytes())
            .records()
            .last()
            .unwrap();
        let err: CliError = result.unwrap_err().into();
        assert!(matches!(err, CliError::CsvParseError { line: Some(2), .. }));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = CliError::IoError {
            source: io::Error::other("boom"),
            path: None,
        };
        assert!(err.source().is_some());
        let err = CliError::InvalidArgument {
            argument: "x".to_string(),
            reason: "y".to_string(),
            suggestion: None,
        };
        assert!(err.source().is_none());
    }
}
