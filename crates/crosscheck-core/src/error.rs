//! Error types for ta-crosscheck-core.
//!
//! Errors raised while resolving or running a single test are contained by the
//! runner and turned into a failing verdict. Only [`Error::ParamSyntax`] and the
//! suite-loading errors are meant to surface to the caller, since they describe a
//! misconfigured run rather than a defect in the library under test.

use thiserror::Error;

/// The main error type for ta-crosscheck operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No candidate indicator is registered under the resolved name.
    #[error("no candidate indicator found for: {name}")]
    CandidateNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// No reference indicator could be located under any candidate name.
    ///
    /// `tried` lists every name that was looked up, in lookup order.
    #[error("no reference indicator found for: {name} (tried: {})", tried.join(", "))]
    ReferenceNotFound {
        /// The test name being resolved.
        name: String,
        /// Names looked up in the reference library.
        tried: Vec<String>,
    },

    /// An input column requested by a test does not exist in the price table.
    #[error("unknown input column '{column}'")]
    UnknownColumn {
        /// The requested column name.
        column: String,
    },

    /// A `key=value` override string could not be parsed.
    #[error("invalid parameter expression '{input}': {reason}")]
    ParamSyntax {
        /// The offending input string.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A parameter is missing or has the wrong type for the indicator.
    #[error("parameter '{key}': {reason}")]
    Param {
        /// The parameter name.
        key: String,
        /// Description of the problem.
        reason: String,
    },

    /// An indicator adapter failed to compute its outputs.
    #[error("{indicator} failed: {source}")]
    Compute {
        /// Name of the indicator that failed.
        indicator: String,
        /// The adapter's own error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A declared output swap references an output that does not exist.
    #[error("swap index {index} out of range for {outputs} outputs")]
    SwapOutOfRange {
        /// The out-of-range index.
        index: usize,
        /// Number of outputs produced by the indicator.
        outputs: usize,
    },

    /// Price table columns have inconsistent lengths.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    TableShape {
        /// The column with the wrong length.
        column: &'static str,
        /// Number of rows expected (length of the date index).
        expected: usize,
        /// Number of rows found.
        actual: usize,
    },

    /// A declarative suite is structurally invalid.
    #[error("invalid suite: {reason}")]
    Suite {
        /// Description of the problem.
        reason: String,
    },

    /// A suite document is not valid JSON or does not match the schema.
    #[error("suite is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an adapter error as [`Error::Compute`].
    pub fn compute<E>(indicator: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Compute {
            indicator: indicator.into(),
            source: Box::new(source),
        }
    }

    /// Builds an [`Error::Param`].
    pub fn param(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Param {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using the ta-crosscheck Error type.
pub type Result<T> = std::result::Result<T, Error>;
