//! Error types for the bundled indicator kernels.

use thiserror::Error;

/// Errors raised by the bundled candidate and reference kernels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input series is too short for the requested period.
    #[error("insufficient data for {indicator}: required {required} elements, got {actual}")]
    InsufficientData {
        /// The number of data points required.
        required: usize,
        /// The number of data points provided.
        actual: usize,
        /// The indicator that rejected the input.
        indicator: &'static str,
    },

    /// The input series is empty.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// A period parameter is invalid.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid period value that was provided.
        period: usize,
        /// Why the period is invalid.
        reason: &'static str,
    },

    /// Multi-input indicators need equally long inputs.
    #[error("input length mismatch for {indicator}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the first input.
        expected: usize,
        /// Length of the offending input.
        actual: usize,
        /// The indicator that rejected the input.
        indicator: &'static str,
    },

    /// The adapter was handed the wrong number of input columns.
    #[error("{indicator} takes {expected} input column(s), got {actual}")]
    InputCount {
        /// Number of columns the indicator takes.
        expected: usize,
        /// Number of columns given.
        actual: usize,
        /// The indicator.
        indicator: &'static str,
    },

    /// Failed to convert a numeric value to the series element type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

/// Convenience type alias for Results using the kernel Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = Error::InsufficientData {
            required: 20,
            actual: 10,
            indicator: "sma",
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for sma: required 20 elements, got 10"
        );
    }

    #[test]
    fn test_invalid_period_message() {
        let err = Error::InvalidPeriod {
            period: 0,
            reason: "period must be at least 1",
        };
        assert_eq!(err.to_string(), "invalid period 0: period must be at least 1");
    }

    #[test]
    fn test_input_count_message() {
        let err = Error::InputCount {
            expected: 3,
            actual: 1,
            indicator: "atr",
        };
        assert_eq!(err.to_string(), "atr takes 3 input column(s), got 1");
    }
}
