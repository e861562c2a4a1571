//! Simple Moving Average (SMA).
//!
//! O(n) rolling sum: the first window is summed once, then each step adds the
//! newest value and subtracts the oldest.
//!
//! ```text
//! SMA = (P1 + P2 + ... + Pn) / n
//! ```
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_indicators::candidate::sma::sma;
//!
//! let result = sma(&[1.0_f64, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
//! assert!(result[1].is_nan());
//! assert!((result[2] - 2.0).abs() < 1e-10);
//! assert!((result[4] - 4.0).abs() < 1e-10);
//! ```

use crate::error::Result;
use crate::traits::{validate_indicator_input, SeriesElement};

/// Number of leading NaN values in the output.
#[inline]
#[must_use]
pub const fn sma_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Computes the Simple Moving Average.
///
/// The first `period - 1` values are NaN.
///
/// # Errors
///
/// Returns an error if the period is zero or the data is shorter than the period.
pub fn sma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "sma")?;

    let period_t = T::from_usize(period)?;
    let mut result = vec![T::nan(); data.len()];

    let mut sum = data.iter().take(period).fold(T::zero(), |acc, &x| acc + x);
    result[period - 1] = sum / period_t;

    for i in period..data.len() {
        sum = sum + data[i] - data[i - period];
        result[i] = sum / period_t;
    }

    Ok(result)
}
