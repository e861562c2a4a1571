//! Weighted Moving Average (WMA).
//!
//! Linear weights, oldest = 1 and newest = `period`. The weighted and plain
//! window sums are both rolled forward in O(1) per step:
//!
//! ```text
//! WS' = WS - S + period × P[new]
//! S'  = S - P[old] + P[new]
//! WMA = WS / (period × (period + 1) / 2)
//! ```
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_indicators::candidate::wma::wma;
//!
//! let result = wma(&[10.0_f64, 11.0, 12.0, 13.0], 3).unwrap();
//! // (10×1 + 11×2 + 12×3) / 6
//! assert!((result[2] - 68.0 / 6.0).abs() < 1e-10);
//! ```

use crate::error::Result;
use crate::traits::{validate_indicator_input, SeriesElement};

/// Number of leading NaN values in the output.
#[inline]
#[must_use]
pub const fn wma_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Computes the Weighted Moving Average.
///
/// # Errors
///
/// Returns an error if the period is zero or the data is shorter than the period.
pub fn wma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "wma")?;

    let weight_sum = T::from_usize(period * (period + 1) / 2)?;
    let period_t = T::from_usize(period)?;
    let mut result = vec![T::nan(); data.len()];

    let mut weighted_sum = T::zero();
    let mut simple_sum = T::zero();
    for (i, &value) in data.iter().take(period).enumerate() {
        weighted_sum = weighted_sum + value * T::from_usize(i + 1)?;
        simple_sum = simple_sum + value;
    }
    result[period - 1] = weighted_sum / weight_sum;

    for i in period..data.len() {
        weighted_sum = weighted_sum - simple_sum + data[i] * period_t;
        simple_sum = simple_sum - data[i - period] + data[i];
        result[i] = weighted_sum / weight_sum;
    }

    Ok(result)
}
