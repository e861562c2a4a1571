//! Exponential Moving Average (EMA).
//!
//! Seeded with the SMA of the first `period` values, then smoothed with
//! `α = 2 / (period + 1)`:
//!
//! ```text
//! EMA[i] = α × P[i] + (1 - α) × EMA[i-1]
//! ```
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_indicators::candidate::ema::ema;
//!
//! let result = ema(&[10.0_f64, 11.0, 12.0, 13.0], 3).unwrap();
//! assert!(result[1].is_nan());
//! assert!((result[2] - 11.0).abs() < 1e-10);
//! assert!((result[3] - 12.0).abs() < 1e-10);
//! ```

use crate::error::Result;
use crate::traits::{validate_indicator_input, SeriesElement};

/// Number of leading NaN values in the output.
#[inline]
#[must_use]
pub const fn ema_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Computes the standard EMA.
///
/// # Errors
///
/// Returns an error if the period is zero or the data is shorter than the period.
pub fn ema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "ema")?;
    let alpha = T::two() / T::from_usize(period + 1)?;
    let mut output = vec![T::nan(); data.len()];
    ema_core(data, period, alpha, &mut output)?;
    Ok(output)
}

/// Fills `output[period - 1..]` with the EMA of `data`.
///
/// A NaN in the seed window or in the data makes the rest of the output NaN.
pub(crate) fn ema_core<T: SeriesElement>(data: &[T], period: usize, alpha: T, output: &mut [T]) -> Result<()> {
    let one_minus_alpha = T::one() - alpha;
    let period_t = T::from_usize(period)?;

    let seed = data.iter().take(period).fold(T::zero(), |acc, &x| acc + x) / period_t;
    output[period - 1] = seed;

    let mut prev = seed;
    for i in period..data.len() {
        let value = data[i];
        prev = if prev.is_nan() || value.is_nan() {
            T::nan()
        } else {
            alpha * value + one_minus_alpha * prev
        };
        output[i] = prev;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seed_is_sma() {
        let result = ema(&[2.0_f64, 4.0, 6.0, 8.0], 3).unwrap();
        assert!((result[2] - 4.0).abs() < 1e-10);
        // α = 0.5: 0.5 × 8 + 0.5 × 4
        assert!((result[3] - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_nan_propagates() {
        let result = ema(&[1.0_f64, 2.0, f64::NAN, 4.0, 5.0], 2).unwrap();
        assert!(!result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(result[4].is_nan());
    }

    #[test]
    fn test_ema_lookback() {
        assert_eq!(ema_lookback(30), 29);
    }
}
