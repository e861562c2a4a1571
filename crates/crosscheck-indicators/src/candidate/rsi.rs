//! Relative Strength Index (RSI), Wilder's smoothing.
//!
//! The first average gain and loss are plain means over the first `period`
//! price changes; later ones use Wilder's recurrence:
//!
//! ```text
//! avg = (prev_avg × (period - 1) + current) / period
//! RSI = 100 × avg_gain / (avg_gain + avg_loss)
//! ```
//!
//! The first value is at index `period`. A window without any movement reads 50.
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_indicators::candidate::rsi::rsi;
//!
//! let rising: Vec<f64> = (0..20).map(f64::from).collect();
//! let result = rsi(&rising, 14).unwrap();
//! assert!(result[13].is_nan());
//! assert!((result[14] - 100.0).abs() < 1e-10);
//! ```

use crate::error::Result;
use crate::traits::{validate_min_length, validate_period, SeriesElement};

/// Number of leading NaN values in the output.
#[inline]
#[must_use]
pub const fn rsi_lookback(period: usize) -> usize {
    period
}

/// Computes the RSI.
///
/// # Errors
///
/// Returns an error if the period is zero or the data holds fewer than
/// `period + 1` values.
pub fn rsi<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period(period)?;
    validate_min_length(data, period + 1, "rsi")?;

    let period_t = T::from_usize(period)?;
    let period_minus_one_t = T::from_usize(period - 1)?;
    let mut output = vec![T::nan(); data.len()];

    let (mut avg_gain, mut avg_loss) = (1..=period).fold((T::zero(), T::zero()), |(g, l), i| {
        let (gain, loss) = split_change(data[i] - data[i - 1]);
        (g + gain, l + loss)
    });
    avg_gain = avg_gain / period_t;
    avg_loss = avg_loss / period_t;
    output[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..data.len() {
        let (gain, loss) = split_change(data[i] - data[i - 1]);
        avg_gain = (avg_gain * period_minus_one_t + gain) / period_t;
        avg_loss = (avg_loss * period_minus_one_t + loss) / period_t;
        output[i] = rsi_value(avg_gain, avg_loss);
    }

    Ok(output)
}

#[inline]
fn split_change<T: SeriesElement>(change: T) -> (T, T) {
    if change > T::zero() {
        (change, T::zero())
    } else {
        (T::zero(), -change.min(T::zero()))
    }
}

#[inline]
fn rsi_value<T: SeriesElement>(avg_gain: T, avg_loss: T) -> T {
    let total = avg_gain + avg_loss;
    if total == T::zero() {
        T::fifty()
    } else {
        T::hundred() * avg_gain / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_falling_is_zero() {
        let data: Vec<f64> = (0..10).rev().map(f64::from).collect();
        let result = rsi(&data, 3).unwrap();
        assert!(result[2].is_nan());
        assert!(result[3].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let result = rsi(&[5.0_f64; 6], 3).unwrap();
        assert!((result[5] - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_needs_period_plus_one() {
        assert!(rsi(&[1.0_f64, 2.0, 3.0], 3).is_err());
        assert!(rsi(&[1.0_f64, 2.0, 3.0, 4.0], 3).is_ok());
        assert_eq!(rsi_lookback(14), 14);
    }

    #[test]
    fn test_rsi_bounded() {
        let data = [44.0_f64, 44.3, 44.1, 43.6, 44.3, 44.8, 45.1, 45.4, 45.8, 46.0];
        let result = rsi(&data, 4).unwrap();
        for v in result.iter().skip(4) {
            assert!((0.0..=100.0).contains(v));
        }
    }
}
