//! Moving Average Convergence Divergence (MACD).
//!
//! ```text
//! macd   = EMA(fast) - EMA(slow)          first value at slow - 1
//! signal = EMA(signal) of the macd line   first value at slow + signal - 2
//! histo  = macd - signal
//! ```
//!
//! The macd line is published as soon as it exists, so its warm-up is shorter
//! than that of the signal and histogram lines.

use crate::candidate::ema::{ema, ema_core};
use crate::error::{Error, Result};
use crate::traits::{validate_min_length, validate_period, SeriesElement};

/// The three MACD lines, aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput<T> {
    /// Fast EMA minus slow EMA.
    pub macd: Vec<T>,
    /// EMA of the macd line.
    pub signal: Vec<T>,
    /// Macd minus signal.
    pub histogram: Vec<T>,
}

/// Leading NaN counts of the macd line and of the signal and histogram lines.
#[inline]
#[must_use]
pub const fn macd_lookbacks(slow: usize, signal: usize) -> (usize, usize) {
    (slow.saturating_sub(1), (slow + signal).saturating_sub(2))
}

/// Computes the MACD.
///
/// # Errors
///
/// Returns an error if a period is zero, `fast >= slow`, or the data holds
/// fewer than `slow + signal - 1` values.
pub fn macd<T: SeriesElement>(data: &[T], fast: usize, slow: usize, signal: usize) -> Result<MacdOutput<T>> {
    for period in [fast, slow, signal] {
        validate_period(period)?;
    }
    if fast >= slow {
        return Err(Error::InvalidPeriod {
            period: fast,
            reason: "fast period must be less than slow period",
        });
    }
    validate_min_length(data, slow + signal - 1, "macd")?;

    let n = data.len();
    let fast_ema = ema(data, fast)?;
    let slow_ema = ema(data, slow)?;

    let (macd_start, signal_start) = macd_lookbacks(slow, signal);
    let mut macd_line = vec![T::nan(); n];
    for i in macd_start..n {
        macd_line[i] = fast_ema[i] - slow_ema[i];
    }

    let mut signal_line = vec![T::nan(); n];
    let alpha = T::two() / T::from_usize(signal + 1)?;
    ema_core(&macd_line[macd_start..], signal, alpha, &mut signal_line[macd_start..])?;

    let mut histogram = vec![T::nan(); n];
    for i in signal_start..n {
        histogram[i] = macd_line[i] - signal_line[i];
    }

    Ok(MacdOutput {
        macd: macd_line,
        signal: signal_line,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn test_macd_warmups() {
        let out = macd(&ramp(50), 12, 26, 9).unwrap();
        assert!(out.macd[24].is_nan());
        assert!(!out.macd[25].is_nan());
        assert!(out.signal[32].is_nan());
        assert!(!out.signal[33].is_nan());
        assert!(!out.histogram[33].is_nan());
        assert_eq!(macd_lookbacks(26, 9), (25, 33));
    }

    #[test]
    fn test_macd_histogram_is_difference() {
        let out = macd(&ramp(60), 3, 6, 4).unwrap();
        for i in 8..60 {
            assert!((out.histogram[i] - (out.macd[i] - out.signal[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macd_rejects_fast_not_below_slow() {
        assert!(matches!(
            macd(&ramp(50), 26, 12, 9),
            Err(Error::InvalidPeriod { period: 26, .. })
        ));
    }

    #[test]
    fn test_macd_insufficient_data() {
        assert!(matches!(
            macd(&ramp(30), 12, 26, 9),
            Err(Error::InsufficientData { required: 34, .. })
        ));
    }
}
