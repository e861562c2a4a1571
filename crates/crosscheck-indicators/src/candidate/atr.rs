//! Average True Range (ATR).
//!
//! ```text
//! TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|)
//! ATR   = mean(TR[1..=period]), then Wilder smoothing
//! ```
//!
//! True range needs a previous close, so the first ATR value is at index `period`.

use crate::error::Result;
use crate::traits::{validate_min_length, validate_period, validate_same_length, SeriesElement};

/// Number of leading NaN values in the output.
#[inline]
#[must_use]
pub const fn atr_lookback(period: usize) -> usize {
    period
}

#[inline]
fn true_range<T: SeriesElement>(high: T, low: T, prev_close: T) -> T {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Computes the ATR.
///
/// # Errors
///
/// Returns an error if the inputs differ in length, the period is zero, or
/// fewer than `period + 1` bars are given.
pub fn atr<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    validate_same_length(high, low, close, "atr")?;
    validate_period(period)?;
    validate_min_length(high, period + 1, "atr")?;

    let n = high.len();
    let period_t = T::from_usize(period)?;
    let period_minus_one_t = T::from_usize(period - 1)?;
    let mut output = vec![T::nan(); n];

    let sum_tr = (1..=period).fold(T::zero(), |acc, i| acc + true_range(high[i], low[i], close[i - 1]));
    let mut prev = sum_tr / period_t;
    output[period] = prev;

    for i in (period + 1)..n {
        let tr = true_range(high[i], low[i], close[i - 1]);
        prev = (prev * period_minus_one_t + tr) / period_t;
        output[i] = prev;
    }

    Ok(output)
}
