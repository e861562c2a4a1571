//! Bollinger Bands.
//!
//! Middle band is the SMA; the outer bands sit `devs` population standard
//! deviations away. Both the window sum and the window sum of squares roll in
//! O(1) per step. Values are shifted by the first input before accumulating,
//! which keeps the sums small at high price levels:
//!
//! ```text
//! y   = x - x[0]
//! Var = sum_sq(y) / n - (sum(y) / n)^2
//! ```

use num_traits::Float;

use crate::error::Result;
use crate::traits::{validate_indicator_input, SeriesElement};

/// The three bands, aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput<T> {
    /// Middle band (SMA).
    pub middle: Vec<T>,
    /// Upper band.
    pub upper: Vec<T>,
    /// Lower band.
    pub lower: Vec<T>,
}

/// Number of leading NaN values in every band.
#[inline]
#[must_use]
pub const fn bollinger_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

#[inline]
fn variance<T: Float>(sum_sq: T, sum: T, period: T) -> T {
    let mean = sum / period;
    let v = sum_sq / period - mean * mean;
    // rounding can push a flat window slightly negative
    v.max(T::zero())
}

/// Computes Bollinger Bands.
///
/// # Errors
///
/// Returns an error if the period is zero or the data is shorter than the period.
pub fn bollinger<T: SeriesElement>(data: &[T], period: usize, devs: T) -> Result<BollingerOutput<T>> {
    validate_indicator_input(data, period, "bollinger")?;

    let n = data.len();
    let period_t = T::from_usize(period)?;
    let mut out = BollingerOutput {
        middle: vec![T::nan(); n],
        upper: vec![T::nan(); n],
        lower: vec![T::nan(); n],
    };

    let shift = data[0];
    let mut sum = T::zero();
    let mut sum_sq = T::zero();
    for &x in data.iter().take(period) {
        let y = x - shift;
        sum = sum + y;
        sum_sq = sum_sq + y * y;
    }

    for i in (period - 1)..n {
        if i >= period {
            let (new, old) = (data[i] - shift, data[i - period] - shift);
            sum = sum + new - old;
            sum_sq = sum_sq + new * new - old * old;
        }
        let mid = sum / period_t + shift;
        let width = devs * variance(sum_sq, sum, period_t).sqrt();
        out.middle[i] = mid;
        out.upper[i] = mid + width;
        out.lower[i] = mid - width;
    }

    Ok(out)
}
