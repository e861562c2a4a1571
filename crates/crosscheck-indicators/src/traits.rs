//! Numeric element trait and input validation shared by the kernels.
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_indicators::traits::{validate_indicator_input, SeriesElement};
//!
//! fn mean<T: SeriesElement>(data: &[T], period: usize) -> ta_crosscheck_indicators::Result<T> {
//!     validate_indicator_input(data, period, "mean")?;
//!     let sum = data.iter().take(period).fold(T::zero(), |acc, &x| acc + x);
//!     Ok(sum / T::from_usize(period)?)
//! }
//!
//! assert!((mean(&[1.0_f64, 2.0, 3.0], 3).unwrap() - 2.0).abs() < 1e-12);
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A type usable as an element of a price or indicator series.
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Converts a period or count.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Converts a floating-point parameter.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// The constant 2, used by EMA smoothing `2 / (period + 1)`.
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// The constant 50, the neutral RSI value.
    #[inline]
    #[must_use]
    fn fifty() -> Self {
        Self::hundred() / Self::two()
    }

    /// The constant 100.
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        let ten = Self::two() * Self::two() + Self::two() * Self::two() + Self::two();
        ten * ten
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Rejects a zero period.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if the period is zero.
#[inline]
pub const fn validate_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(Error::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        })
    } else {
        Ok(())
    }
}

/// Checks that a non-empty series holds at least `required` elements.
///
/// # Errors
///
/// Returns `Error::EmptyInput` or `Error::InsufficientData`.
#[inline]
pub fn validate_min_length<T>(data: &[T], required: usize, indicator: &'static str) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if data.len() < required {
        return Err(Error::InsufficientData {
            required,
            actual: data.len(),
            indicator,
        });
    }
    Ok(())
}

/// Validates a period and a series long enough to produce one value.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod`, `Error::EmptyInput` or `Error::InsufficientData`.
#[inline]
pub fn validate_indicator_input<T: SeriesElement>(
    data: &[T],
    period: usize,
    indicator: &'static str,
) -> Result<()> {
    validate_period(period)?;
    validate_min_length(data, period, indicator)
}

/// Checks that high, low and close have the same length.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` naming the first input that differs.
#[inline]
pub fn validate_same_length<T>(high: &[T], low: &[T], close: &[T], indicator: &'static str) -> Result<()> {
    for other in [low, close] {
        if other.len() != high.len() {
            return Err(Error::LengthMismatch {
                expected: high.len(),
                actual: other.len(),
                indicator,
            });
        }
    }
    Ok(())
}
