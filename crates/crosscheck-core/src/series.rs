//! Named output series and indicator results.
//!
//! Every series is aligned 1:1 with the rows of the [`PriceTable`](crate::table::PriceTable)
//! it was computed from. Missing values are NaN; any NaN payload counts as a
//! missing marker, so two implementations that use different NaN bit patterns
//! still agree on *where* values are missing.

use crate::params::Params;

/// Returns `true` if the value is a missing marker.
#[inline]
#[must_use]
pub fn is_missing(value: f64) -> bool {
    value.is_nan()
}

/// Rounds a value to `decimals` decimal places.
///
/// Ties round to even at the scaled value, matching the behaviour of numpy's
/// `around`. NaN stays NaN. When scaling would overflow, the value is returned
/// unchanged (it already has fewer significant decimals than requested).
///
/// # Example
///
/// ```
/// use ta_crosscheck_core::series::round_to;
///
/// assert_eq!(round_to(1.23456, 2), 1.23);
/// assert_eq!(round_to(2.5, 0), 2.0);
/// assert!(round_to(f64::NAN, 3).is_nan());
/// ```
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if value.is_nan() || value.is_infinite() {
        return value;
    }
    let factor = 10_f64.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || !factor.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

/// Counts the leading run of missing values.
#[must_use]
pub fn leading_missing(values: &[f64]) -> usize {
    values.iter().take_while(|v| is_missing(**v)).count()
}

/// A numeric output sequence with a name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    name: String,
    values: Vec<f64>,
}

impl NamedSeries {
    /// Creates a named series.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// The output name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The values, one per price-table row.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a copy rounded to `decimals` places.
    #[must_use]
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            name: self.name.clone(),
            values: self.values.iter().map(|v| round_to(*v, decimals)).collect(),
        }
    }

    /// Per-position missing flags.
    #[must_use]
    pub fn missing_mask(&self) -> Vec<bool> {
        self.values.iter().map(|v| is_missing(*v)).collect()
    }
}

/// The outputs of one indicator invocation plus its warm-up metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorResult {
    outputs: Vec<NamedSeries>,
    minperiod: usize,
    minperiods: Vec<usize>,
    params: Params,
}

impl IndicatorResult {
    /// Creates a result with explicitly declared minperiods.
    ///
    /// `minperiod` is the smallest position from which every output is defined.
    pub fn new(
        outputs: Vec<NamedSeries>,
        minperiod: usize,
        minperiods: Vec<usize>,
        params: Params,
    ) -> Self {
        Self {
            outputs,
            minperiod,
            minperiods,
            params,
        }
    }

    /// Creates a result whose minperiods are derived from the leading missing
    /// run of each output.
    pub fn from_outputs(outputs: Vec<NamedSeries>, params: Params) -> Self {
        let minperiods: Vec<usize> = outputs.iter().map(|o| leading_missing(o.values())).collect();
        let minperiod = minperiods.iter().copied().max().unwrap_or(0);
        Self::new(outputs, minperiod, minperiods, params)
    }

    /// The outputs, in the order the implementation produced them.
    #[must_use]
    pub fn outputs(&self) -> &[NamedSeries] {
        &self.outputs
    }

    /// Global minperiod.
    #[must_use]
    pub fn minperiod(&self) -> usize {
        self.minperiod
    }

    /// Per-output minperiods.
    #[must_use]
    pub fn minperiods(&self) -> &[usize] {
        &self.minperiods
    }

    /// The resolved parameters the implementation ran with.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Output names in order.
    #[must_use]
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(NamedSeries::name).collect()
    }

    /// Swaps outputs `a` and `b` (and their minperiods, when declared).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SwapOutOfRange`](crate::Error::SwapOutOfRange) if either
    /// index does not name an output.
    pub fn swap_outputs(&mut self, a: usize, b: usize) -> crate::Result<()> {
        let outputs = self.outputs.len();
        for index in [a, b] {
            if index >= outputs {
                return Err(crate::Error::SwapOutOfRange { index, outputs });
            }
        }
        self.outputs.swap(a, b);
        if a < self.minperiods.len() && b < self.minperiods.len() {
            self.minperiods.swap(a, b);
        }
        Ok(())
    }
}
