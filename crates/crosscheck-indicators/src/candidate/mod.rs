//! The candidate library: streaming O(n) kernels behind [`CandidateIndicator`].
//!
//! Parameter names and defaults follow the library under test (`period`,
//! `devs`, `fast`/`slow`/`signal`), not the reference library's.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod wma;

use std::fmt;

use ta_crosscheck_core::adapter::{CandidateIndicator, CandidateLibrary};
use ta_crosscheck_core::params::Params;
use ta_crosscheck_core::series::{IndicatorResult, NamedSeries};

use crate::error::Error;

type Kernel = fn(&[f64], usize) -> crate::Result<Vec<f64>>;

/// Picks exactly `N` input columns.
pub(crate) fn take_inputs<'a, const N: usize>(
    inputs: &[&'a [f64]],
    indicator: &'static str,
) -> ta_crosscheck_core::Result<[&'a [f64]; N]> {
    <[&[f64]; N]>::try_from(inputs).map_err(|_| {
        ta_crosscheck_core::Error::compute(
            indicator,
            Error::InputCount {
                expected: N,
                actual: inputs.len(),
                indicator,
            },
        )
    })
}

fn single_input_period(
    name: &'static str,
    inputs: &[&[f64]],
    params: &Params,
    default_period: usize,
    kernel: Kernel,
) -> ta_crosscheck_core::Result<IndicatorResult> {
    let [close] = take_inputs::<1>(inputs, name)?;
    let period = params.usize_or("period", default_period)?;
    let values = kernel(close, period).map_err(|e| ta_crosscheck_core::Error::compute(name, e))?;
    let resolved = Params::new().with("period", period_param(period)?);
    Ok(IndicatorResult::from_outputs(vec![NamedSeries::new(name, values)], resolved))
}

pub(crate) fn period_param(period: usize) -> ta_crosscheck_core::Result<i64> {
    i64::try_from(period).map_err(|_| ta_crosscheck_core::Error::param("period", "does not fit in an integer"))
}

/// A single-input, single-output indicator driven by one `period`.
#[derive(Clone, Copy)]
pub struct PeriodIndicator {
    name: &'static str,
    outputs: &'static [&'static str],
    default_period: usize,
    kernel: Kernel,
}

impl PeriodIndicator {
    /// Simple moving average, default period 30.
    #[must_use]
    pub fn sma() -> Self {
        Self {
            name: "sma",
            outputs: &["sma"],
            default_period: 30,
            kernel: sma::sma,
        }
    }

    /// Exponential moving average, default period 30.
    #[must_use]
    pub fn ema() -> Self {
        Self {
            name: "ema",
            outputs: &["ema"],
            default_period: 30,
            kernel: ema::ema,
        }
    }

    /// Weighted moving average, default period 30.
    #[must_use]
    pub fn wma() -> Self {
        Self {
            name: "wma",
            outputs: &["wma"],
            default_period: 30,
            kernel: wma::wma,
        }
    }

    /// Relative strength index, default period 14.
    #[must_use]
    pub fn rsi() -> Self {
        Self {
            name: "rsi",
            outputs: &["rsi"],
            default_period: 14,
            kernel: rsi::rsi,
        }
    }
}

impl fmt::Debug for PeriodIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodIndicator")
            .field("name", &self.name)
            .field("default_period", &self.default_period)
            .finish_non_exhaustive()
    }
}

impl CandidateIndicator for PeriodIndicator {
    fn name(&self) -> &str {
        self.name
    }

    fn inputs(&self) -> &[&'static str] {
        &["close"]
    }

    fn outputs(&self) -> &[&'static str] {
        self.outputs
    }

    fn default_params(&self) -> Params {
        Params::new().with("period", i64::try_from(self.default_period).unwrap_or(i64::MAX))
    }

    fn compute(&self, inputs: &[&[f64]], params: &Params) -> ta_crosscheck_core::Result<IndicatorResult> {
        single_input_period(self.name, inputs, params, self.default_period, self.kernel)
    }
}

/// Average true range over high, low and close.
#[derive(Debug, Clone, Copy, Default)]
pub struct Atr;

impl CandidateIndicator for Atr {
    fn name(&self) -> &str {
        "atr"
    }

    fn inputs(&self) -> &[&'static str] {
        &["high", "low", "close"]
    }

    fn outputs(&self) -> &[&'static str] {
        &["atr"]
    }

    fn default_params(&self) -> Params {
        Params::new().with("period", 14_i64)
    }

    fn compute(&self, inputs: &[&[f64]], params: &Params) -> ta_crosscheck_core::Result<IndicatorResult> {
        let [high, low, close] = take_inputs::<3>(inputs, "atr")?;
        let period = params.usize_or("period", 14)?;
        let values = atr::atr(high, low, close, period).map_err(|e| ta_crosscheck_core::Error::compute("atr", e))?;
        Ok(IndicatorResult::from_outputs(
            vec![NamedSeries::new("atr", values)],
            Params::new().with("period", period_param(period)?),
        ))
    }
}

/// Bollinger Bands. Known to the reference library as `BBANDS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bollinger;

impl CandidateIndicator for Bollinger {
    fn name(&self) -> &str {
        "bollinger"
    }

    fn inputs(&self) -> &[&'static str] {
        &["close"]
    }

    fn outputs(&self) -> &[&'static str] {
        &["mid", "top", "bot"]
    }

    fn aliases(&self) -> &[&'static str] {
        &["BBANDS"]
    }

    fn default_params(&self) -> Params {
        Params::new().with("period", 20_i64).with("devs", 2.0)
    }

    fn compute(&self, inputs: &[&[f64]], params: &Params) -> ta_crosscheck_core::Result<IndicatorResult> {
        let [close] = take_inputs::<1>(inputs, "bollinger")?;
        let period = params.usize_or("period", 20)?;
        let devs = params.f64_or("devs", 2.0)?;
        let bands =
            bollinger::bollinger(close, period, devs).map_err(|e| ta_crosscheck_core::Error::compute("bollinger", e))?;
        Ok(IndicatorResult::from_outputs(
            vec![
                NamedSeries::new("mid", bands.middle),
                NamedSeries::new("top", bands.upper),
                NamedSeries::new("bot", bands.lower),
            ],
            Params::new().with("period", period_param(period)?).with("devs", devs),
        ))
    }
}

/// MACD with its signal line and histogram.
///
/// The macd line warms up earlier than the other two, so minperiods are
/// declared rather than derived.
#[derive(Debug, Clone, Copy, Default)]
pub struct Macd;

impl CandidateIndicator for Macd {
    fn name(&self) -> &str {
        "macd"
    }

    fn inputs(&self) -> &[&'static str] {
        &["close"]
    }

    fn outputs(&self) -> &[&'static str] {
        &["macd", "signal", "histo"]
    }

    fn default_params(&self) -> Params {
        Params::new()
            .with("fast", 12_i64)
            .with("slow", 26_i64)
            .with("signal", 9_i64)
    }

    fn compute(&self, inputs: &[&[f64]], params: &Params) -> ta_crosscheck_core::Result<IndicatorResult> {
        let [close] = take_inputs::<1>(inputs, "macd")?;
        let fast = params.usize_or("fast", 12)?;
        let slow = params.usize_or("slow", 26)?;
        let signal = params.usize_or("signal", 9)?;
        let out = macd::macd(close, fast, slow, signal).map_err(|e| ta_crosscheck_core::Error::compute("macd", e))?;
        let (macd_start, signal_start) = macd::macd_lookbacks(slow, signal);
        Ok(IndicatorResult::new(
            vec![
                NamedSeries::new("macd", out.macd),
                NamedSeries::new("signal", out.signal),
                NamedSeries::new("histo", out.histogram),
            ],
            signal_start,
            vec![macd_start, signal_start, signal_start],
            Params::new()
                .with("fast", period_param(fast)?)
                .with("slow", period_param(slow)?)
                .with("signal", period_param(signal)?),
        ))
    }
}

/// Every bundled candidate indicator.
#[must_use]
pub fn candidate_library() -> CandidateLibrary {
    let mut lib = CandidateLibrary::new();
    lib.register(PeriodIndicator::sma())
        .register(PeriodIndicator::ema())
        .register(PeriodIndicator::wma())
        .register(PeriodIndicator::rsi())
        .register(Atr)
        .register(Bollinger)
        .register(Macd);
    lib
}

#[cfg(test)]
mod tests {
    use super::*;
    use ta_crosscheck_core::params::ParamValue;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn test_library_contents() {
        let lib = candidate_library();
        assert_eq!(
            lib.names().collect::<Vec<_>>(),
            vec!["atr", "bollinger", "ema", "macd", "rsi", "sma", "wma"]
        );
        assert_eq!(lib.get("bollinger").unwrap().aliases(), &["BBANDS"]);
        assert_eq!(lib.get("atr").unwrap().inputs(), &["high", "low", "close"]);
    }

    #[test]
    fn test_sma_resolves_period() {
        let data = ramp(40);
        let result = PeriodIndicator::sma().compute(&[&data], &Params::new().with("period", 5_i64)).unwrap();
        assert_eq!(result.minperiod(), 4);
        assert_eq!(result.params().get("period"), Some(&ParamValue::Int(5)));
        assert_eq!(result.output_names(), vec!["sma"]);
    }

    #[test]
    fn test_wrong_input_count() {
        let data = ramp(40);
        let err = Atr.compute(&[&data], &Params::new()).unwrap_err();
        assert!(err.to_string().contains("atr takes 3 input column(s), got 1"));
    }

    #[test]
    fn test_bad_param_type() {
        let data = ramp(40);
        let err = PeriodIndicator::ema()
            .compute(&[&data], &Params::new().with("period", "ten"))
            .unwrap_err();
        assert!(matches!(err, ta_crosscheck_core::Error::Param { .. }));
    }

    #[test]
    fn test_macd_declares_minperiods() {
        let data = ramp(60);
        let result = Macd.compute(&[&data], &Params::new()).unwrap();
        assert_eq!(result.minperiods(), &[25, 33, 33]);
        assert_eq!(result.minperiod(), 33);
    }

    #[test]
    fn test_bollinger_outputs() {
        let data = ramp(40);
        let result = Bollinger.compute(&[&data], &Params::new()).unwrap();
        assert_eq!(result.output_names(), vec!["mid", "top", "bot"]);
        assert_eq!(result.minperiods(), &[19, 19, 19]);
    }

    #[test]
    fn test_kernel_error_wrapped() {
        let data = ramp(3);
        let err = PeriodIndicator::sma().compute(&[&data], &Params::new()).unwrap_err();
        assert!(matches!(err, ta_crosscheck_core::Error::Compute { .. }));
        assert!(err.to_string().starts_with("sma failed: insufficient data"));
    }
}
