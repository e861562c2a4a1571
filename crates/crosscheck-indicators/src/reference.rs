//! The reference library: textbook windowed implementations.
//!
//! Each value is recomputed from its own window wherever the definition allows
//! it, so these functions share no rolling state with the candidate kernels.
//! Names, parameter keys and defaults follow the TA-Lib conventions
//! (`SMA(timeperiod=30)`, `BBANDS(timeperiod=5, nbdevup=2, nbdevdn=2)`, ...).
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_core::params::Params;
//! use ta_crosscheck_indicators::reference::reference_library;
//!
//! let refs = reference_library();
//! let sma = refs.get("SMA").unwrap();
//! let data = [1.0, 2.0, 3.0, 4.0];
//! let out = sma.compute(&[&data], &Params::new().with("timeperiod", 2_i64)).unwrap();
//! assert_eq!(&out.outputs()[0].values()[1..], &[1.5, 2.5, 3.5]);
//! ```

use ta_crosscheck_core::adapter::{FnReference, ReferenceLibrary};
use ta_crosscheck_core::params::Params;
use ta_crosscheck_core::series::{IndicatorResult, NamedSeries};
use ta_crosscheck_core::Result;

use crate::candidate::{period_param, take_inputs};
use crate::error::Error;
use crate::traits::{validate_indicator_input, validate_min_length, validate_period, validate_same_length};

fn checked<T>(name: &'static str, result: crate::Result<T>) -> Result<T> {
    result.map_err(|e| ta_crosscheck_core::Error::compute(name, e))
}

#[allow(clippy::cast_precision_loss)]
fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

fn real(values: Vec<f64>, params: Params) -> IndicatorResult {
    IndicatorResult::from_outputs(vec![NamedSeries::new("real", values)], params)
}

fn sma_values(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; data.len()];
    for i in period.saturating_sub(1)..data.len() {
        out[i] = mean(&data[i + 1 - period..=i]);
    }
    out
}

/// EMA seeded with the mean of the first `period` values.
#[allow(clippy::cast_precision_loss)]
fn ema_values(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; data.len()];
    if period == 0 || data.len() < period {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = mean(&data[..period]);
    out[period - 1] = prev;
    for i in period..data.len() {
        prev += k * (data[i] - prev);
        out[i] = prev;
    }
    out
}

fn sma(inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
    let [close] = take_inputs::<1>(inputs, "SMA")?;
    let period = params.usize_or("timeperiod", 30)?;
    checked("SMA", validate_indicator_input(close, period, "SMA"))?;
    Ok(real(
        sma_values(close, period),
        Params::new().with("timeperiod", period_param(period)?),
    ))
}

fn ema(inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
    let [close] = take_inputs::<1>(inputs, "EMA")?;
    let period = params.usize_or("timeperiod", 30)?;
    checked("EMA", validate_indicator_input(close, period, "EMA"))?;
    Ok(real(
        ema_values(close, period),
        Params::new().with("timeperiod", period_param(period)?),
    ))
}

#[allow(clippy::cast_precision_loss)]
fn wma(inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
    let [close] = take_inputs::<1>(inputs, "WMA")?;
    let period = params.usize_or("timeperiod", 30)?;
    checked("WMA", validate_indicator_input(close, period, "WMA"))?;

    let divisor = (period * (period + 1) / 2) as f64;
    let mut out = vec![f64::NAN; close.len()];
    for i in (period - 1)..close.len() {
        let window = &close[i + 1 - period..=i];
        let weighted: f64 = window.iter().enumerate().map(|(w, x)| (w + 1) as f64 * x).sum();
        out[i] = weighted / divisor;
    }
    Ok(real(out, Params::new().with("timeperiod", period_param(period)?)))
}

#[allow(clippy::cast_precision_loss)]
fn rsi(inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
    let [close] = take_inputs::<1>(inputs, "RSI")?;
    let period = params.usize_or("timeperiod", 14)?;
    checked("RSI", validate_period(period))?;
    checked("RSI", validate_min_length(close, period + 1, "RSI"))?;

    let changes: Vec<f64> = close.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;
    let mut gain = changes[..period].iter().filter(|c| **c > 0.0).sum::<f64>() / p;
    let mut loss = -changes[..period].iter().filter(|c| **c < 0.0).sum::<f64>() / p;

    let value = |gain: f64, loss: f64| {
        if loss == 0.0 {
            if gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        }
    };

    let mut out = vec![f64::NAN; close.len()];
    out[period] = value(gain, loss);
    for (i, change) in changes.iter().enumerate().skip(period) {
        gain = (gain * (p - 1.0) + change.max(0.0)) / p;
        loss = (loss * (p - 1.0) + (-change).max(0.0)) / p;
        out[i + 1] = value(gain, loss);
    }
    Ok(real(out, Params::new().with("timeperiod", period_param(period)?)))
}

#[allow(clippy::cast_precision_loss)]
fn atr(inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
    let [high, low, close] = take_inputs::<3>(inputs, "ATR")?;
    let period = params.usize_or("timeperiod", 14)?;
    checked("ATR", validate_same_length(high, low, close, "ATR"))?;
    checked("ATR", validate_period(period))?;
    checked("ATR", validate_min_length(high, period + 1, "ATR"))?;

    let tr: Vec<f64> = (1..high.len())
        .map(|i| {
            [high[i] - low[i], (high[i] - close[i - 1]).abs(), (low[i] - close[i - 1]).abs()]
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect();

    let p = period as f64;
    let mut out = vec![f64::NAN; high.len()];
    let mut prev = mean(&tr[..period]);
    out[period] = prev;
    for i in period..tr.len() {
        prev = (prev * (p - 1.0) + tr[i]) / p;
        out[i + 1] = prev;
    }
    Ok(real(out, Params::new().with("timeperiod", period_param(period)?)))
}

#[allow(clippy::cast_precision_loss)]
fn bbands(inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
    let [close] = take_inputs::<1>(inputs, "BBANDS")?;
    let period = params.usize_or("timeperiod", 5)?;
    let up = params.f64_or("nbdevup", 2.0)?;
    let dn = params.f64_or("nbdevdn", 2.0)?;
    checked("BBANDS", validate_indicator_input(close, period, "BBANDS"))?;

    let n = close.len();
    let (mut upper, mut middle, mut lower) = (vec![f64::NAN; n], vec![f64::NAN; n], vec![f64::NAN; n]);
    for i in (period - 1)..n {
        let window = &close[i + 1 - period..=i];
        let m = mean(window);
        let sd = (window.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / period as f64).sqrt();
        upper[i] = m + up * sd;
        middle[i] = m;
        lower[i] = m - dn * sd;
    }
    Ok(IndicatorResult::from_outputs(
        vec![
            NamedSeries::new("upperband", upper),
            NamedSeries::new("middleband", middle),
            NamedSeries::new("lowerband", lower),
        ],
        Params::new()
            .with("timeperiod", period_param(period)?)
            .with("nbdevup", up)
            .with("nbdevdn", dn),
    ))
}

/// MACD. Every line, including `macd`, starts where the signal line does.
fn macd(inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
    let [close] = take_inputs::<1>(inputs, "MACD")?;
    let fast = params.usize_or("fastperiod", 12)?;
    let slow = params.usize_or("slowperiod", 26)?;
    let signal = params.usize_or("signalperiod", 9)?;
    for period in [fast, slow, signal] {
        checked("MACD", validate_period(period))?;
    }
    if fast >= slow {
        return checked(
            "MACD",
            Err(Error::InvalidPeriod {
                period: fast,
                reason: "fastperiod must be less than slowperiod",
            }),
        );
    }
    checked("MACD", validate_min_length(close, slow + signal - 1, "MACD"))?;

    let n = close.len();
    let fast_ema = ema_values(close, fast);
    let slow_ema = ema_values(close, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();

    let start = slow - 1;
    let mut sig = vec![f64::NAN; n];
    for (i, v) in ema_values(&line[start..], signal).into_iter().enumerate() {
        sig[start + i] = v;
    }

    let lookback = slow + signal - 2;
    let mut macd_out = vec![f64::NAN; n];
    let mut hist = vec![f64::NAN; n];
    for i in lookback..n {
        macd_out[i] = line[i];
        hist[i] = line[i] - sig[i];
    }

    Ok(IndicatorResult::from_outputs(
        vec![
            NamedSeries::new("macd", macd_out),
            NamedSeries::new("macdsignal", sig),
            NamedSeries::new("macdhist", hist),
        ],
        Params::new()
            .with("fastperiod", period_param(fast)?)
            .with("slowperiod", period_param(slow)?)
            .with("signalperiod", period_param(signal)?),
    ))
}

/// Every bundled reference indicator, under its upper-case name.
#[must_use]
pub fn reference_library() -> ReferenceLibrary {
    let mut lib = ReferenceLibrary::new();
    lib.register(FnReference::new("SMA", sma))
        .register(FnReference::new("EMA", ema))
        .register(FnReference::new("WMA", wma))
        .register(FnReference::new("RSI", rsi))
        .register(FnReference::new("ATR", atr))
        .register(FnReference::new("BBANDS", bbands))
        .register(FnReference::new("MACD", macd));
    lib
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(key: &str, v: i64) -> Params {
        Params::new().with(key, v)
    }

    #[test]
    fn test_library_names() {
        assert_eq!(
            reference_library().names().collect::<Vec<_>>(),
            vec!["ATR", "BBANDS", "EMA", "MACD", "RSI", "SMA", "WMA"]
        );
    }

    #[test]
    fn test_wma_known_value() {
        let data = [1.0, 2.0, 3.0];
        let out = wma(&[&data], &params("timeperiod", 3)).unwrap();
        // (1 + 4 + 9) / 6
        assert!((out.outputs()[0].values()[2] - 14.0 / 6.0).abs() < 1e-12);
        assert_eq!(out.minperiod(), 2);
    }

    #[test]
    fn test_ema_seed_is_mean() {
        let data = [2.0, 4.0, 6.0, 8.0];
        let out = ema(&[&data], &params("timeperiod", 3)).unwrap();
        let v = out.outputs()[0].values();
        assert!((v[2] - 4.0).abs() < 1e-12);
        assert!((v[3] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_extremes() {
        let up: Vec<f64> = (0..10).map(f64::from).collect();
        let out = rsi(&[&up], &params("timeperiod", 3)).unwrap();
        assert_eq!(out.outputs()[0].values()[3], 100.0);
        let flat = [1.0; 6];
        let out = rsi(&[&flat], &params("timeperiod", 3)).unwrap();
        assert_eq!(out.outputs()[0].values()[5], 50.0);
    }

    #[test]
    fn test_bbands_order_and_defaults() {
        let data: Vec<f64> = (0..10).map(|i| f64::from(i % 3)).collect();
        let out = bbands(&[&data], &Params::new()).unwrap();
        assert_eq!(out.output_names(), vec!["upperband", "middleband", "lowerband"]);
        assert_eq!(out.minperiod(), 4);
        assert_eq!(out.params().to_string(), "{nbdevdn: 2.0, nbdevup: 2.0, timeperiod: 5}");
    }

    #[test]
    fn test_macd_masks_line_until_signal() {
        let data: Vec<f64> = (0..60).map(|i| 10.0 + f64::from(i).sqrt()).collect();
        let out = macd(&[&data], &Params::new()).unwrap();
        assert_eq!(out.minperiods(), &[33, 33, 33]);
    }

    #[test]
    fn test_atr_requires_three_inputs() {
        let data = [1.0; 20];
        let err = atr(&[&data, &data], &Params::new()).unwrap_err();
        assert!(err.to_string().contains("ATR takes 3 input column(s), got 2"));
    }
}
