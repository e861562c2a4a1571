//! Candidate versus reference agreement through the full resolution pipeline.

#![allow(clippy::cast_precision_loss)]

use ta_crosscheck_core::params::Params;
use ta_crosscheck_core::reconcile::MinperiodMode;
use ta_crosscheck_core::registry::TestSpec;
use ta_crosscheck_core::resolve::{compare, MinperiodsCheck, Overrides};
use ta_crosscheck_core::table::{PriceRow, PriceTable};
use ta_crosscheck_indicators::{candidate_library, reference_library};

/// Deterministic OHLC series: a random walk with a slow oscillation.
fn price_table(n: usize) -> PriceTable {
    let mut state: u64 = 0x2006_0001;
    let mut close = 3600.0_f64;
    let rows = (0..n)
        .map(|i| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            let noise = ((state >> 33) as f64 / f64::from(u32::MAX) - 0.5) * 40.0;
            let open = close;
            close = (open + noise + (i as f64 * 0.07).sin() * 8.0).max(1.0);
            let high = open.max(close) + noise.abs() * 0.5;
            let low = open.min(close) - noise.abs() * 0.4;
            PriceRow {
                date: format!("2006-{:03}", i + 1),
                open,
                high,
                low,
                close,
                volume: 0.0,
                openinterest: 0.0,
            }
        })
        .collect();
    PriceTable::from_rows(rows)
}

fn run(name: &str, spec: &TestSpec) -> ta_crosscheck_core::resolve::Comparison {
    let table = price_table(255);
    compare(
        name,
        spec,
        &table,
        &candidate_library(),
        &reference_library(),
        &Overrides::default(),
    )
    .unwrap()
}

// ==================== Single-Output Indicators ====================

#[test]
fn test_moving_averages_agree() {
    for name in ["sma", "ema", "wma"] {
        let c = run(name, &TestSpec::new().decimals(6));
        assert!(c.passed(), "{name}: {:?}", c.reconciliation.first_failure());
        assert_eq!(c.candidate.minperiod(), 29);
    }
}

#[test]
fn test_rsi_agrees() {
    let c = run("rsi", &TestSpec::new().decimals(6).minperiods(vec![14]));
    assert!(c.passed());
    assert_eq!(c.minperiods_check, MinperiodsCheck::Matched);
}

#[test]
fn test_atr_agrees_over_three_inputs() {
    let c = run("atr", &TestSpec::new().decimals(6));
    assert!(c.passed());
    assert_eq!(c.inputs, vec!["high", "low", "close"]);
}

#[test]
fn test_reference_params_follow_candidate_period() {
    let spec = TestSpec::new()
        .decimals(6)
        .candidate_params(Params::new().with("period", 10_i64))
        .reference_params(Params::new().with("timeperiod", 10_i64));
    let c = run("sma", &spec);
    assert!(c.passed());
    assert_eq!(c.candidate.minperiod(), 9);
}

#[test]
fn test_mismatched_periods_fail() {
    let spec = TestSpec::new()
        .decimals(6)
        .candidate_params(Params::new().with("period", 10_i64));
    assert!(!run("ema", &spec).passed());
}

// ==================== Multi-Output Indicators ====================

#[test]
fn test_bollinger_needs_swap_and_alias() {
    let base = TestSpec::new()
        .decimals(6)
        .reference_params(Params::new().with("timeperiod", 20_i64));

    let c = run("bollinger", &base.clone().swap(0, 1));
    assert_eq!(c.reference_name, "BBANDS");
    assert!(c.passed(), "{:?}", c.reconciliation.first_failure());

    assert!(!run("bollinger", &base).passed());
}

#[test]
fn test_macd_global_mode_passes() {
    let c = run("macd", &TestSpec::new().decimals(6).minperiods(vec![25, 33, 33]));
    assert!(c.passed(), "{:?}", c.reconciliation.first_failure());
    assert_eq!(c.minperiods_check, MinperiodsCheck::Matched);
    assert_eq!(c.policy.mode, MinperiodMode::Global);
}

#[test]
fn test_macd_per_output_mode_sees_masked_line() {
    let c = run("macd", &TestSpec::new().decimals(6).minperiod(MinperiodMode::PerOutput));
    assert!(!c.passed());
    let failure = c.reconciliation.first_failure().unwrap();
    assert_eq!(failure.name, "macd");
}
