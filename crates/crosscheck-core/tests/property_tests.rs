//! Property-based tests for the reconciliation pipeline using proptest.

use proptest::prelude::*;

use ta_crosscheck_core::params::Params;
use ta_crosscheck_core::reconcile::{reconcile, MinperiodMode, Policy};
use ta_crosscheck_core::series::{round_to, IndicatorResult, NamedSeries};

// ==================== Test Data Generators ====================

/// Generate a series without missing values
fn arb_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e5..1.0e5_f64, min_len..=max_len)
}

fn arb_mode() -> impl Strategy<Value = MinperiodMode> {
    prop_oneof![
        Just(MinperiodMode::Global),
        Just(MinperiodMode::PerOutput),
        Just(MinperiodMode::None),
    ]
}

fn single(name: &str, values: Vec<f64>) -> Vec<NamedSeries> {
    vec![NamedSeries::new(name, values)]
}

// ==================== Reconciliation Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Identical series without missing values pass under every mode
    #[test]
    fn prop_identical_series_pass(
        data in arb_series(0, 80),
        mode in arb_mode(),
        decimals in prop::option::of(0u32..10),
        skip in 0usize..100,
    ) {
        let mut policy = Policy::new(mode).with_minperiods(skip, vec![skip]);
        policy.decimals = decimals;
        let rec = reconcile(&single("a", data.clone()), &single("A", data), &policy);
        prop_assert!(rec.passed());
    }

    /// A pass after skipping k rows means the untrimmed series differ only in the first k rows
    #[test]
    fn prop_trim_bounds_differences(
        data in arb_series(1, 60),
        k in 0usize..70,
        noise in prop::collection::vec(1.0..10.0_f64, 60),
    ) {
        let mut other = data.clone();
        for (i, v) in other.iter_mut().enumerate().take(k) {
            *v += noise[i];
        }
        let policy = Policy::new(MinperiodMode::Global).with_minperiods(k, vec![k]);
        let rec = reconcile(&single("a", data.clone()), &single("A", other), &policy);
        prop_assert!(rec.passed());

        let equal = &rec.outputs[0].equal;
        prop_assert!(equal.iter().skip(k).all(|e| *e));
        let untrimmed = reconcile(
            &single("a", data.clone()),
            &single("A", rec.outputs[0].reference.clone()),
            &Policy::new(MinperiodMode::None),
        );
        prop_assert_eq!(untrimmed.passed(), k == 0 || data.is_empty());
    }

    /// Rounding is idempotent
    #[test]
    fn prop_rounding_idempotent(x in -1.0e6..1.0e6_f64, decimals in 0u32..9) {
        let once = round_to(x, decimals);
        prop_assert_eq!(round_to(once, decimals), once);
    }

    /// Rounding already-rounded inputs yields the same verdict
    #[test]
    fn prop_double_rounding_same_verdict(
        a in arb_series(1, 40),
        jitter in prop::collection::vec(-1.0e-4..1.0e-4_f64, 40),
        decimals in 0u32..8,
        mode in arb_mode(),
    ) {
        let b: Vec<f64> = a.iter().zip(&jitter).map(|(x, j)| x + j).collect();
        let policy = Policy::new(mode).with_decimals(decimals);

        let raw = reconcile(&single("a", a.clone()), &single("A", b.clone()), &policy);
        let a2: Vec<f64> = a.iter().map(|x| round_to(*x, decimals)).collect();
        let b2: Vec<f64> = b.iter().map(|x| round_to(*x, decimals)).collect();
        let again = reconcile(&single("a", a2), &single("A", b2), &policy);
        prop_assert_eq!(raw.passed(), again.passed());
    }

    /// Swapping a pair of outputs twice is a no-op
    #[test]
    fn prop_swap_roundtrip(
        outputs in prop::collection::vec(arb_series(5, 5), 1..5),
        a in 0usize..5,
        b in 0usize..5,
    ) {
        let n = outputs.len();
        let (a, b) = (a % n, b % n);
        let series: Vec<NamedSeries> = outputs
            .into_iter()
            .enumerate()
            .map(|(i, v)| NamedSeries::new(format!("o{i}"), v))
            .collect();
        let minperiods: Vec<usize> = (0..n).collect();
        let original = IndicatorResult::new(series, n, minperiods, Params::new());

        let mut swapped = original.clone();
        swapped.swap_outputs(a, b).unwrap();
        swapped.swap_outputs(a, b).unwrap();
        prop_assert_eq!(swapped, original);
    }
}

// ==================== Missing-Value Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Leading missing runs of equal length on both sides pass without trimming
    #[test]
    fn prop_matching_missing_prefix_passes(data in arb_series(0, 40), lead in 0usize..10) {
        let mut a = vec![f64::NAN; lead];
        a.extend(&data);
        let mut b = vec![f64::from_bits(0x7ff8_dead_beef_0001); lead];
        b.extend(&data);
        let rec = reconcile(&single("a", a), &single("A", b), &Policy::new(MinperiodMode::None));
        prop_assert!(rec.passed());
    }

    /// Zeros where the other side is missing always fail without trimming
    #[test]
    fn prop_zero_vs_missing_fails(data in arb_series(0, 40), lead in 1usize..10) {
        let mut a = vec![f64::NAN; lead];
        a.extend(&data);
        let mut b = vec![0.0; lead];
        b.extend(&data);
        let rec = reconcile(&single("a", a), &single("A", b), &Policy::new(MinperiodMode::None));
        prop_assert!(!rec.passed());
    }
}
