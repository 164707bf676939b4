//! Property-based tests for the transforms.
//!
//! Covers: output shape and padding, shift/scale behaviour of volatility,
//! weight termination, the identity order, and worker-count independence.

use proptest::prelude::*;
use quant_engine_core::{
    calculate_volatility, fractional_diff, get_weights_ffd, Engine, EngineError, FracDiffParams,
};

fn series(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e3f64..1.0e3, 0..max_len)
}

fn same_bits(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

// ── Rolling volatility ───────────────────────────────────────────────

proptest! {
    /// Full-length output with a zero prefix, or empty when too short.
    #[test]
    fn volatility_shape(s in series(200), window in 1usize..40) {
        let out = calculate_volatility(&s, window).unwrap();
        if s.len() < window {
            prop_assert!(out.is_empty());
        } else {
            prop_assert_eq!(out.len(), s.len());
            prop_assert!(out[..window - 1].iter().all(|v| *v == 0.0));
            prop_assert!(out.iter().all(|v| *v >= 0.0 && v.is_finite()));
        }
    }

    /// Window of one is zero everywhere.
    #[test]
    fn volatility_window_one(s in series(100)) {
        let out = calculate_volatility(&s, 1).unwrap();
        prop_assert_eq!(out, vec![0.0; s.len()]);
    }

    /// Adding a constant leaves volatility unchanged.
    #[test]
    fn volatility_shift_invariant(s in series(120), window in 2usize..20, shift in -500.0f64..500.0) {
        let shifted: Vec<f64> = s.iter().map(|x| x + shift).collect();
        let a = calculate_volatility(&s, window).unwrap();
        let b = calculate_volatility(&shifted, window).unwrap();
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert!((x - y).abs() <= 1e-9 * (1.0 + x.abs()) + 1e-7, "{} vs {}", x, y);
        }
    }

    /// Scaling the series scales volatility by |c|.
    #[test]
    fn volatility_scales_linearly(s in series(120), window in 2usize..20, c in -20.0f64..20.0) {
        let scaled: Vec<f64> = s.iter().map(|x| x * c).collect();
        let a = calculate_volatility(&s, window).unwrap();
        let b = calculate_volatility(&scaled, window).unwrap();
        for (x, y) in a.iter().zip(&b) {
            let expected = x * c.abs();
            prop_assert!((expected - y).abs() <= 1e-9 * (1.0 + expected.abs()), "{} vs {}", expected, y);
        }
    }
}

// ── Fractional differencing ──────────────────────────────────────────

proptest! {
    /// Positive orders converge and end in 1.0.
    #[test]
    fn weights_terminate(d in 0.0f64..2.0, exp in 1i32..7) {
        let w = get_weights_ffd(d, 10f64.powi(-exp)).unwrap();
        prop_assert_eq!(*w.last().unwrap(), 1.0);
        prop_assert!(!w.is_empty());
    }

    /// Order zero returns the input with no undefined prefix.
    #[test]
    fn zero_order_identity(s in series(150), exp in 1i32..9) {
        let out = fractional_diff(&s, 0.0, 10f64.powi(-exp)).unwrap();
        prop_assert_eq!(out, s);
    }

    /// NaN exactly on the first width-1 slots, finite after.
    #[test]
    fn frac_diff_shape(s in series(300), d in 0.05f64..1.0) {
        let thres = 1e-2;
        let width = get_weights_ffd(d, thres).unwrap().len();
        let out = fractional_diff(&s, d, thres).unwrap();
        prop_assert_eq!(out.len(), s.len());
        let undefined = (width - 1).min(s.len());
        prop_assert!(out[..undefined].iter().all(|v| v.is_nan()));
        prop_assert!(out[undefined..].iter().all(|v| v.is_finite()));
    }

    /// Non-positive thresholds are rejected before any work.
    #[test]
    fn frac_diff_rejects_threshold(s in series(20), thres in -1.0f64..=0.0) {
        let res = fractional_diff(&s, 0.4, thres);
        let rejected = matches!(res, Err(EngineError::InvalidParameter { name: "threshold", .. }));
        prop_assert!(rejected);
    }
}

// ── Worker-count independence ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn results_independent_of_workers(s in series(600), window in 1usize..50, workers in 2usize..12) {
        let single = Engine::with_workers(1).unwrap();
        let many = Engine::with_workers(workers).unwrap();

        let a = single.rolling_volatility(&s, window).unwrap();
        let b = many.rolling_volatility(&s, window).unwrap();
        prop_assert!(same_bits(&a, &b));

        let params = FracDiffParams::new(0.35, 1e-3);
        let a = single.fractional_diff(&s, &params).unwrap();
        let b = many.fractional_diff(&s, &params).unwrap();
        prop_assert!(same_bits(&a, &b));
    }
}

// ── Fixed scenarios ──────────────────────────────────────────────────

#[test]
fn ramp_of_five_window_three() {
    let out = calculate_volatility(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
    let expected = [0.0, 0.0, 0.8165, 0.8165, 0.8165];
    for (v, e) in out.iter().zip(expected) {
        assert!((v - e).abs() < 1e-4);
    }
}

#[test]
fn two_values_window_five_is_empty() {
    assert!(calculate_volatility(&[1.0, 2.0], 5).unwrap().is_empty());
}

#[test]
fn zero_window_is_invalid() {
    assert!(matches!(
        calculate_volatility(&[1.0, 2.0, 3.0], 0),
        Err(EngineError::InvalidParameter { name: "window", .. })
    ));
}

#[test]
fn explosive_order_fails_distinctly() {
    let engine = Engine::default();
    let params = FracDiffParams::new(-1.5, 1e-3).with_max_terms(10_000);
    assert!(matches!(
        engine.fractional_diff(&[1.0; 16], &params),
        Err(EngineError::NonConvergentWeights { .. })
    ));
}
