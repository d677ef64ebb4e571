//! Property tests for the weighted average estimators
//!
//! Two generators: a tight cluster (values in 9..11, uncertainties in 1..2)
//! whose likelihoods are unimodal, so located maxima can be compared across
//! runs; and points scattered over 0..100 with uncertainties spanning three
//! decades, whose marginal likelihoods carry many narrow peaks.

use approx::assert_relative_eq;
use bayesian_average::bayes_estimators::{conservative_likelihood, jeffreys_likelihood};
use bayesian_average::prelude::*;
use proptest::prelude::*;
use proptest::strategy::Strategy;

/// Samples in the dense scan of a likelihood's search interval
const SCAN_POINTS: usize = 2000;

fn measurements() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((9.0f64..11.0, 1.0f64..2.0), 2..8)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

fn scattered() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.0f64..100.0, -3.0f64..0.5), 3..12).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(x, exponent)| (x, 10f64.powf(exponent)))
            .unzip()
    })
}

/// Largest log-likelihood over the data points and a dense scan between them
fn best_sampled<L: LogLikelihood + ?Sized>(likelihood: &L, data: &[f64]) -> f64 {
    let (lo, hi) = likelihood.search_interval();
    let scan = (0..=SCAN_POINTS).map(|i| lo + (hi - lo) * i as f64 / SCAN_POINTS as f64);
    data.iter()
        .copied()
        .chain(scan)
        .map(|mu| likelihood.value(mu))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Differences tolerated between runs that only differ in rounding
fn close(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= 1e-6 * scale
}

proptest! {
    #[test]
    fn prop_birge_never_below_standard((data, sigma) in measurements()) {
        let standard = estimate(&data, &sigma, Mode::Standard).unwrap();
        let birge = estimate(&data, &sigma, Mode::Birge).unwrap();
        prop_assert_eq!(birge.mean, standard.mean);
        prop_assert!(birge.uncertainty >= standard.uncertainty);
    }

    #[test]
    fn prop_permutation_invariance((data, sigma) in measurements(), shift in 1usize..8) {
        let n = data.len();
        let rotated_data: Vec<f64> = (0..n).map(|i| data[(i + shift) % n]).collect();
        let rotated_sigma: Vec<f64> = (0..n).map(|i| sigma[(i + shift) % n]).collect();
        let mut reversed_data = data.clone();
        let mut reversed_sigma = sigma.clone();
        reversed_data.reverse();
        reversed_sigma.reverse();

        for mode in Mode::ALL {
            let base = estimate(&data, &sigma, mode).unwrap();
            for (d, s) in [(&rotated_data, &rotated_sigma), (&reversed_data, &reversed_sigma)] {
                let other = estimate(d, s, mode).unwrap();
                prop_assert!(close(base.mean, other.mean, 1.0), "{}: {} vs {}", mode, base.mean, other.mean);
                prop_assert!(
                    close(base.uncertainty, other.uncertainty, base.uncertainty),
                    "{}: {} vs {}", mode, base.uncertainty, other.uncertainty
                );
            }
        }
    }

    #[test]
    fn prop_scale_invariance((data, sigma) in measurements(), c in 0.01f64..100.0) {
        let scaled_data: Vec<f64> = data.iter().map(|x| c * x).collect();
        let scaled_sigma: Vec<f64> = sigma.iter().map(|s| c * s).collect();
        for mode in Mode::ALL {
            let base = estimate(&data, &sigma, mode).unwrap();
            let scaled = estimate(&scaled_data, &scaled_sigma, mode).unwrap();
            prop_assert!(close(scaled.mean, c * base.mean, c), "{}: {} vs {}", mode, scaled.mean, c * base.mean);
            prop_assert!(
                close(scaled.uncertainty, c * base.uncertainty, c * base.uncertainty),
                "{}: {} vs {}", mode, scaled.uncertainty, c * base.uncertainty
            );
        }
    }

    #[test]
    fn prop_single_measurement(x in -1e6f64..1e6, s in 1e-3f64..1e3) {
        let expected = [
            (Mode::Standard, s),
            (Mode::Jeffreys, 3f64.sqrt() * s),
            (Mode::Conservative, 2f64.sqrt() * s),
        ];
        for (mode, width) in expected {
            let e = estimate(&[x], &[s], mode).unwrap();
            prop_assert_eq!(e.mean, x);
            prop_assert!((e.uncertainty - width).abs() <= 1e-12 * width);
        }
        let birge = estimate(&[x], &[s], Mode::Birge);
        prop_assert!(
            matches!(birge, Err(Error::DegenerateInput { expected: 2, actual: 1 })),
            "unexpected Birge result: {:?}",
            birge
        );
    }

    #[test]
    fn prop_marginal_mean_is_global_maximum((data, sigma) in scattered()) {
        let m = Measurements::new(&data, &sigma).unwrap();
        let jeffreys = jeffreys_likelihood(m);
        let conservative = conservative_likelihood(m);
        let likelihoods: [(Mode, &dyn LogLikelihood); 2] =
            [(Mode::Jeffreys, &jeffreys), (Mode::Conservative, &conservative)];
        for (mode, likelihood) in likelihoods {
            let result = estimate(&data, &sigma, mode);
            prop_assert!(result.is_ok(), "{}: {:?}", mode, result);
            let e = result.unwrap();
            let found = likelihood.value(e.mean);
            let best = best_sampled(likelihood, &data);
            prop_assert!(
                found >= best - 1e-9 * (1.0 + best.abs()),
                "{}: ll({}) = {} below sampled maximum {}", mode, e.mean, found, best
            );
            prop_assert!(e.uncertainty > 0.0 && e.uncertainty.is_finite());
        }
    }

    #[test]
    fn prop_marginal_mean_within_data_range((data, sigma) in measurements()) {
        let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for mode in [Mode::Jeffreys, Mode::Conservative] {
            let e = estimate(&data, &sigma, mode).unwrap();
            prop_assert!(e.mean >= lo && e.mean <= hi, "{}: {} outside [{}, {}]", mode, e.mean, lo, hi);
            prop_assert!(e.uncertainty > 0.0 && e.uncertainty.is_finite());
        }
    }
}

#[test]
fn test_closed_form_standard() {
    let e = estimate(&[1.0, 2.0], &[1.0, 1.0], Mode::Standard).unwrap();
    assert_eq!(e.mean, 1.5);
    assert_relative_eq!(e.uncertainty, 1.0 / 2f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn test_well_behaved_data_agree_with_standard() {
    let data = [10.0, 10.1, 9.9];
    let sigma = [0.1, 0.1, 0.1];
    let standard = estimate(&data, &sigma, Mode::Standard).unwrap();
    for mode in [Mode::Jeffreys, Mode::Conservative] {
        let e = estimate(&data, &sigma, mode).unwrap();
        assert!(
            (e.mean - standard.mean).abs() <= standard.uncertainty,
            "{mode}: {} vs {}",
            e.mean,
            standard.mean
        );
    }
}

#[test]
fn test_outlier_robustness() {
    let data = [10.0, 10.0, 10.0, 50.0];
    let sigma = [1.0, 1.0, 1.0, 1.0];
    let standard = estimate(&data, &sigma, Mode::Standard).unwrap();
    assert_relative_eq!(standard.mean, 20.0, epsilon = 1e-12);
    for mode in [Mode::Jeffreys, Mode::Conservative] {
        let e = estimate(&data, &sigma, mode).unwrap();
        assert!(
            (e.mean - 10.0).abs() < (standard.mean - 10.0).abs(),
            "{mode}: {}",
            e.mean
        );
        assert!((e.mean - 10.0).abs() < 0.5, "{mode}: {}", e.mean);
    }
}

#[test]
fn test_strategies_agree_on_unimodal_data() {
    let data = [4.9, 5.3, 5.0, 5.6, 4.7];
    let sigma = [0.3, 0.4, 0.2, 0.5, 0.3];
    for mode in [Mode::Jeffreys, Mode::Conservative] {
        let multi = estimate(&data, &sigma, mode).unwrap();
        let options =
            AverageOptions::default().with_optimizer(OptimizerConfig::basin_hopping(11));
        let hopping = estimate_with(&data, &sigma, mode, &options).unwrap();
        assert_relative_eq!(multi.mean, hopping.mean, epsilon = 1e-7);
        assert_relative_eq!(multi.uncertainty, hopping.uncertainty, max_relative = 1e-6);
    }
}

#[test]
fn test_finite_difference_curvature_matches_analytic() {
    let data = [4.9, 5.3, 5.0, 5.6, 4.7];
    let sigma = [0.3, 0.4, 0.2, 0.5, 0.3];
    let options = AverageOptions::default().with_curvature(CurvatureMethod::finite_difference());
    for mode in [Mode::Jeffreys, Mode::Conservative] {
        let analytic = estimate(&data, &sigma, mode).unwrap();
        let numeric = estimate_with(&data, &sigma, mode, &options).unwrap();
        assert_eq!(analytic.mean, numeric.mean);
        assert_relative_eq!(analytic.uncertainty, numeric.uncertainty, max_relative = 1e-5);
    }
}

#[test]
fn test_outlier_position_does_not_matter() {
    let sigma = [1.0, 1.0, 1.0, 1.0];
    let arrangements = [
        [10.0, 10.0, 10.0, 50.0],
        [10.0, 10.0, 50.0, 10.0],
        [10.0, 50.0, 10.0, 10.0],
        [50.0, 10.0, 10.0, 10.0],
    ];
    for mode in Mode::ALL {
        let base = estimate(&arrangements[0], &sigma, mode).unwrap();
        for data in &arrangements[1..] {
            let e = estimate(data, &sigma, mode).unwrap();
            assert_relative_eq!(e.mean, base.mean, epsilon = 1e-7);
            assert_relative_eq!(e.uncertainty, base.uncertainty, max_relative = 1e-6);
        }
    }
}

#[test]
fn test_sharp_isolated_points_with_close_pair() {
    // Peaks of width 1e-3 spread over about 94 units: every one falls between
    // grid nodes. The pair at 61 outweighs each single point.
    let data = [3.0, 12.5, 27.0, 38.2, 45.9, 61.0, 61.0005, 74.4, 83.1, 96.7];
    let sigma = [1e-3; 10];
    let m = Measurements::new(&data, &sigma).unwrap();
    let jeffreys = jeffreys_likelihood(m);
    let conservative = conservative_likelihood(m);
    let likelihoods: [(Mode, &dyn LogLikelihood); 2] =
        [(Mode::Jeffreys, &jeffreys), (Mode::Conservative, &conservative)];
    for (mode, likelihood) in likelihoods {
        let e = estimate(&data, &sigma, mode).unwrap();
        assert!(e.mean >= 61.0 && e.mean <= 61.0005, "{mode}: {}", e.mean);
        let at_points = data
            .iter()
            .map(|&x| likelihood.value(x))
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(likelihood.value(e.mean) >= at_points, "{mode}");
        assert!(e.uncertainty > 0.0 && e.uncertainty < 2e-3, "{mode}: {}", e.uncertainty);
    }
}
