//! Inverse-variance weighted average, with optional Birge correction
//!
//! With weights `w_i = 1 / sigma_i^2` the mean is `sum(w_i x_i) / sum(w_i)`
//! and its uncertainty `1 / sqrt(sum(w_i))`. That uncertainty ignores how
//! far the data scatter around the mean; the Birge ratio
//! `R = sqrt(chi^2 / (n - 1))` measures that scatter and, when `R > 1`,
//! scales the uncertainty up. It never scales it down.

use crate::{AverageEstimator, BirgeEstimate, Estimate, Mode};
use bayes_core::{Error, Measurements, Result};
use tracing::debug;

/// `(weighted mean, uncertainty)`
///
/// Weights are taken relative to the smallest uncertainty, `(s_min / s_i)^2`,
/// so they stay in `(0, 1]` whatever the scale of `sigma`. The mean is
/// accumulated relative to the first value, which keeps a single measurement
/// exact and avoids cancellation for large offsets.
fn weighted_mean(m: &Measurements<'_>) -> (f64, f64) {
    let origin = m.data()[0];
    let s_min = m.min_sigma();
    let (shift, total) = m.iter().fold((0.0, 0.0), |(num, den), (x, s)| {
        let w = (s_min / s).powi(2);
        (num + w * (x - origin), den + w)
    });
    (origin + shift / total, s_min / total.sqrt())
}

/// Standard inverse-variance weighted average
pub fn standard_average(m: &Measurements<'_>) -> Estimate {
    let (mean, uncertainty) = weighted_mean(m);
    Estimate::new(Mode::Standard, mean, uncertainty)
}

/// `sum((x_i - mean)^2 / sigma_i^2)` around the weighted mean
pub fn chi_square(m: &Measurements<'_>) -> f64 {
    let (mean, _) = weighted_mean(m);
    m.iter().map(|(x, s)| ((x - mean) / s).powi(2)).sum()
}

/// Birge ratio `sqrt(chi^2 / (n - 1))`
///
/// The normalized residuals are rescaled by their largest magnitude before
/// squaring, so the ratio is finite whenever the residuals are.
///
/// # Errors
///
/// [`Error::DegenerateInput`] for fewer than two measurements.
pub fn birge_ratio(m: &Measurements<'_>) -> Result<f64> {
    let n = m.len();
    if n < 2 {
        return Err(Error::DegenerateInput {
            expected: 2,
            actual: n,
        });
    }
    let (mean, _) = weighted_mean(m);
    let residuals: Vec<f64> = m.iter().map(|(x, s)| (x - mean) / s).collect();
    let largest = residuals.iter().fold(0.0f64, |acc, r| acc.max(r.abs()));
    if largest == 0.0 {
        return Ok(0.0);
    }
    let sum: f64 = residuals.iter().map(|r| (r / largest).powi(2)).sum();
    Ok(largest * (sum / (n - 1) as f64).sqrt())
}

/// Weighted average with the uncertainty inflated by the Birge ratio when it exceeds one
pub fn birge_average(m: &Measurements<'_>) -> Result<BirgeEstimate> {
    let ratio = birge_ratio(m)?;
    let standard = standard_average(m);
    debug!(birge_ratio = ratio, n = m.len(), "computed Birge ratio");

    let uncertainty = if ratio > 1.0 {
        standard.uncertainty * ratio
    } else {
        standard.uncertainty
    };
    Ok(BirgeEstimate {
        estimate: Estimate::new(Mode::Birge, standard.mean, uncertainty),
        ratio,
    })
}

/// Inverse-variance weighted average estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAverage;

impl AverageEstimator for StandardAverage {
    fn estimate(&self, measurements: &Measurements<'_>) -> Result<Estimate> {
        Ok(standard_average(measurements))
    }

    fn mode(&self) -> Mode {
        Mode::Standard
    }

    fn is_robust(&self) -> bool {
        false
    }
}

/// Birge-corrected weighted average estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct BirgeAverage;

impl AverageEstimator for BirgeAverage {
    fn estimate(&self, measurements: &Measurements<'_>) -> Result<Estimate> {
        birge_average(measurements).map(|b| b.estimate)
    }

    fn mode(&self) -> Mode {
        Mode::Birge
    }

    fn is_robust(&self) -> bool {
        false
    }

    fn min_measurements(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_form() {
        let data = [1.0, 2.0];
        let sigma = [1.0, 1.0];
        let m = Measurements::new(&data, &sigma).unwrap();
        let e = standard_average(&m);
        assert_eq!(e.mean, 1.5);
        assert_relative_eq!(e.uncertainty, std::f64::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn test_weights_favor_precise_points() {
        let data = [0.0, 10.0];
        let sigma = [1.0, 3.0];
        let m = Measurements::new(&data, &sigma).unwrap();
        let e = standard_average(&m);
        // w = [1, 1/9] -> mean = (10/9) / (10/9) * 1 = 1
        assert_relative_eq!(e.mean, 1.0, epsilon = 1e-12);
        assert_relative_eq!(e.uncertainty, (0.9f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_single_measurement_is_exact() {
        let data = [0.1 + 0.2];
        let sigma = [0.3];
        let m = Measurements::new(&data, &sigma).unwrap();
        let e = standard_average(&m);
        assert_eq!(e.mean, data[0]);
        assert_relative_eq!(e.uncertainty, 0.3);
    }

    #[test]
    fn test_birge_inflates_overdispersed_data() {
        // chi2 = 2 * (5/1)^2 = 50, R = sqrt(50) about 7.07
        let data = [-5.0, 5.0];
        let sigma = [1.0, 1.0];
        let m = Measurements::new(&data, &sigma).unwrap();
        let b = birge_average(&m).unwrap();
        assert_relative_eq!(b.ratio, 50f64.sqrt(), epsilon = 1e-12);
        assert!(b.is_inflated());
        assert_relative_eq!(
            b.estimate.uncertainty,
            std::f64::consts::FRAC_1_SQRT_2 * 50f64.sqrt(),
            epsilon = 1e-12
        );
        assert_eq!(b.estimate.mode, Mode::Birge);
    }

    #[test]
    fn test_birge_never_shrinks() {
        let data = [1.0, 1.01, 0.99];
        let sigma = [1.0, 1.0, 1.0];
        let m = Measurements::new(&data, &sigma).unwrap();
        let b = birge_average(&m).unwrap();
        let s = standard_average(&m);
        assert!(b.ratio < 1.0);
        assert_eq!(b.estimate.uncertainty, s.uncertainty);
        assert_eq!(b.estimate.mean, s.mean);
    }

    #[test]
    fn test_birge_single_measurement() {
        let data = [4.0];
        let sigma = [1.0];
        let m = Measurements::new(&data, &sigma).unwrap();
        assert!(matches!(
            birge_average(&m),
            Err(Error::DegenerateInput { expected: 2, actual: 1 })
        ));
        assert_eq!(BirgeAverage.min_measurements(), 2);
    }

    #[test]
    fn test_chi_square() {
        let data = [0.0, 2.0, 4.0];
        let sigma = [1.0, 1.0, 2.0];
        let m = Measurements::new(&data, &sigma).unwrap();
        // w = [1, 1, 0.25], mean = 3 / 2.25 = 4/3
        let mean: f64 = 4.0 / 3.0;
        let expected = mean * mean + (2.0 - mean).powi(2) + ((4.0 - mean) / 2.0).powi(2);
        assert_relative_eq!(chi_square(&m), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_extreme_uncertainty_scales() {
        // 1/sigma^2 overflows at 1e-160 and underflows at 1e160
        let data = [1.0, 2.0];
        for c in [1e-160, 1e160] {
            let scaled_data = [c * data[0], c * data[1]];
            let sigma = [c, c];
            let m = Measurements::new(&scaled_data, &sigma).unwrap();
            let e = standard_average(&m);
            assert_relative_eq!(e.mean, 1.5 * c, max_relative = 1e-14);
            assert_relative_eq!(
                e.uncertainty,
                std::f64::consts::FRAC_1_SQRT_2 * c,
                max_relative = 1e-14
            );
            assert_relative_eq!(
                birge_ratio(&m).unwrap(),
                std::f64::consts::FRAC_1_SQRT_2,
                max_relative = 1e-14
            );
        }
    }

    #[test]
    fn test_birge_ratio_with_huge_residuals() {
        // chi^2 itself would overflow; the ratio does not
        let data = [-1e200, 1e200];
        let sigma = [1.0, 1.0];
        let m = Measurements::new(&data, &sigma).unwrap();
        assert!(chi_square(&m).is_infinite());
        assert_relative_eq!(
            birge_ratio(&m).unwrap(),
            2f64.sqrt() * 1e200,
            max_relative = 1e-14
        );
    }
}
