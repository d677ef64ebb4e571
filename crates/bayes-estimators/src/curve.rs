//! Sampled likelihood curves for plotting layers
//!
//! Curves are evaluated on `points` equally spaced values of `mu` spanning
//! `[min(x_i - sigma_i), max(x_i + sigma_i)]`. Rendering is left to the
//! caller; this module only produces the numbers.

use crate::conservative::normalized_conservative_likelihood;
use crate::jeffreys::jeffreys_likelihood;
use crate::Mode;
use bayes_core::{Error, GaussianKernel, LogLikelihood, Measurements, PointwiseLikelihood, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default number of sample points
pub const DEFAULT_POINTS: usize = 400;

/// Scale of the sampled values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveScale {
    /// `ln L(mu)`
    Log,
    /// `L(mu)`
    Linear,
}

/// How the sampled values were normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Raw values
    None,
    /// Shifted to be non-negative and scaled so the curve integrates to one
    Density,
    /// Shifted so the maximum is zero; used when a density is not representable
    PeakShifted,
}

/// Options for [`likelihood_curve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveOptions {
    /// Number of sample points (at least two)
    pub points: usize,
    /// Exponentiate the log-likelihood
    pub linear: bool,
    /// Normalize the sampled values
    pub normalize: bool,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            linear: false,
            normalize: false,
        }
    }
}

impl CurveOptions {
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    pub fn linear(mut self, linear: bool) -> Self {
        self.linear = linear;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(Error::InvalidParameter(format!(
                "a likelihood curve needs at least 2 points, got {}",
                self.points
            )));
        }
        Ok(())
    }
}

/// A likelihood sampled on a uniform grid of means
#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodCurve {
    pub mode: Mode,
    /// Sample locations, ascending and equally spaced
    pub mu: Vec<f64>,
    /// Sampled values, on `scale` and after `normalization`
    pub values: Vec<f64>,
    pub scale: CurveScale,
    pub normalization: Normalization,
}

impl LikelihoodCurve {
    /// Grid spacing, `None` for a curve of fewer than two samples
    pub fn step(&self) -> Option<f64> {
        match self.mu.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }

    /// Sample with the largest value, ignoring NaN
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.mu
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| !v.is_nan())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&mu, &v)| (mu, v))
    }

    pub fn len(&self) -> usize {
        self.mu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mu.is_empty()
    }
}

/// Fallbacks that, once taken, stay in effect for the remaining curves of a batch
#[derive(Debug, Clone, Copy, Default)]
struct Degradation {
    log_scale: bool,
    peak_shift: bool,
}

/// Sample the likelihood of `mode` over the measurement envelope
///
/// Standard and Birge share the Gaussian likelihood; conservative carries its
/// normalization constant so the raw curve is a proper density per point.
pub fn likelihood_curve(
    measurements: &Measurements<'_>,
    mode: Mode,
    options: &CurveOptions,
) -> Result<LikelihoodCurve> {
    options.validate()?;
    Ok(sample(measurements, mode, options, &mut Degradation::default()))
}

/// Sample several curves over the same grid
///
/// If one curve has to fall back to the log scale or to a peak shift, every
/// later curve of the batch does too, so the curves stay comparable.
pub fn likelihood_curves(
    measurements: &Measurements<'_>,
    modes: &[Mode],
    options: &CurveOptions,
) -> Result<Vec<LikelihoodCurve>> {
    options.validate()?;
    let mut degradation = Degradation::default();
    Ok(modes
        .iter()
        .map(|&mode| sample(measurements, mode, options, &mut degradation))
        .collect())
}

/// `points` equally spaced values over `[lo, hi]`, endpoints included
fn grid(lo: f64, hi: f64, points: usize) -> Vec<f64> {
    let step = (hi - lo) / (points - 1) as f64;
    (0..points)
        .map(|i| if i + 1 == points { hi } else { lo + i as f64 * step })
        .collect()
}

fn log_values(measurements: &Measurements<'_>, mode: Mode, mu: &[f64]) -> Vec<f64> {
    fn eval<L: LogLikelihood>(likelihood: &L, mu: &[f64]) -> Vec<f64> {
        mu.iter().map(|&m| likelihood.value(m)).collect()
    }

    match mode {
        Mode::Standard | Mode::Birge => {
            eval(&PointwiseLikelihood::new(*measurements, GaussianKernel), mu)
        }
        Mode::Jeffreys => eval(&jeffreys_likelihood(*measurements), mu),
        Mode::Conservative => eval(&normalized_conservative_likelihood(*measurements), mu),
    }
}

fn sample(
    measurements: &Measurements<'_>,
    mode: Mode,
    options: &CurveOptions,
    degradation: &mut Degradation,
) -> LikelihoodCurve {
    let (lo, hi) = measurements.envelope();
    let mu = grid(lo, hi, options.points);
    let log = log_values(measurements, mode, &mu);

    let mut scale = CurveScale::Log;
    let mut values = log;
    if options.linear && !degradation.log_scale {
        let linear: Vec<f64> = values.iter().map(|v| v.exp()).collect();
        if linear.iter().all(|&v| v == 0.0) {
            warn!(%mode, "likelihood underflows on the linear scale, keeping log scale");
            degradation.log_scale = true;
        } else {
            values = linear;
            scale = CurveScale::Linear;
        }
    }

    let normalization = if options.normalize {
        normalize(&mut values, mu[1] - mu[0], mode, degradation)
    } else {
        Normalization::None
    };

    debug!(%mode, points = mu.len(), ?scale, ?normalization, "sampled likelihood curve");
    LikelihoodCurve {
        mode,
        mu,
        values,
        scale,
        normalization,
    }
}

fn normalize(
    values: &mut [f64],
    step: f64,
    mode: Mode,
    degradation: &mut Degradation,
) -> Normalization {
    if !degradation.peak_shift && values.iter().all(|v| v.is_finite()) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let area: f64 = values.iter().map(|v| v - min).sum::<f64>() * step;
        if area > 0.0 && area.is_finite() {
            values.iter_mut().for_each(|v| *v = (*v - min) / area);
            return Normalization::Density;
        }
    }

    if !degradation.peak_shift {
        warn!(%mode, "likelihood values too small to normalize, shifting the maximum to zero");
        degradation.peak_shift = true;
    }
    let max = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() {
        values.iter_mut().for_each(|v| *v -= max);
    }
    Normalization::PeakShifted
}
