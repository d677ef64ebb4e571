//! Jeffreys' weighted average
//!
//! Each reported `sigma_i` is treated as a lower bound on the true
//! uncertainty `sigma'`. Marginalizing a normal likelihood over
//! `sigma' in [sigma_i, inf)` with the non-informative prior `1/sigma'`
//! leaves, per measurement,
//!
//! ```text
//! L_i(mu) = erf((x_i - mu) / (sqrt(2) sigma_i)) / (x_i - mu)
//! ```
//!
//! which decays only like `1/|x_i - mu|`, so a distant outlier tilts the
//! total likelihood far less than a Gaussian term would. The product is not
//! a normalizable density in `mu`; only its maximum and the curvature there
//! are used.

use crate::marginal::{fit_pointwise, MarginalFit};
use crate::{AverageEstimator, AverageOptions, Estimate, Mode};
use bayes_core::{ErfRatioKernel, Measurements, PointwiseLikelihood, Result};

/// Log-likelihood of the Jeffreys marginal
pub type JeffreysLikelihood<'a> = PointwiseLikelihood<'a, ErfRatioKernel>;

/// Build the Jeffreys log-likelihood of `measurements`
pub fn jeffreys_likelihood(measurements: Measurements<'_>) -> JeffreysLikelihood<'_> {
    PointwiseLikelihood::new(measurements, ErfRatioKernel)
}

/// Jeffreys' weighted average estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct JeffreysAverage {
    options: AverageOptions,
}

impl JeffreysAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AverageOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AverageOptions {
        &self.options
    }

    /// Full fit details, including the maximized log-likelihood
    pub fn fit(&self, measurements: &Measurements<'_>) -> Result<MarginalFit> {
        fit_pointwise(measurements, ErfRatioKernel, &self.options)
    }
}

impl AverageEstimator for JeffreysAverage {
    fn estimate(&self, measurements: &Measurements<'_>) -> Result<Estimate> {
        let fit = self.fit(measurements)?;
        Ok(Estimate::new(Mode::Jeffreys, fit.mean, fit.uncertainty))
    }

    fn mode(&self) -> Mode {
        Mode::Jeffreys
    }

    fn is_robust(&self) -> bool {
        true
    }
}
