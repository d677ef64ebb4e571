//! Conservative weighted average (Sivia's modified Jeffreys prior)
//!
//! With the prior `sigma_i / sigma'^2` on `[sigma_i, inf)` the marginal of
//! each measurement is
//!
//! ```text
//! L_i(mu) = sigma_i / sqrt(2 pi) (1 - exp(-(x_i - mu)^2 / (2 sigma_i^2))) / (x_i - mu)^2
//! ```
//!
//! a proper density in `mu` with `1/d^2` tails. The constant factor does not
//! move the optimum, so estimation drops it; [`normalized_conservative_likelihood`]
//! keeps it for evaluating the density itself.

use crate::marginal::{fit_pointwise, MarginalFit};
use crate::{AverageEstimator, AverageOptions, Estimate, Mode};
use bayes_core::{GaussianDeficitKernel, Measurements, PointwiseLikelihood, Result};

/// Log-likelihood of the conservative marginal
pub type ConservativeLikelihood<'a> = PointwiseLikelihood<'a, GaussianDeficitKernel>;

/// Build the conservative log-likelihood of `measurements`, without constants
pub fn conservative_likelihood(measurements: Measurements<'_>) -> ConservativeLikelihood<'_> {
    PointwiseLikelihood::new(measurements, GaussianDeficitKernel::new())
}

/// Build the conservative log-likelihood including the per-measurement normalization
pub fn normalized_conservative_likelihood(
    measurements: Measurements<'_>,
) -> ConservativeLikelihood<'_> {
    PointwiseLikelihood::new(measurements, GaussianDeficitKernel::normalized())
}

/// Conservative weighted average estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeAverage {
    options: AverageOptions,
}

impl ConservativeAverage {
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
        fit_pointwise(measurements, GaussianDeficitKernel::new(), &self.options)
    }
}

impl AverageEstimator for ConservativeAverage {
    fn estimate(&self, measurements: &Measurements<'_>) -> Result<Estimate> {
        let fit = self.fit(measurements)?;
        Ok(Estimate::new(Mode::Conservative, fit.mean, fit.uncertainty))
    }

    fn mode(&self) -> Mode {
        Mode::Conservative
    }

    fn is_robust(&self) -> bool {
        true
    }
}
