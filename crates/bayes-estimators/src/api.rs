//! Mode-dispatched entry points
//!
//! These functions take raw slices, validate them once and dispatch to the
//! estimator of the requested mode.

use crate::{
    AverageEstimator, AverageOptions, BirgeAverage, ConservativeAverage, Estimate,
    JeffreysAverage, Mode, StandardAverage,
};
use bayes_core::{Measurements, Result};
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Weighted average of `data` with uncertainties `sigma` using `mode`
///
/// # Errors
///
/// - [`bayes_core::Error::InputShape`] if the slices differ in length or are empty
/// - [`bayes_core::Error::InvalidInput`] for non-finite values or non-positive uncertainties
/// - [`bayes_core::Error::DegenerateInput`] for Birge with a single measurement
/// - [`bayes_core::Error::NonConcaveLikelihood`] if the marginal peak has no usable curvature
pub fn estimate(data: &[f64], sigma: &[f64], mode: Mode) -> Result<Estimate> {
    estimate_with(data, sigma, mode, &AverageOptions::default())
}

/// [`estimate`] with explicit optimizer and curvature options
#[instrument(skip(data, sigma, options), fields(n = data.len()))]
pub fn estimate_with(
    data: &[f64],
    sigma: &[f64],
    mode: Mode,
    options: &AverageOptions,
) -> Result<Estimate> {
    let measurements = Measurements::new(data, sigma)?;
    WeightedAverage::with_options(mode, *options).estimate(&measurements)
}

/// [`estimate`] with the mode given by name
///
/// Accepts `standard`, `birge`, `jeffreys` and `cons` (or `conservative`),
/// ignoring case.
///
/// # Errors
///
/// [`bayes_core::Error::InvalidMode`] for an unknown name, plus the errors of [`estimate`].
pub fn estimate_by_name(data: &[f64], sigma: &[f64], mode: &str) -> Result<Estimate> {
    estimate(data, sigma, mode.parse()?)
}

/// `(mean, uncertainty)` of the weighted average
pub fn average(data: &[f64], sigma: &[f64], mode: Mode) -> Result<(f64, f64)> {
    estimate(data, sigma, mode).map(Into::into)
}

/// Reusable estimator for a fixed mode and options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightedAverage {
    mode: Mode,
    options: AverageOptions,
}

impl WeightedAverage {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            options: AverageOptions::default(),
        }
    }

    pub fn with_options(mode: Mode, options: AverageOptions) -> Self {
        Self { mode, options }
    }

    pub fn options(&self) -> &AverageOptions {
        &self.options
    }
}

impl AverageEstimator for WeightedAverage {
    fn estimate(&self, measurements: &Measurements<'_>) -> Result<Estimate> {
        match self.mode {
            Mode::Standard => StandardAverage.estimate(measurements),
            Mode::Birge => BirgeAverage.estimate(measurements),
            Mode::Jeffreys => JeffreysAverage::with_options(self.options).estimate(measurements),
            Mode::Conservative => {
                ConservativeAverage::with_options(self.options).estimate(measurements)
            }
        }
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn is_robust(&self) -> bool {
        self.mode.is_marginal()
    }

    fn min_measurements(&self) -> usize {
        match self.mode {
            Mode::Birge => BirgeAverage.min_measurements(),
            _ => 1,
        }
    }
}

/// Every mode's estimate for the same measurements, in [`Mode::ALL`] order
///
/// A mode that cannot handle the data (Birge with one measurement) reports
/// its error without affecting the others.
pub fn compare_modes(
    measurements: &Measurements<'_>,
    options: &AverageOptions,
) -> Vec<(Mode, Result<Estimate>)> {
    let run = |&mode: &Mode| {
        let result = WeightedAverage::with_options(mode, *options).estimate(measurements);
        (mode, result)
    };

    #[cfg(feature = "parallel")]
    {
        Mode::ALL[..].par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        Mode::ALL.iter().map(run).collect()
    }
}
