//! Shared engine of the marginal-likelihood estimators
//!
//! Locate the global maximum of a log-likelihood by minimizing its negative,
//! then turn the curvature at that maximum into an uncertainty with the
//! Laplace approximation `sigma* = 1 / sqrt(-ll''(mu*))`.
//!
//! Every reported point is handed to the minimizer as a candidate peak, so a
//! maximum narrower than the search grid is still found.
//! [`fit_pointwise`] additionally runs the fit in units of the smallest
//! uncertainty, which keeps it finite for any representable scale.

use crate::AverageOptions;
use bayes_core::{
    laplace_uncertainty, Error, LikelihoodKernel, LogLikelihood, Measurements,
    PointwiseLikelihood, Result,
};
use bayes_optim::{Candidate, GlobalMinimizer, SearchWindow};
use std::f64::consts::LN_2;
use tracing::{debug, instrument};

/// Outcome of maximizing a marginal likelihood
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginalFit {
    /// Maximizing mean `mu*`
    pub mean: f64,
    /// `1 / sqrt(-ll''(mu*))`
    pub uncertainty: f64,
    /// `ll''(mu*)`
    pub curvature: f64,
    /// `ll(mu*)`
    pub log_likelihood: f64,
    /// Local searches spent by the global minimizer
    pub local_searches: usize,
}

/// Maximize `likelihood` and derive the Laplace uncertainty at the peak
///
/// `peak_scale` is a length typical of the peak width (the smallest reported
/// uncertainty); it only sizes finite-difference steps.
///
/// # Errors
///
/// - [`bayes_core::Error::InvalidParameter`] for an invalid configuration
/// - [`bayes_core::Error::Optimization`] if no finite optimum was found
/// - [`bayes_core::Error::NonConcaveLikelihood`] if `ll''(mu*) >= 0`
#[instrument(skip_all, fields(likelihood = likelihood.name()))]
pub fn fit_marginal<L>(
    likelihood: &L,
    peak_scale: f64,
    options: &AverageOptions,
) -> Result<MarginalFit>
where
    L: LogLikelihood + ?Sized,
{
    options.curvature.validate()?;
    let minimizer = options.optimizer.build()?;

    let (lower, upper) = likelihood.search_interval();
    let window = SearchWindow::new(lower, upper, likelihood.starting_point())?;
    let candidates: Vec<Candidate> = likelihood
        .candidate_peaks()
        .into_iter()
        .map(|(location, width)| Candidate::new(location, width))
        .collect();
    let negative = |mu: f64| -likelihood.value(mu);
    let minimum = minimizer.minimize_from(&negative, &window, &candidates)?;

    let mean = minimum.location;
    let curvature = options.curvature.evaluate(likelihood, mean, peak_scale)?;
    let uncertainty = laplace_uncertainty(mean, curvature)?;

    debug!(
        mean,
        uncertainty,
        curvature,
        strategy = minimizer.name(),
        local_searches = minimum.local_searches,
        "located likelihood maximum"
    );
    Ok(MarginalFit {
        mean,
        uncertainty,
        curvature,
        log_likelihood: -minimum.value,
        local_searches: minimum.local_searches,
    })
}

/// Fit the sum of `kernel` terms over `measurements` in rescaled units
///
/// Values and uncertainties are divided by the largest power of two not
/// above the smallest uncertainty, which is exact, then the fit is mapped
/// back. Falls back to the unscaled fit when the rescaled values overflow.
pub fn fit_pointwise<K>(
    measurements: &Measurements<'_>,
    kernel: K,
    options: &AverageOptions,
) -> Result<MarginalFit>
where
    K: LikelihoodKernel,
{
    let exponent = measurements.min_sigma().log2().floor();
    let scale = exponent.exp2();
    let data: Vec<f64> = measurements.data().iter().map(|x| x / scale).collect();
    let sigma: Vec<f64> = measurements.sigma().iter().map(|s| s / scale).collect();

    let units = match Measurements::new(&data, &sigma) {
        Ok(units) => units,
        Err(err) => {
            debug!(scale, %err, "rescaling failed, fitting in original units");
            let likelihood = PointwiseLikelihood::new(*measurements, kernel);
            return fit_marginal(&likelihood, measurements.min_sigma(), options);
        }
    };
    // log_term(c d, c s) = log_term(d, s) - k ln(c), summed over n terms
    let shift = kernel.scaling_degree() * measurements.len() as f64 * exponent * LN_2;
    let likelihood = PointwiseLikelihood::new(units, kernel);
    let fit = fit_marginal(&likelihood, units.min_sigma(), options).map_err(|err| match err {
        Error::NonConcaveLikelihood {
            location,
            curvature,
        } => Error::NonConcaveLikelihood {
            location: location * scale,
            curvature: curvature / scale / scale,
        },
        other => other,
    })?;
    Ok(MarginalFit {
        mean: fit.mean * scale,
        uncertainty: fit.uncertainty * scale,
        curvature: fit.curvature / scale / scale,
        log_likelihood: fit.log_likelihood - shift,
        local_searches: fit.local_searches,
    })
}
