//! Core traits for likelihood-based location estimation
//!
//! A [`LogLikelihood`] is a scalar function of the unknown mean `mu`. The
//! estimator engine only needs three things from it: its value (to locate
//! the maximum), its second derivative (to turn the peak width into an
//! uncertainty), and a window that is guaranteed to contain the maximum.
//! Optionally it names candidate peaks that a grid scan could step over.

use crate::kernels::LikelihoodKernel;
use crate::Measurements;

/// A log-likelihood in the unknown mean `mu`
pub trait LogLikelihood {
    /// Log-likelihood at `mu`
    fn value(&self, mu: f64) -> f64;

    /// Second derivative of the log-likelihood at `mu`
    fn curvature(&self, mu: f64) -> f64;

    /// Closed interval that contains the global maximum
    fn search_interval(&self) -> (f64, f64);

    /// Where a local search should start
    fn starting_point(&self) -> f64;

    /// `(location, width)` of points where narrow local maxima may sit
    ///
    /// A maximum much narrower than the search window can hide between the
    /// nodes of a grid scan. Empty by default.
    fn candidate_peaks(&self) -> Vec<(f64, f64)> {
        Vec::new()
    }

    /// Human-readable name of the likelihood
    fn name(&self) -> &str;
}

/// Sum of independent per-measurement kernel terms
///
/// Every kernel shipped with this crate is unimodal in `mu` with its peak at
/// `x_i`, so the sum is increasing below `min x_i` and decreasing above
/// `max x_i`; the global maximum therefore lies within the value range.
#[derive(Debug, Clone)]
pub struct PointwiseLikelihood<'a, K: LikelihoodKernel> {
    measurements: Measurements<'a>,
    kernel: K,
}

impl<'a, K: LikelihoodKernel> PointwiseLikelihood<'a, K> {
    /// Build the likelihood of `measurements` under `kernel`
    pub fn new(measurements: Measurements<'a>, kernel: K) -> Self {
        Self {
            measurements,
            kernel,
        }
    }

    /// The measurements this likelihood is built on
    pub fn measurements(&self) -> Measurements<'a> {
        self.measurements
    }

    /// The per-measurement kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Individual log-likelihood terms at `mu`
    pub fn terms(&self, mu: f64) -> Vec<f64> {
        self.measurements
            .iter()
            .map(|(x, s)| self.kernel.log_term(x - mu, s))
            .collect()
    }
}

impl<K: LikelihoodKernel> LogLikelihood for PointwiseLikelihood<'_, K> {
    fn value(&self, mu: f64) -> f64 {
        self.measurements
            .iter()
            .map(|(x, s)| self.kernel.log_term(x - mu, s))
            .sum()
    }

    fn curvature(&self, mu: f64) -> f64 {
        self.measurements
            .iter()
            .map(|(x, s)| self.kernel.curvature_term(x - mu, s))
            .sum()
    }

    fn search_interval(&self) -> (f64, f64) {
        self.measurements.value_range()
    }

    fn starting_point(&self) -> f64 {
        // Plain arithmetic mean, not the inverse-variance weighted one
        self.measurements.arithmetic_mean()
    }

    fn candidate_peaks(&self) -> Vec<(f64, f64)> {
        // Every term peaks at its own x_i with width sigma_i
        self.measurements.iter().collect()
    }

    fn name(&self) -> &str {
        self.kernel.name()
    }
}
