//! Types for estimate representation and estimator options

use crate::Mode;
use bayes_core::CurvatureMethod;
use bayes_optim::OptimizerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A weighted average with its uncertainty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Which estimator produced this value
    pub mode: Mode,
    /// Point estimate of the mean
    pub mean: f64,
    /// Standard uncertainty of the mean (never negative)
    pub uncertainty: f64,
}

impl Estimate {
    pub fn new(mode: Mode, mean: f64, uncertainty: f64) -> Self {
        Self {
            mode,
            mean,
            uncertainty,
        }
    }

    /// `(mean - uncertainty, mean + uncertainty)`
    pub fn interval(&self) -> (f64, f64) {
        (self.mean - self.uncertainty, self.mean + self.uncertainty)
    }

    /// Whether `value` lies within one uncertainty of the mean
    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = self.interval();
        (lo..=hi).contains(&value)
    }

    /// `(mean, uncertainty)`
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.mean, self.uncertainty)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} weighted average: {} +- {}",
            self.mode.label(),
            self.mean,
            self.uncertainty
        )
    }
}

impl From<Estimate> for (f64, f64) {
    fn from(estimate: Estimate) -> Self {
        estimate.as_tuple()
    }
}

/// Birge-corrected estimate together with the ratio that was applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirgeEstimate {
    pub estimate: Estimate,
    /// `sqrt(chi^2 / (n - 1))` of the data around the weighted mean
    pub ratio: f64,
}

impl BirgeEstimate {
    /// Whether the uncertainty was inflated (ratio above one)
    pub fn is_inflated(&self) -> bool {
        self.ratio > 1.0
    }
}

/// Options shared by the marginal estimators
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AverageOptions {
    /// How the maximum of the likelihood is located
    pub optimizer: OptimizerConfig,
    /// How the curvature at the maximum is obtained
    pub curvature: CurvatureMethod,
}

impl AverageOptions {
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_curvature(mut self, curvature: CurvatureMethod) -> Self {
        self.curvature = curvature;
        self
    }
}
