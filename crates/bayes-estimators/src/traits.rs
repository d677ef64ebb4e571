//! Core traits for weighted average estimation

use crate::{Estimate, Mode};
use bayes_core::{Measurements, Result};

/// Base trait for weighted average estimators
///
/// Estimators receive already-validated measurements; shape and value
/// checks happen once, in [`Measurements::new`].
pub trait AverageEstimator {
    /// Compute the average and its uncertainty
    fn estimate(&self, measurements: &Measurements<'_>) -> Result<Estimate>;

    /// The mode this estimator implements
    fn mode(&self) -> Mode;

    /// Human-readable name of the estimator
    fn name(&self) -> &str {
        self.mode().label()
    }

    /// Whether the estimate resists outliers and inconsistent error bars
    fn is_robust(&self) -> bool;

    /// Smallest number of measurements the estimator accepts
    fn min_measurements(&self) -> usize {
        1
    }
}
