//! Error types for Bayesian weighted averages
//!
//! Provides a unified error type for all bayesian-average crates.

use thiserror::Error;

/// Core error type for weighted average computations
#[derive(Error, Debug)]
pub enum Error {
    /// Values and uncertainties have different lengths, or are empty
    #[error("Input shape error: got {data} values and {sigma} uncertainties")]
    InputShape { data: usize, sigma: usize },

    /// Unrecognized averaging mode name
    #[error("Invalid mode: '{0}' (expected one of standard, birge, jeffreys, cons)")]
    InvalidMode(String),

    /// The log-likelihood is not concave at the located optimum
    #[error("Non-concave likelihood at mu = {location}: second derivative is {curvature}")]
    NonConcaveLikelihood { location: f64, curvature: f64 },

    /// Too few measurements for the requested estimator
    #[error("Degenerate input: expected at least {expected} measurements, got {actual}")]
    DegenerateInput { expected: usize, actual: usize },

    /// Invalid input values
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The minimizer did not produce a usable optimum
    #[error("Optimization error: {0}")]
    Optimization(String),

    /// Other errors (including those raised inside argmin solvers)
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for mismatched or empty value/uncertainty arrays
    pub fn shape_mismatch(data: usize, sigma: usize) -> Self {
        Self::InputShape { data, sigma }
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for an uncertainty that is not strictly positive
    pub fn non_positive_sigma(index: usize, value: f64) -> Self {
        Self::InvalidInput(format!(
            "uncertainty at index {index} must be strictly positive, got {value}"
        ))
    }

    /// Whether this error reports a problem with the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputShape { .. }
                | Self::InvalidMode(_)
                | Self::DegenerateInput { .. }
                | Self::InvalidInput(_)
        )
    }
}
