//! # Bayesian Average
//!
//! Weighted averages of measurements whose reported uncertainties may be
//! underestimated or inconsistent with each other.
//!
//! ## Crates
//!
//! - [`bayes_core`]: measurements, errors, likelihood kernels and the
//!   Laplace approximation
//! - [`bayes_optim`]: global one-dimensional minimizers (multi-start Brent
//!   and basin hopping)
//! - [`bayes_estimators`]: the four averaging modes, the mode-dispatched
//!   API and likelihood curves
//!
//! ## Quick Start
//!
//! ```rust
//! use bayesian_average::prelude::*;
//!
//! let data = [10.0, 10.1, 9.9, 13.0];
//! let sigma = [0.1, 0.1, 0.1, 0.1];
//!
//! for mode in Mode::ALL {
//!     let e = estimate(&data, &sigma, mode).unwrap();
//!     println!("{e}");
//! }
//!
//! let jeffreys = estimate_by_name(&data, &sigma, "jeffreys").unwrap();
//! assert!((jeffreys.mean - 10.0).abs() < 0.2);
//! ```

pub use bayes_core;
pub use bayes_estimators;
pub use bayes_optim;

pub use bayes_core::{Error, LogLikelihood, Measurements, Result};
pub use bayes_estimators::{
    average, compare_modes, estimate, estimate_by_name, estimate_with, likelihood_curve,
    likelihood_curves, AverageEstimator, AverageOptions, BirgeEstimate, CurveOptions, Estimate,
    LikelihoodCurve, Mode, WeightedAverage,
};
pub use bayes_optim::{OptimizerConfig, Strategy};

/// Prelude module for convenient imports
pub mod prelude {
    pub use bayes_core::{CurvatureMethod, Error, LogLikelihood, Measurements, Result};
    pub use bayes_estimators::{
        average, compare_modes, estimate, estimate_by_name, estimate_with, likelihood_curve,
        likelihood_curves, AverageEstimator, AverageOptions, CurveOptions, CurveScale, Estimate,
        LikelihoodCurve, Mode, Normalization, WeightedAverage,
    };
    pub use bayes_optim::{OptimizerConfig, Strategy};
}
