//! Core traits and types for Bayesian weighted averages
//!
//! This crate provides the shared foundation of the estimator crates:
//!
//! - [`Measurements`]: validated `(x_i, sigma_i)` pairs
//! - [`Error`]: the error taxonomy shared by every crate in the workspace
//! - [`LikelihoodKernel`] and [`LogLikelihood`]: per-measurement terms and
//!   their sum as a function of the unknown mean
//! - [`math`]: numerically stable special functions with their analytic
//!   limits at zero residual
//! - [`numeric`]: curvature evaluation and the Laplace approximation
//!
//! # Example
//!
//! ```rust
//! use bayes_core::{ErfRatioKernel, LogLikelihood, Measurements, PointwiseLikelihood};
//!
//! let data = [10.0, 10.1, 9.9];
//! let sigma = [0.1, 0.1, 0.1];
//! let m = Measurements::new(&data, &sigma).unwrap();
//!
//! let ll = PointwiseLikelihood::new(m, ErfRatioKernel);
//! assert!(ll.value(10.0) > ll.value(10.5));
//! assert!(ll.curvature(10.0) < 0.0);
//! ```

pub mod error;
pub mod kernels;
pub mod math;
pub mod measurements;
pub mod numeric;
pub mod traits;

// Re-export core types
pub use error::{Error, Result};
pub use kernels::{ErfRatioKernel, GaussianDeficitKernel, GaussianKernel, LikelihoodKernel};
pub use measurements::Measurements;
pub use numeric::{central_second_difference, laplace_uncertainty, CurvatureMethod};
pub use traits::{LogLikelihood, PointwiseLikelihood};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
