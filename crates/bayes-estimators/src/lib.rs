//! Weighted averages for measurements with unreliable uncertainties
//!
//! Four ways to combine `(x_i, sigma_i)` pairs into one value:
//!
//! - [`Mode::Standard`]: inverse-variance weighted mean
//! - [`Mode::Birge`]: the same mean, uncertainty inflated by the Birge ratio
//! - [`Mode::Jeffreys`]: maximum of the likelihood marginalized over the true
//!   uncertainty with a Jeffreys prior bounded below by `sigma_i`
//! - [`Mode::Conservative`]: the same with Sivia's normalizable prior
//!
//! The two marginal modes treat each reported uncertainty as a lower bound,
//! so inconsistent points and outliers pull on the result much less than in
//! the standard mean.
//!
//! # Example
//!
//! ```rust
//! use bayes_estimators::{estimate, Mode};
//!
//! let data = [10.0, 10.0, 10.0, 50.0];
//! let sigma = [1.0, 1.0, 1.0, 1.0];
//!
//! let standard = estimate(&data, &sigma, Mode::Standard).unwrap();
//! let jeffreys = estimate(&data, &sigma, Mode::Jeffreys).unwrap();
//! assert_eq!(standard.mean, 20.0);
//! assert!((jeffreys.mean - 10.0).abs() < 0.5);
//! ```

pub mod api;
pub mod conservative;
pub mod curve;
pub mod jeffreys;
pub mod marginal;
pub mod mode;
pub mod standard;
pub mod traits;
pub mod types;

pub use api::{average, compare_modes, estimate, estimate_by_name, estimate_with, WeightedAverage};
pub use conservative::{
    conservative_likelihood, normalized_conservative_likelihood, ConservativeAverage,
    ConservativeLikelihood,
};
pub use curve::{
    likelihood_curve, likelihood_curves, CurveOptions, CurveScale, LikelihoodCurve, Normalization,
};
pub use jeffreys::{jeffreys_likelihood, JeffreysAverage, JeffreysLikelihood};
pub use marginal::{fit_marginal, fit_pointwise, MarginalFit};
pub use mode::Mode;
pub use standard::{
    birge_average, birge_ratio, chi_square, standard_average, BirgeAverage, StandardAverage,
};
pub use traits::AverageEstimator;
pub use types::{AverageOptions, BirgeEstimate, Estimate};
