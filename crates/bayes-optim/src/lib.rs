//! One-dimensional global minimization for likelihood maximization
//!
//! Marginal likelihoods built from inconsistent data are often multimodal:
//! every outlier can carry its own local peak. This crate hides the search
//! behind the [`GlobalMinimizer`] trait so estimators only state *what* to
//! minimize and *where*:
//!
//! - [`MultiStart`]: deterministic grid scan plus Brent refinement (default)
//! - [`BasinHopping`]: seeded random hops with Metropolis acceptance
//! - [`BrentSearch`]: bounded local search through `argmin`
//!
//! Callers that know where narrow basins may sit pass them as [`Candidate`]s
//! to [`GlobalMinimizer::minimize_from`]; both strategies refine the best of
//! them alongside their own search.
//!
//! # Example
//!
//! ```rust
//! use bayes_optim::{GlobalMinimizer, OptimizerConfig, SearchWindow};
//!
//! let f = |x: f64| (x * x - 4.0).powi(2) - x;
//! let window = SearchWindow::new(-4.0, 4.0, -2.0).unwrap();
//! let minimizer = OptimizerConfig::default().build().unwrap();
//! let min = minimizer.minimize(&f, &window).unwrap();
//! assert!(min.location > 1.5);
//! ```

pub mod basin_hopping;
pub mod brent;
pub mod config;
pub mod multi_start;
pub mod traits;

pub use basin_hopping::BasinHopping;
pub use brent::BrentSearch;
pub use config::{Minimizer, OptimizerConfig, Strategy};
pub use multi_start::MultiStart;
pub use traits::{Candidate, GlobalMinimizer, Minimum, SearchWindow};
