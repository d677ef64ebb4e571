//! Optimizer configuration
//!
//! [`OptimizerConfig`] is plain data (serializable) and is turned into a
//! concrete [`Minimizer`] with [`OptimizerConfig::build`], which is where the
//! parameters are validated.

use crate::basin_hopping::BasinHopping;
use crate::brent::BrentSearch;
use crate::multi_start::{MultiStart, DEFAULT_CANDIDATES};
use crate::traits::{Candidate, GlobalMinimizer, Minimum, SearchWindow};
use bayes_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Global search strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Uniform grid scan plus Brent refinement of the best cells
    MultiStart {
        grid_points: usize,
        refinements: usize,
    },
    /// Random hops with local descent and Metropolis acceptance
    BasinHopping {
        hops: usize,
        /// Perturbation half-width as a fraction of the search window
        step: f64,
        temperature: f64,
        seed: u64,
    },
}

impl Default for Strategy {
    fn default() -> Self {
        Self::MultiStart {
            grid_points: 64,
            refinements: 4,
        }
    }
}

/// Configuration of the global minimizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub strategy: Strategy,
    /// Absolute Brent tolerance, as a fraction of the search window
    pub tolerance: f64,
    /// Iteration cap of each Brent search
    pub max_iters: u64,
    /// How many caller candidates are refined, best first
    #[serde(default = "default_candidates")]
    pub candidates: usize,
}

fn default_candidates() -> usize {
    DEFAULT_CANDIDATES
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            tolerance: 1e-12,
            max_iters: 100,
            candidates: DEFAULT_CANDIDATES,
        }
    }
}

impl OptimizerConfig {
    /// Deterministic multi-start with the default grid
    pub fn multi_start() -> Self {
        Self::default()
    }

    /// Basin hopping with default hop count and step, seeded with `seed`
    pub fn basin_hopping(seed: u64) -> Self {
        Self {
            strategy: Strategy::BasinHopping {
                hops: 100,
                step: 0.25,
                temperature: 1.0,
                seed,
            },
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates;
        self
    }

    /// Validate the configuration and construct the minimizer
    pub fn build(&self) -> Result<Minimizer> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "optimizer tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iters == 0 {
            return Err(Error::InvalidParameter(
                "optimizer needs at least one iteration".to_string(),
            ));
        }
        let local = BrentSearch::new(self.tolerance, self.max_iters);
        match self.strategy {
            Strategy::MultiStart {
                grid_points,
                refinements,
            } => Ok(Minimizer::MultiStart(
                MultiStart::new(grid_points, refinements, local)?
                    .with_candidates(self.candidates),
            )),
            Strategy::BasinHopping {
                hops,
                step,
                temperature,
                seed,
            } => Ok(Minimizer::BasinHopping(
                BasinHopping::new(hops, step, temperature, seed, local)?
                    .with_candidates(self.candidates),
            )),
        }
    }
}

/// A configured global minimizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Minimizer {
    MultiStart(MultiStart),
    BasinHopping(BasinHopping),
}

impl Default for Minimizer {
    fn default() -> Self {
        Self::MultiStart(MultiStart::default())
    }
}

impl GlobalMinimizer for Minimizer {
    fn minimize_from<F>(
        &self,
        objective: &F,
        window: &SearchWindow,
        candidates: &[Candidate],
    ) -> Result<Minimum>
    where
        F: Fn(f64) -> f64,
    {
        match self {
            Self::MultiStart(m) => m.minimize_from(objective, window, candidates),
            Self::BasinHopping(m) => m.minimize_from(objective, window, candidates),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::MultiStart(m) => m.name(),
            Self::BasinHopping(m) => m.name(),
        }
    }
}
