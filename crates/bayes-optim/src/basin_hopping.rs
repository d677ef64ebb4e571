//! Basin hopping: random perturbation, local descent, Metropolis acceptance
//!
//! Starting from the requested point, each hop displaces the current minimum
//! by a uniform step, descends to the nearest local minimum, and accepts the
//! move if it improves the objective or with probability
//! `exp(-(f_new - f_current) / temperature)` otherwise. The best minimum seen
//! is returned. The RNG is a seeded ChaCha stream, so runs are reproducible.
//! Caller candidates are refined after the last hop and compete with the
//! best basin found.

use crate::brent::BrentSearch;
use crate::multi_start::DEFAULT_CANDIDATES;
use crate::traits::{Candidate, GlobalMinimizer, Minimum, SearchWindow};
use bayes_core::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Maximum number of bracket re-centerings in one local descent
const MAX_DESCENT_STEPS: usize = 16;

/// Distance (unit coordinates) within which a result counts as sitting on a bracket edge
const EDGE_SLACK: f64 = 1e-6;

/// Randomized global minimizer in the style of basin hopping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasinHopping {
    hops: usize,
    /// Perturbation half-width in unit coordinates of the window
    step: f64,
    temperature: f64,
    seed: u64,
    /// How many of the best caller candidates are refined
    candidates: usize,
    local: BrentSearch,
}

impl BasinHopping {
    /// Create a basin-hopping minimizer
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] when `step` is not in `(0, 1]` or
    /// `temperature` is not strictly positive.
    pub fn new(
        hops: usize,
        step: f64,
        temperature: f64,
        seed: u64,
        local: BrentSearch,
    ) -> Result<Self> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "basin-hopping step must be in (0, 1], got {step}"
            )));
        }
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "basin-hopping temperature must be positive, got {temperature}"
            )));
        }
        Ok(Self {
            hops,
            step,
            temperature,
            seed,
            candidates: DEFAULT_CANDIDATES,
            local,
        })
    }

    /// Refine at most `limit` caller candidates (zero ignores them)
    pub fn with_candidates(mut self, limit: usize) -> Self {
        self.candidates = limit;
        self
    }

    pub fn hops(&self) -> usize {
        self.hops
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Follow the objective downhill from unit coordinate `z`
    ///
    /// Each Brent search is confined to `[z - step, z + step]`; when the result
    /// lands on an interior bracket edge the bracket is re-centred there.
    fn descend<F>(&self, objective: &F, window: &SearchWindow, z: f64) -> Result<Minimum>
    where
        F: Fn(f64) -> f64,
    {
        let mut z = z;
        let mut searches = 0;
        let mut current = Minimum::at(window.from_unit(z), objective(window.from_unit(z)));
        for _ in 0..MAX_DESCENT_STEPS {
            let z_lo = (z - self.step).max(0.0);
            let z_hi = (z + self.step).min(1.0);
            let found = self.local.minimize_bracket(objective, window, z_lo, z_hi)?;
            searches += found.local_searches;
            if found.value <= current.value {
                current = found;
            }

            let z_found = window.to_unit(current.location);
            let on_lower_edge = z_lo > 0.0 && z_found - z_lo < EDGE_SLACK;
            let on_upper_edge = z_hi < 1.0 && z_hi - z_found < EDGE_SLACK;
            if !(on_lower_edge || on_upper_edge) {
                break;
            }
            z = z_found;
        }
        current.local_searches = searches;
        Ok(current)
    }
}

impl Default for BasinHopping {
    fn default() -> Self {
        Self {
            hops: 100,
            step: 0.25,
            temperature: 1.0,
            seed: 0x5eed,
            candidates: DEFAULT_CANDIDATES,
            local: BrentSearch::default(),
        }
    }
}

impl GlobalMinimizer for BasinHopping {
    fn minimize_from<F>(
        &self,
        objective: &F,
        window: &SearchWindow,
        candidates: &[Candidate],
    ) -> Result<Minimum>
    where
        F: Fn(f64) -> f64,
    {
        if window.is_degenerate() {
            let x = window.start();
            return Ok(Minimum::at(x, objective(x)));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut current = self.descend(objective, window, window.to_unit(window.start()))?;
        let mut best = current;
        let mut searches = current.local_searches;
        let mut accepted = 0usize;

        for hop in 0..self.hops {
            let z = window.to_unit(current.location) + rng.gen_range(-self.step..=self.step);
            let trial = self.descend(objective, window, z.clamp(0.0, 1.0))?;
            searches += trial.local_searches;

            let accept = trial.value < current.value
                || rng.gen::<f64>() < (-(trial.value - current.value) / self.temperature).exp();
            if accept {
                accepted += 1;
                current = trial;
            }
            if trial.value < best.value {
                trace!(hop, location = trial.location, value = trial.value, "new best basin");
                best = trial;
            }
        }

        let seeded = self
            .local
            .refine_candidates(objective, window, candidates, self.candidates)?;
        if let Some(seeded) = seeded {
            searches += seeded.local_searches;
            if seeded.value < best.value {
                trace!(location = seeded.location, value = seeded.value, "candidate beats hops");
                best = seeded;
            }
        }

        if !best.value.is_finite() {
            return Err(Error::Optimization(
                "basin hopping found no finite objective value".to_string(),
            ));
        }
        best.local_searches = searches;
        debug!(
            location = best.location,
            value = best.value,
            hops = self.hops,
            accepted,
            "basin hopping finished"
        );
        Ok(best)
    }

    fn name(&self) -> &'static str {
        "basin-hopping"
    }
}
