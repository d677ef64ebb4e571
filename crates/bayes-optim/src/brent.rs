//! Bounded local minimization with Brent's method, via `argmin`
//!
//! The objective is exposed to `argmin` as a [`CostFunction`] over unit
//! coordinates of the bracket being searched, so the relative tolerance
//! scales with the bracket rather than with its position in the
//! [`SearchWindow`]. Brent's method combines golden-section steps with
//! parabolic interpolation and needs no derivatives.

use crate::traits::{discrete_minima, rank, Candidate, Minimum, SearchWindow};
use argmin::core::{CostFunction, Error as ArgminError, Executor, State};
use argmin::solver::brent::BrentOpt;
use bayes_core::{Error, Result};
use tracing::{trace, warn};

/// Half-width of a candidate's bracket, in multiples of its scale
const CANDIDATE_BRACKET: f64 = 3.0;

/// Nodes scanned inside a candidate's bracket
const CANDIDATE_NODES: usize = 25;

/// Discrete minima of a bracket scan that get a Brent search
const CANDIDATE_REFINEMENTS: usize = 2;

/// Bridges a scalar objective to `argmin`'s `CostFunction` on `[0, 1]`
///
/// `u` maps to window coordinate `z = z_lo + u * span`.
struct UnitObjective<'a, F> {
    f: &'a F,
    window: &'a SearchWindow,
    z_lo: f64,
    span: f64,
}

impl<F> UnitObjective<'_, F> {
    fn location(&self, u: f64) -> f64 {
        self.window.from_unit(self.z_lo + u * self.span)
    }
}

impl<F: Fn(f64) -> f64> CostFunction for UnitObjective<'_, F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, u: &Self::Param) -> std::result::Result<Self::Output, ArgminError> {
        let x = self.location(*u);
        let value = (self.f)(x);
        if value.is_nan() {
            return Err(ArgminError::msg(format!("objective is NaN at {x}")));
        }
        Ok(value)
    }
}

/// Brent's method on a sub-interval of a search window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrentSearch {
    /// Absolute tolerance in unit coordinates
    tolerance: f64,
    /// Iteration cap for a single search
    max_iters: u64,
}

impl BrentSearch {
    pub fn new(tolerance: f64, max_iters: u64) -> Self {
        Self {
            tolerance,
            max_iters,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Minimize `objective` over the unit-coordinate bracket `[z_lo, z_hi]` of `window`
    ///
    /// Returns the minimizer in window coordinates.
    pub fn minimize_bracket<F>(
        &self,
        objective: &F,
        window: &SearchWindow,
        z_lo: f64,
        z_hi: f64,
    ) -> Result<Minimum>
    where
        F: Fn(f64) -> f64,
    {
        let z_lo = z_lo.clamp(0.0, 1.0);
        let z_hi = z_hi.clamp(0.0, 1.0);
        if z_hi <= z_lo {
            let x = window.from_unit(z_lo);
            return Ok(Minimum::at(x, objective(x)));
        }

        let problem = UnitObjective {
            f: objective,
            window,
            z_lo,
            span: z_hi - z_lo,
        };
        // The absolute tolerance stays a fraction of the window
        let absolute = self.tolerance / problem.span;
        let solver = BrentOpt::new(0.0, 1.0).set_tolerance(f64::EPSILON.sqrt(), absolute);
        let result = Executor::new(problem, solver)
            .configure(|state| state.max_iters(self.max_iters))
            .run()?;

        let state = result.state();
        let u = state.get_best_param().copied().ok_or_else(|| {
            Error::Optimization("Brent search returned no parameter".to_string())
        })?;
        let value = state.get_best_cost();
        let z = z_lo + u * (z_hi - z_lo);
        trace!(
            z_lo,
            z_hi,
            z,
            value,
            iterations = state.get_iter(),
            "brent search finished"
        );

        if !z.is_finite() || rank(value) == f64::INFINITY {
            return Err(Error::Optimization(format!(
                "Brent search on [{}, {}] found no finite minimum",
                window.from_unit(z_lo),
                window.from_unit(z_hi)
            )));
        }

        Ok(Minimum {
            location: window.from_unit(z),
            value,
            local_searches: 1,
        })
    }
}

impl BrentSearch {
    /// Refine the `limit` best candidates, ranked by the objective at their location
    ///
    /// A candidate's bracket spans `CANDIDATE_BRACKET` scales on either side.
    /// It is scanned on a small grid that includes the candidate itself, and
    /// the best discrete minima of the scan are refined, so a bracket holding
    /// two basins still yields the deeper one. `None` when no candidate has a
    /// finite value.
    pub fn refine_candidates<F>(
        &self,
        objective: &F,
        window: &SearchWindow,
        candidates: &[Candidate],
        limit: usize,
    ) -> Result<Option<Minimum>>
    where
        F: Fn(f64) -> f64,
    {
        if limit == 0 || candidates.is_empty() {
            return Ok(None);
        }
        let width = window.width();
        // (value, x, half-width in unit coordinates)
        let mut ranked: Vec<(f64, f64, f64)> = candidates
            .iter()
            .filter(|c| c.location.is_finite())
            .map(|c| {
                let x = c.location.clamp(window.lower(), window.upper());
                let half = if width > 0.0 && c.scale.is_finite() {
                    CANDIDATE_BRACKET * c.scale.abs() / width
                } else {
                    0.0
                };
                (rank(objective(x)), x, half)
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        ranked.dedup_by(|a, b| a.1 == b.1);

        let mut best: Option<Minimum> = None;
        let mut searches = 0;
        for (value, x, half) in ranked.into_iter().take(limit) {
            if value == f64::INFINITY {
                break;
            }
            let mut found = Minimum::at(x, value);
            if half > 0.0 {
                let refined = self.scan_bracket(objective, window, window.to_unit(x), half);
                searches += refined.local_searches;
                if refined.value < found.value {
                    found = refined;
                }
            }
            trace!(
                candidate = x,
                location = found.location,
                value = found.value,
                "refined candidate"
            );
            if best.map_or(true, |b| found.value < b.value) {
                best = Some(found);
            }
        }
        Ok(best.map(|mut b| {
            b.local_searches = searches;
            b
        }))
    }

    /// Scan `[z - half, z + half]` and refine its best discrete minima
    ///
    /// A failed Brent search keeps the scanned node instead.
    fn scan_bracket<F>(&self, objective: &F, window: &SearchWindow, z: f64, half: f64) -> Minimum
    where
        F: Fn(f64) -> f64,
    {
        let z_lo = (z - half).max(0.0);
        let z_hi = (z + half).min(1.0);
        let cells = (CANDIDATE_NODES - 1) as f64;
        let mut nodes: Vec<f64> = (0..CANDIDATE_NODES)
            .map(|i| z_lo + (z_hi - z_lo) * i as f64 / cells)
            .collect();
        nodes.push(z);
        nodes.sort_by(f64::total_cmp);
        nodes.dedup();
        let values: Vec<f64> = nodes
            .iter()
            .map(|&n| rank(objective(window.from_unit(n))))
            .collect();

        let last = nodes.len() - 1;
        let mut best = Minimum::at(f64::NAN, f64::INFINITY);
        let mut searches = 0;
        for i in discrete_minima(&values).into_iter().take(CANDIDATE_REFINEMENTS) {
            let node = Minimum::at(window.from_unit(nodes[i]), values[i]);
            let lo = nodes[i.saturating_sub(1)];
            let hi = nodes[(i + 1).min(last)];
            let found = match self.minimize_bracket(objective, window, lo, hi) {
                Ok(found) if found.value <= node.value => {
                    searches += found.local_searches;
                    found
                }
                Ok(found) => {
                    searches += found.local_searches;
                    node
                }
                Err(err) => {
                    warn!(location = node.location, %err, "candidate refinement failed");
                    node
                }
            };
            if found.value < best.value {
                best = found;
            }
        }
        best.local_searches = searches;
        best
    }
}

impl Default for BrentSearch {
    fn default() -> Self {
        Self::new(1e-12, 100)
    }
}
