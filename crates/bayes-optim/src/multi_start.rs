//! Deterministic multi-start global minimization
//!
//! The window is scanned on a uniform grid (plus the requested starting
//! point), the discrete local minima of the scan are ranked, and the best few
//! are refined with Brent's method inside the bracket formed by their grid
//! neighbours. A narrow basin can only be missed by the scan if it falls
//! entirely between two grid nodes, so callers that know where such basins
//! may sit pass them as [`Candidate`]s, which are refined as well.

use crate::brent::BrentSearch;
use crate::traits::{discrete_minima, rank, Candidate, GlobalMinimizer, Minimum, SearchWindow};
use bayes_core::{Error, Result};
use tracing::{debug, trace};

/// Default number of caller candidates refined per minimization
pub const DEFAULT_CANDIDATES: usize = 64;

/// Grid scan followed by Brent refinement of the most promising cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiStart {
    grid_points: usize,
    refinements: usize,
    /// How many of the best caller candidates are refined
    candidates: usize,
    local: BrentSearch,
}

impl MultiStart {
    /// Create a multi-start minimizer
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] when `grid_points < 2` or `refinements == 0`.
    pub fn new(grid_points: usize, refinements: usize, local: BrentSearch) -> Result<Self> {
        if grid_points < 2 {
            return Err(Error::InvalidParameter(format!(
                "multi-start needs at least 2 grid points, got {grid_points}"
            )));
        }
        if refinements == 0 {
            return Err(Error::InvalidParameter(
                "multi-start needs at least one refinement".to_string(),
            ));
        }
        Ok(Self {
            grid_points,
            refinements,
            candidates: DEFAULT_CANDIDATES,
            local,
        })
    }

    /// Refine at most `limit` caller candidates (zero ignores them)
    pub fn with_candidates(mut self, limit: usize) -> Self {
        self.candidates = limit;
        self
    }

    pub fn grid_points(&self) -> usize {
        self.grid_points
    }

    pub fn refinements(&self) -> usize {
        self.refinements
    }

    pub fn candidates(&self) -> usize {
        self.candidates
    }

    /// Unit-coordinate nodes: the uniform grid plus the starting point
    fn nodes(&self, window: &SearchWindow) -> Vec<f64> {
        let cells = (self.grid_points - 1) as f64;
        let mut nodes: Vec<f64> = (0..self.grid_points).map(|i| i as f64 / cells).collect();
        nodes.push(window.to_unit(window.start()));
        nodes.sort_by(f64::total_cmp);
        nodes.dedup();
        nodes
    }
}

impl Default for MultiStart {
    fn default() -> Self {
        Self {
            grid_points: 64,
            refinements: 4,
            candidates: DEFAULT_CANDIDATES,
            local: BrentSearch::default(),
        }
    }
}

impl MultiStart {
    /// Best refined grid minimum, with the local searches it took
    fn scan<F>(&self, objective: &F, window: &SearchWindow) -> Result<Option<Minimum>>
    where
        F: Fn(f64) -> f64,
    {
        let nodes = self.nodes(window);
        let values: Vec<f64> = nodes
            .iter()
            .map(|&z| rank(objective(window.from_unit(z))))
            .collect();

        let last = nodes.len() - 1;
        let mut best: Option<Minimum> = None;
        let mut searches = 0;
        for i in discrete_minima(&values).into_iter().take(self.refinements) {
            let z_lo = nodes[i.saturating_sub(1)];
            let z_hi = nodes[(i + 1).min(last)];
            trace!(node = window.from_unit(nodes[i]), value = values[i], "refining grid minimum");

            let candidate = self.local.minimize_bracket(objective, window, z_lo, z_hi)?;
            searches += candidate.local_searches;

            // Brent may stop short of the grid value on a plateau; keep the better one
            let candidate = if values[i] < candidate.value {
                Minimum::at(window.from_unit(nodes[i]), values[i])
            } else {
                candidate
            };
            if best.map_or(true, |b| candidate.value < b.value) {
                best = Some(candidate);
            }
        }
        Ok(best.map(|mut b| {
            b.local_searches = searches;
            b
        }))
    }
}

impl GlobalMinimizer for MultiStart {
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

        let grid = self.scan(objective, window)?;
        let seeded = self
            .local
            .refine_candidates(objective, window, candidates, self.candidates)?;
        let searches: usize = [grid, seeded]
            .iter()
            .flatten()
            .map(|m| m.local_searches)
            .sum();

        let mut best = match (grid, seeded) {
            (Some(g), Some(c)) if c.value < g.value => c,
            (Some(g), _) => g,
            (None, Some(c)) => c,
            (None, None) => {
                return Err(Error::Optimization(
                    "objective is NaN on the whole search grid".to_string(),
                ));
            }
        };
        if best.value == f64::INFINITY {
            return Err(Error::Optimization(
                "objective has no finite value on the search grid".to_string(),
            ));
        }
        best.local_searches = searches;
        debug!(
            location = best.location,
            value = best.value,
            local_searches = searches,
            candidates = candidates.len(),
            "multi-start minimization finished"
        );
        Ok(best)
    }

    fn name(&self) -> &'static str {
        "multi-start"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_finds_global_of_double_well() {
        // Deeper well at x = 2, shallower one at x = -2; starting in the wrong basin
        let f = |x: f64| (x * x - 4.0).powi(2) - x;
        let window = SearchWindow::new(-4.0, 4.0, -2.0).unwrap();
        let min = MultiStart::default().minimize(&f, &window).unwrap();
        assert!(min.location > 1.5, "found {}", min.location);
        assert!(min.local_searches >= 1);
    }

    #[test]
    fn test_degenerate_window() {
        let f = |x: f64| x * x;
        let window = SearchWindow::new(3.0, 3.0, 3.0).unwrap();
        let min = MultiStart::default().minimize(&f, &window).unwrap();
        assert_eq!(min.location, 3.0);
        assert_eq!(min.value, 9.0);
    }

    #[test]
    fn test_smooth_minimum_accuracy() {
        let f = |x: f64| (x - 0.123).powi(2);
        let window = SearchWindow::new(-1.0, 1.0, 0.5).unwrap();
        let min = MultiStart::default().minimize(&f, &window).unwrap();
        assert_relative_eq!(min.location, 0.123, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(MultiStart::new(1, 4, BrentSearch::default()).is_err());
        assert!(MultiStart::new(16, 0, BrentSearch::default()).is_err());
        let ms = MultiStart::new(16, 2, BrentSearch::default()).unwrap();
        assert_eq!(ms.grid_points(), 16);
        assert_eq!(ms.refinements(), 2);
    }


    #[test]
    fn test_candidate_basin_between_grid_nodes() {
        // A deep well of width 1e-5 that no grid node comes near
        let f = |x: f64| {
            let well = (-((x - 0.3001) / 1e-5).powi(2)).exp();
            0.1 * x * x - 10.0 * well
        };
        let window = SearchWindow::new(-1.0, 1.0, 0.0).unwrap();
        let scan_only = MultiStart::default().minimize(&f, &window).unwrap();
        assert!(scan_only.location.abs() < 1e-3, "found {}", scan_only.location);

        let candidates = [Candidate::new(0.3001, 1e-5), Candidate::new(0.0, 1.0)];
        let min = MultiStart::default()
            .minimize_from(&f, &window, &candidates)
            .unwrap();
        assert_relative_eq!(min.location, 0.3001, epsilon = 1e-7);
        assert!(min.value < -9.9);

        let ignored = MultiStart::default()
            .with_candidates(0)
            .minimize_from(&f, &window, &candidates)
            .unwrap();
        assert_eq!(ignored, scan_only);
    }
}
