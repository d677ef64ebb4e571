//! Minimizer interface and search-window bookkeeping

use bayes_core::{Error, Result};

/// Closed interval searched by a minimizer, plus the point a search starts from
///
/// Minimizers work in unit coordinates `z = (x - lower) / (upper - lower)`, so
/// their tolerances are relative to the window width rather than to the
/// magnitude of `x`. That keeps results invariant under a common rescaling of
/// the problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    lower: f64,
    upper: f64,
    start: f64,
}

impl SearchWindow {
    /// Create a window; `start` is clamped into `[lower, upper]`
    pub fn new(lower: f64, upper: f64, start: f64) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite() && start.is_finite()) {
            return Err(Error::non_finite("search window"));
        }
        if lower > upper {
            return Err(Error::InvalidParameter(format!(
                "search window lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        Ok(Self {
            lower,
            upper,
            start: start.clamp(lower, upper),
        })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// A zero-width window has a single admissible point
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0
    }

    /// Map `x` to unit coordinates
    #[inline]
    pub fn to_unit(&self, x: f64) -> f64 {
        (x - self.lower) / self.width()
    }

    /// Map unit coordinate `z` back to `x`, never leaving the window
    #[inline]
    pub fn from_unit(&self, z: f64) -> f64 {
        (self.lower + z * self.width()).clamp(self.lower, self.upper)
    }
}

/// Result of a minimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    /// Minimizing argument
    pub location: f64,
    /// Objective value at `location`
    pub value: f64,
    /// Number of local searches that were run
    pub local_searches: usize,
}

impl Minimum {
    /// Minimum found without running any local search
    pub fn at(location: f64, value: f64) -> Self {
        Self {
            location,
            value,
            local_searches: 0,
        }
    }
}

/// A point where the caller expects a narrow basin, with the basin's width
///
/// Basins much narrower than the grid spacing are invisible to a scan; a
/// candidate tells the minimizer where to look and how wide a bracket to
/// refine in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub location: f64,
    /// Typical half-width of the basin, in the objective's own units
    pub scale: f64,
}

impl Candidate {
    pub fn new(location: f64, scale: f64) -> Self {
        Self { location, scale }
    }
}

/// Global minimization of a scalar function of one variable
///
/// Implementations must return the best point they found inside the window,
/// and must tolerate objectives with several local minima.
pub trait GlobalMinimizer {
    /// Minimize `objective` over `window`, also refining around `candidates`
    ///
    /// The result is never worse than the best candidate inside the window.
    fn minimize_from<F>(
        &self,
        objective: &F,
        window: &SearchWindow,
        candidates: &[Candidate],
    ) -> Result<Minimum>
    where
        F: Fn(f64) -> f64;

    /// Minimize `objective` over `window`
    fn minimize<F>(&self, objective: &F, window: &SearchWindow) -> Result<Minimum>
    where
        F: Fn(f64) -> f64,
    {
        self.minimize_from(objective, window, &[])
    }

    /// Name of the strategy for logging
    fn name(&self) -> &'static str;
}

/// Objective value with NaN ranked above every number
#[inline]
pub(crate) fn rank(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

/// Indices of nodes not exceeded by either neighbour, best first
pub(crate) fn discrete_minima(values: &[f64]) -> Vec<usize> {
    let last = values.len() - 1;
    let mut minima: Vec<usize> = (0..values.len())
        .filter(|&i| {
            let left = if i == 0 { f64::INFINITY } else { values[i - 1] };
            let right = if i == last { f64::INFINITY } else { values[i + 1] };
            values[i] <= left && values[i] <= right
        })
        .collect();
    minima.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    minima
}
