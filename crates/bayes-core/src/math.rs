//! Mathematical utilities for marginal likelihoods
//!
//! Each per-measurement log-likelihood depends on the residual `d = x - mu`
//! only through a dimensionless argument, and each raw expression has a
//! removable singularity at `d = 0`. The functions here evaluate the log of
//! those expressions and their second derivatives, switching to the Taylor
//! expansion of the analytic limit near zero instead of dividing by a tiny
//! residual.

/// `ln(erf(w) / w)` and its derivatives, the Jeffreys-prior marginal
///
/// The marginal of a normal likelihood over an unknown scale `sigma'` with a
/// `1/sigma'` prior on `[sigma, inf)` is proportional to `erf(w) / |d|`
/// with `w = |d| / (sqrt(2) sigma)`.
pub mod erf_ratio {
    use statrs::function::erf::erf;
    use std::f64::consts::FRAC_2_SQRT_PI;

    /// Below this `w` the value uses the series `ln(2/sqrt(pi)) - w^2/3 + 2 w^4/45`
    pub const VALUE_SERIES_LIMIT: f64 = 1e-4;

    /// Below this `w` the second derivative uses its series expansion
    pub const CURVATURE_SERIES_LIMIT: f64 = 1e-2;

    /// `psi(w) = ln(erf(w) / w)`, even in `w`
    pub fn log_ratio(w: f64) -> f64 {
        let w = w.abs();
        if w < VALUE_SERIES_LIMIT {
            let u = w * w;
            FRAC_2_SQRT_PI.ln() - u / 3.0 + 2.0 * u * u / 45.0
        } else {
            (erf(w) / w).ln()
        }
    }

    /// `psi''(w)`, equal to `-2/3` at the origin
    pub fn log_ratio_second_derivative(w: f64) -> f64 {
        let w = w.abs();
        if w < CURVATURE_SERIES_LIMIT {
            let u = w * w;
            -2.0 / 3.0 + 8.0 * u / 15.0 - 16.0 * u * u / 189.0
        } else {
            // r = erf'(w) / erf(w); underflows cleanly to 0 in the tails
            let r = FRAC_2_SQRT_PI * (-w * w).exp() / erf(w);
            -2.0 * w * r - r * r + 1.0 / (w * w)
        }
    }

    /// `psi'(w)`, odd in `w` and zero at the origin
    pub fn log_ratio_derivative(w: f64) -> f64 {
        let sign = w.signum();
        let w = w.abs();
        if w < CURVATURE_SERIES_LIMIT {
            let u = w * w;
            sign * (-2.0 * w / 3.0 + 8.0 * u * w / 45.0)
        } else {
            let r = FRAC_2_SQRT_PI * (-w * w).exp() / erf(w);
            sign * (r - 1.0 / w)
        }
    }
}

/// `ln((1 - exp(-t)) / t)` and its derivatives, the conservative (Sivia) marginal
///
/// With a `sigma / sigma'^2` prior on `[sigma, inf)` the marginal is
/// proportional to `(1 - exp(-d^2 / (2 sigma^2))) / d^2`, i.e. `b (1 - e^-t) / t`
/// with `b = 1 / (2 sigma^2)` and `t = b d^2 >= 0`.
pub mod gaussian_deficit {
    /// Below this `t` the value uses the series `-t/2 + t^2/24`
    pub const VALUE_SERIES_LIMIT: f64 = 1e-6;

    /// Below this `t` the derivatives use their series expansions
    pub const CURVATURE_SERIES_LIMIT: f64 = 1e-4;

    /// `phi(t) = ln((1 - exp(-t)) / t)` for `t >= 0`
    pub fn log_ratio(t: f64) -> f64 {
        if t < VALUE_SERIES_LIMIT {
            -t / 2.0 + t * t / 24.0
        } else {
            (-(-t).exp_m1() / t).ln()
        }
    }

    /// `phi'(t) = 1 / (e^t - 1) - 1 / t`
    pub fn log_ratio_derivative(t: f64) -> f64 {
        if t < CURVATURE_SERIES_LIMIT {
            -0.5 + t / 12.0 - t * t * t / 720.0
        } else {
            1.0 / t.exp_m1() - 1.0 / t
        }
    }

    /// `phi''(t) = 1 / t^2 - e^t / (e^t - 1)^2`
    pub fn log_ratio_second_derivative(t: f64) -> f64 {
        if t < CURVATURE_SERIES_LIMIT {
            1.0 / 12.0 - t * t / 240.0
        } else {
            // e^t / (e^t - 1)^2 = q (1 + q) with q = 1 / (e^t - 1), finite for large t
            let q = 1.0 / t.exp_m1();
            1.0 / (t * t) - q * (1.0 + q)
        }
    }

    /// `d^2/dd^2 phi(b d^2) = 2 b (phi'(t) + 2 t phi''(t))`, equal to `-b` at `d = 0`
    pub fn residual_second_derivative(t: f64, b: f64) -> f64 {
        if t < CURVATURE_SERIES_LIMIT {
            2.0 * b * (-0.5 + t / 4.0 - 7.0 * t * t * t / 720.0)
        } else {
            2.0 * b * (log_ratio_derivative(t) + 2.0 * t * log_ratio_second_derivative(t))
        }
    }
}

/// Normal density helpers
pub mod gaussian {
    use std::f64::consts::PI;

    /// `ln(1 / (sigma sqrt(2 pi)))`
    pub fn log_normalization(sigma: f64) -> f64 {
        -sigma.ln() - 0.5 * (2.0 * PI).ln()
    }

    /// `ln N(d; 0, sigma)`
    pub fn log_density(d: f64, sigma: f64) -> f64 {
        log_normalization(sigma) - 0.5 * (d / sigma).powi(2)
    }
}
