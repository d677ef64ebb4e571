//! Per-measurement likelihood kernels
//!
//! A kernel maps one residual `d = x_i - mu` and its reported uncertainty
//! `sigma_i` to a log-likelihood term and the term's second derivative in
//! `mu`. Since every term depends on `mu` only through `d`, the second
//! derivative in `mu` equals the second derivative in `d`.

use crate::math::{erf_ratio, gaussian, gaussian_deficit};
use std::f64::consts::{FRAC_1_SQRT_2, LN_2, PI};

/// Base trait for all likelihood kernels
pub trait LikelihoodKernel: Clone + Send + Sync {
    /// Log-likelihood contribution of one measurement with residual `d`
    fn log_term(&self, d: f64, sigma: f64) -> f64;

    /// Second derivative of [`log_term`](Self::log_term) with respect to `mu`
    fn curvature_term(&self, d: f64, sigma: f64) -> f64;

    /// Degree `k` in `log_term(c d, c sigma) = log_term(d, sigma) - k ln(c)`
    ///
    /// Lets a fit run in rescaled units and map the log-likelihood back.
    fn scaling_degree(&self) -> f64;

    /// Name of this kernel for debugging/logging
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Normal likelihood with the reported uncertainty taken at face value
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianKernel;

impl LikelihoodKernel for GaussianKernel {
    fn log_term(&self, d: f64, sigma: f64) -> f64 {
        gaussian::log_density(d, sigma)
    }

    fn curvature_term(&self, _d: f64, sigma: f64) -> f64 {
        -1.0 / (sigma * sigma)
    }

    fn scaling_degree(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }
}

/// Jeffreys-prior marginal: `ln(erf(d / (sqrt(2) sigma)) / d)`
///
/// The resulting density is not normalizable; only its maximum and the
/// curvature there are meaningful.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErfRatioKernel;

impl LikelihoodKernel for ErfRatioKernel {
    fn log_term(&self, d: f64, sigma: f64) -> f64 {
        // ln(erf(a|d|) / |d|) = ln(a) + psi(a|d|) with a = 1 / (sqrt(2) sigma)
        let ln_a = -sigma.ln() - 0.5 * LN_2;
        ln_a + erf_ratio::log_ratio(FRAC_1_SQRT_2 * (d / sigma))
    }

    fn curvature_term(&self, d: f64, sigma: f64) -> f64 {
        let w = FRAC_1_SQRT_2 * (d / sigma);
        0.5 * erf_ratio::log_ratio_second_derivative(w) / sigma / sigma
    }

    fn scaling_degree(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "erf-ratio"
    }
}

/// Conservative (Sivia) marginal: `ln((1 - exp(-d^2 / (2 sigma^2))) / d^2)`
///
/// With `normalized` set, each term also carries the `sigma / sqrt(2 pi)`
/// factor that makes the per-measurement density integrate to one over `mu`. The
/// factor does not depend on `mu`, so the optimum and curvature are unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianDeficitKernel {
    normalized: bool,
}

impl GaussianDeficitKernel {
    /// Kernel without the normalization constant
    pub fn new() -> Self {
        Self { normalized: false }
    }

    /// Kernel including `ln(sigma / sqrt(2 pi))` in every term
    pub fn normalized() -> Self {
        Self { normalized: true }
    }

    /// Whether the normalization constant is included
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }
}

impl LikelihoodKernel for GaussianDeficitKernel {
    fn log_term(&self, d: f64, sigma: f64) -> f64 {
        // ln(b) + phi(b d^2) with b = 1 / (2 sigma^2)
        let ln_sigma = sigma.ln();
        let ln_b = -LN_2 - 2.0 * ln_sigma;
        let term = ln_b + gaussian_deficit::log_ratio(0.5 * (d / sigma).powi(2));
        if self.normalized {
            term + ln_sigma - 0.5 * (2.0 * PI).ln()
        } else {
            term
        }
    }

    fn curvature_term(&self, d: f64, sigma: f64) -> f64 {
        let t = 0.5 * (d / sigma).powi(2);
        gaussian_deficit::residual_second_derivative(t, 1.0) * 0.5 / sigma / sigma
    }

    fn scaling_degree(&self) -> f64 {
        if self.normalized {
            1.0
        } else {
            2.0
        }
    }

    fn name(&self) -> &'static str {
        "gaussian-deficit"
    }
}
