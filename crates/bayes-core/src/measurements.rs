//! Validated measurement sets
//!
//! A measurement set is an ordered sequence of `(x_i, sigma_i)` pairs. The
//! only invariant beyond positional correspondence is that every value is
//! finite and every uncertainty is finite and strictly positive.

use crate::{Error, Result};

/// A borrowed, validated set of measurements with their reported uncertainties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements<'a> {
    data: &'a [f64],
    sigma: &'a [f64],
}

impl<'a> Measurements<'a> {
    /// Validate `data` and `sigma` and wrap them
    ///
    /// # Errors
    ///
    /// - [`Error::InputShape`] if the lengths differ or are zero
    /// - [`Error::InvalidInput`] for non-finite values or non-positive uncertainties
    pub fn new(data: &'a [f64], sigma: &'a [f64]) -> Result<Self> {
        if data.len() != sigma.len() || data.is_empty() {
            return Err(Error::shape_mismatch(data.len(), sigma.len()));
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(Error::non_finite("data"));
        }
        for (i, &s) in sigma.iter().enumerate() {
            if !s.is_finite() {
                return Err(Error::non_finite("sigma"));
            }
            if s <= 0.0 {
                return Err(Error::non_positive_sigma(i, s));
            }
        }
        Ok(Self { data, sigma })
    }

    /// Number of measurements (always at least one)
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; kept for API symmetry with slices
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Measured values
    #[inline]
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    /// Reported uncertainties
    #[inline]
    pub fn sigma(&self) -> &'a [f64] {
        self.sigma
    }

    /// Iterate over `(x_i, sigma_i)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.data.iter().copied().zip(self.sigma.iter().copied())
    }

    /// Unweighted arithmetic mean of the values
    pub fn arithmetic_mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.len() as f64
    }

    /// Smallest and largest value
    pub fn value_range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    }

    /// Envelope of the error bars: `(min(x_i - sigma_i), max(x_i + sigma_i))`
    pub fn envelope(&self) -> (f64, f64) {
        self.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, s)| {
                (lo.min(x - s), hi.max(x + s))
            })
    }

    /// Smallest reported uncertainty
    pub fn min_sigma(&self) -> f64 {
        self.sigma.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_valid_measurements() {
        let data = [1.0, 3.0, 2.0];
        let sigma = [0.5, 1.0, 0.25];
        let m = Measurements::new(&data, &sigma).unwrap();

        assert_eq!(m.len(), 3);
        assert_relative_eq!(m.arithmetic_mean(), 2.0);
        assert_eq!(m.value_range(), (1.0, 3.0));
        assert_eq!(m.envelope(), (0.5, 4.0));
        assert_eq!(m.min_sigma(), 0.25);
        assert_eq!(m.iter().nth(1), Some((3.0, 1.0)));
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(
            Measurements::new(&[1.0, 2.0], &[1.0]),
            Err(Error::InputShape { data: 2, sigma: 1 })
        ));
        assert!(matches!(
            Measurements::new(&[], &[]),
            Err(Error::InputShape { data: 0, sigma: 0 })
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Measurements::new(&[1.0, f64::NAN], &[1.0, 1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Measurements::new(&[1.0, 2.0], &[1.0, 0.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Measurements::new(&[1.0], &[f64::INFINITY]),
            Err(Error::InvalidInput(_))
        ));
    }
}
