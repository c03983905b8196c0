//! Polynomial least squares on elapsed-minutes time series.
//!
//! Fits are solved through the normal equations; a non-invertible normal
//! matrix is the degenerate-design signal (duplicate timestamps, or more
//! coefficients than independent samples) and is reported as a fit failure
//! rather than silently regularized.

use nalgebra::{DMatrix, DVector};

use crate::errors::ChooseCenterError;

/// An accepted polynomial fit for one tracked quantity at one height.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PolyFit {
    /// Polynomial degree (`coeffs.len() - 1`).
    pub degree: usize,
    /// Coefficients, constant term first.
    pub coeffs: Vec<f64>,
    /// Residual variance at this degree: RSS / (samples − degree).
    pub variance: f64,
}

impl PolyFit {
    pub fn eval(&self, minutes: f64) -> f64 {
        eval_poly(&self.coeffs, minutes)
    }
}

/// Least-squares fit of a polynomial of the given degree.
///
/// Arguments
/// ---------
/// * `times_min` – sample abscissae, elapsed minutes,
/// * `values` – sample ordinates, same length,
/// * `degree` – polynomial degree; `degree + 1` coefficients are fit.
///
/// Return
/// ------
/// * Coefficients, constant term first, or a [`ChooseCenterError::FitFailure`]
///   when the design is degenerate.
pub(crate) fn fit_polynomial(
    times_min: &[f64],
    values: &[f64],
    degree: usize,
) -> Result<Vec<f64>, ChooseCenterError> {
    debug_assert_eq!(times_min.len(), values.len());
    let rows = times_min.len();
    let cols = degree + 1;
    if rows < cols {
        return Err(ChooseCenterError::FitFailure(format!(
            "{rows} samples cannot constrain a degree-{degree} polynomial"
        )));
    }

    let design = DMatrix::from_fn(rows, cols, |i, j| times_min[i].powi(j as i32));
    let rhs = DVector::from_column_slice(values);

    let design_t = design.transpose();
    let normal = &design_t * &design;
    let projected = &design_t * &rhs;

    let inverse = normal.try_inverse().ok_or_else(|| {
        ChooseCenterError::FitFailure(format!(
            "degenerate design matrix for degree {degree} with {rows} samples"
        ))
    })?;

    Ok((inverse * projected).as_slice().to_vec())
}

pub(crate) fn eval_poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Sum of squared residuals of `coeffs` against the samples.
pub(crate) fn residual_sum(coeffs: &[f64], times_min: &[f64], values: &[f64]) -> f64 {
    times_min
        .iter()
        .zip(values)
        .map(|(t, y)| {
            let r = eval_poly(coeffs, *t) - y;
            r * r
        })
        .sum()
}

#[cfg(test)]
mod poly_test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_recovers_exact_quadratic() {
        let times: Vec<f64> = (0..7).map(|i| 10.0 * i as f64).collect();
        let values: Vec<f64> = times.iter().map(|t| 3.0 - 0.5 * t + 0.02 * t * t).collect();
        let coeffs = fit_polynomial(&times, &values, 2).unwrap();
        assert_relative_eq!(coeffs[0], 3.0, epsilon = 1e-8);
        assert_relative_eq!(coeffs[1], -0.5, epsilon = 1e-8);
        assert_relative_eq!(coeffs[2], 0.02, epsilon = 1e-8);
        assert!(residual_sum(&coeffs, &times, &values) < 1e-12);
    }

    #[test]
    fn test_duplicate_times_are_degenerate() {
        let times = [5.0, 5.0, 5.0, 5.0];
        let values = [1.0, 2.0, 3.0, 4.0];
        let err = fit_polynomial(&times, &values, 1).unwrap_err();
        assert!(matches!(err, ChooseCenterError::FitFailure(_)));
    }

    #[test]
    fn test_underdetermined_is_rejected() {
        let err = fit_polynomial(&[0.0, 1.0], &[0.0, 1.0], 3).unwrap_err();
        assert!(matches!(err, ChooseCenterError::FitFailure(_)));
    }

    #[test]
    fn test_eval_poly_constant_first() {
        assert_relative_eq!(eval_poly(&[2.0, 3.0, 1.0], 2.0), 12.0);
        assert_relative_eq!(eval_poly(&[7.0], 100.0), 7.0);
    }
}
