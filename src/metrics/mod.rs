//! Evaluation metrics for regression models.
//!
//! The two scores the Monte Carlo driver understands: the coefficient of
//! determination (R²) and the mean squared error used for `RSS` evaluation.

use crate::error::{RegsimError, Result};
use crate::primitives::Vector;

fn check_lengths(y_true: &Vector<f64>, y_pred: &Vector<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(RegsimError::dimension_mismatch(
            "prediction length",
            y_true.len(),
            y_pred.len(),
        ));
    }
    if y_true.is_empty() {
        return Err(RegsimError::EmptyInput("metric over zero samples".into()));
    }
    Ok(())
}

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`)
///
/// A constant target gives `1.0` for a perfect prediction and `0.0`
/// otherwise. The score has no lower bound.
///
/// # Examples
///
/// ```
/// use regsim::metrics::r_squared;
/// use regsim::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// let r2 = r_squared(&y_true, &y_pred).unwrap();
/// assert!(r2 > 0.9);
/// ```
///
/// # Errors
///
/// Returns an error if the vectors differ in length or are empty.
pub fn r_squared(y_true: &Vector<f64>, y_pred: &Vector<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let y_mean = y_true.mean();

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - (ss_res / ss_tot))
}

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true` - `y_pred)²`
///
/// # Examples
///
/// ```
/// use regsim::metrics::mse;
/// use regsim::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// assert!((mse(&y_true, &y_pred).unwrap() - 0.375).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Returns an error if the vectors differ in length or are empty.
pub fn mse(y_true: &Vector<f64>, y_pred: &Vector<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let sum_sq_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    Ok(sum_sq_error / y_true.len() as f64)
}

#[cfg(test)]
#[path = "tests_regression_contract.rs"]
mod tests_regression_contract;
