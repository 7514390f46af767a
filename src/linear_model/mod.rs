//! Linear models for regression.
//!
//! Includes Ordinary Least Squares (OLS) linear regression.

use crate::error::{RegsimError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets:
///
/// ```text
/// y = X β + β0 + ε
/// ```
///
/// # Solver
///
/// Normal equations `(XcᵀXc) β = Xcᵀyc` on column-centred data, solved by
/// Cholesky decomposition; the intercept is recovered from the means.
/// Centring keeps the Gram matrix well conditioned when features are far from
/// zero.
///
/// # Examples
///
/// ```
/// use regsim::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// assert!((model.coefficients().unwrap()[0] - 2.0).abs() < 1e-9);
/// assert!((model.intercept() - 1.0).abs() < 1e-9);
/// ```
///
/// # Performance
///
/// - Time complexity: O(np² + p³) where n = samples, p = features
/// - Space complexity: O(p²) beyond the input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f64>>,
    /// Intercept (bias) term.
    intercept: f64,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns the coefficients (excluding intercept), if fitted.
    #[must_use]
    pub fn coefficients(&self) -> Option<&Vector<f64>> {
        self.coefficients.as_ref()
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Accumulates `XcᵀXc` and `Xcᵀyc` in a single pass over the rows.
    fn normal_equations(
        x: &Matrix<f64>,
        y: &Vector<f64>,
        x_means: &[f64],
        y_mean: f64,
    ) -> Result<(Matrix<f64>, Vector<f64>)> {
        let p = x.n_cols();
        let mut gram = vec![0.0; p * p];
        let mut xty = vec![0.0; p];
        let mut centred = vec![0.0; p];

        for i in 0..x.n_rows() {
            for ((c, &v), &m) in centred.iter_mut().zip(x.row_slice(i)).zip(x_means) {
                *c = v - m;
            }
            let yc = y[i] - y_mean;
            for a in 0..p {
                xty[a] += centred[a] * yc;
                for b in a..p {
                    gram[a * p + b] += centred[a] * centred[b];
                }
            }
        }

        for a in 0..p {
            for b in 0..a {
                gram[a * p + b] = gram[b * p + a];
            }
        }

        Ok((Matrix::from_vec(p, p, gram)?, Vector::from_vec(xty)))
    }
}

impl Estimator for LinearRegression {
    /// Fits the linear regression model using normal equations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input dimensions don't match
    /// - Not enough samples for the number of features (underdetermined system)
    /// - The Gram matrix is singular (collinear or constant features)
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err(RegsimError::dimension_mismatch(
                "target length",
                n_samples,
                y.len(),
            ));
        }

        if n_samples == 0 {
            return Err(RegsimError::EmptyInput(
                "LinearRegression cannot fit zero samples".into(),
            ));
        }

        // With an intercept we need n_samples >= n_features + 1.
        let required_samples = if self.fit_intercept {
            n_features + 1
        } else {
            n_features
        };

        if n_samples < required_samples {
            return Err(RegsimError::InvalidHyperparameter {
                param: "n_samples".to_string(),
                value: n_samples.to_string(),
                constraint: format!(
                    ">= {required_samples} samples for {n_features} features (underdetermined system)"
                ),
            });
        }

        if n_features == 0 {
            self.intercept = if self.fit_intercept { y.mean() } else { 0.0 };
            self.coefficients = Some(Vector::from_vec(Vec::new()));
            return Ok(());
        }

        let (x_means, y_mean) = if self.fit_intercept {
            (x.column_means(), y.mean())
        } else {
            (vec![0.0; n_features], 0.0)
        };

        let (gram, xty) = Self::normal_equations(x, y, &x_means, y_mean)?;
        let beta = gram
            .cholesky_solve(&xty)
            .map_err(|err| match err {
                RegsimError::SingularMatrix { .. } => RegsimError::SingularMatrix {
                    context: "OLS normal equations (collinear or constant features)".into(),
                },
                other => other,
            })?;

        self.intercept = if self.fit_intercept {
            y_mean
                - beta
                    .iter()
                    .zip(x_means.iter())
                    .map(|(b, m)| b * m)
                    .sum::<f64>()
        } else {
            0.0
        };
        self.coefficients = Some(beta);

        Ok(())
    }

    /// Predicts target values for input data.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or_else(|| RegsimError::NotFitted("LinearRegression".into()))?;

        if x.n_cols() != coefficients.len() {
            return Err(RegsimError::dimension_mismatch(
                "n_features",
                coefficients.len(),
                x.n_cols(),
            ));
        }

        Ok(x.matvec(coefficients)?.add_scalar(self.intercept))
    }
}
