//! Model selection utilities: K-Fold cross-validation and grid search.
//!
//! This module provides tools for:
//! - K-Fold index splitting
//! - Cross-validated scoring of any [`Estimator`]
//! - Exhaustive grid search over a list of candidate hyperparameters

use crate::error::{RegsimError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Results from cross-validation.
#[derive(Debug, Clone)]
pub struct CrossValidationResult {
    /// Score for each fold
    pub scores: Vec<f64>,
}

impl CrossValidationResult {
    /// Calculate mean score across folds
    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Calculate standard deviation of scores
    pub fn std(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .scores
            .iter()
            .map(|&score| (score - mean).powi(2))
            .sum::<f64>()
            / self.scores.len() as f64;
        variance.sqrt()
    }
}

/// Run cross-validation on an estimator.
///
/// A fresh clone of `estimator` is fitted on each training fold and scored
/// (R²) on the held-out fold.
///
/// # Example
///
/// ```rust
/// use regsim::prelude::*;
/// use regsim::model_selection::{cross_validate, KFold};
///
/// let x = Matrix::from_vec(50, 1, (0..50).map(f64::from).collect()).unwrap();
/// let y = Vector::from_vec((0..50).map(|i| 2.0 * f64::from(i) + 1.0).collect());
///
/// let results = cross_validate(&LinearRegression::new(), &x, &y, &KFold::new(5)).unwrap();
/// assert!(results.mean() > 0.99);
/// ```
///
/// # Errors
///
/// Propagates split, fit and scoring errors from any fold.
pub fn cross_validate<E>(
    estimator: &E,
    x: &Matrix<f64>,
    y: &Vector<f64>,
    cv: &KFold,
) -> Result<CrossValidationResult>
where
    E: Estimator + Clone,
{
    if x.n_rows() != y.len() {
        return Err(RegsimError::dimension_mismatch(
            "target length",
            x.n_rows(),
            y.len(),
        ));
    }

    let splits = cv.split(x.n_rows())?;
    let mut scores = Vec::with_capacity(splits.len());

    for (train_idx, test_idx) in splits {
        let x_train = x.select_rows(&train_idx);
        let y_train = y.select(&train_idx);
        let x_test = x.select_rows(&test_idx);
        let y_test = y.select(&test_idx);

        let mut fold_model = estimator.clone();
        fold_model.fit(&x_train, &y_train)?;
        scores.push(fold_model.score(&x_test, &y_test)?);
    }

    Ok(CrossValidationResult { scores })
}

/// K-Fold cross-validator.
///
/// Splits data into K consecutive folds. Each fold is used once as test set
/// while the remaining K-1 folds form the training set. The first
/// `n_samples % K` folds get one extra sample.
///
/// # Example
///
/// ```rust
/// use regsim::model_selection::KFold;
///
/// let kfold = KFold::new(5);
/// for (train_idx, test_idx) in kfold.split(10).unwrap() {
///     assert_eq!(train_idx.len() + test_idx.len(), 10);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    /// Create a new K-Fold cross-validator with `n_splits` folds.
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// Number of folds.
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate train/test indices for each fold.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_splits < 2` or there are fewer samples than
    /// folds.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(RegsimError::invalid_hyperparameter(
                "n_splits",
                self.n_splits,
                ">= 2",
            ));
        }
        if n_samples < self.n_splits {
            return Err(RegsimError::invalid_hyperparameter(
                "n_samples",
                n_samples,
                &format!(">= n_splits ({})", self.n_splits),
            ));
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut result = Vec::with_capacity(self.n_splits);
        let mut start = 0;

        for i in 0..self.n_splits {
            let current_fold_size = if i < remainder {
                fold_size + 1
            } else {
                fold_size
            };
            let end = start + current_fold_size;

            let test_indices: Vec<usize> = (start..end).collect();
            let train_indices: Vec<usize> = (0..start).chain(end..n_samples).collect();

            result.push((train_indices, test_indices));
            start = end;
        }

        Ok(result)
    }
}

/// Grid search result containing the best candidate and every score.
#[derive(Debug, Clone)]
pub struct GridSearchResult<P> {
    /// Best candidate found
    pub best_param: P,
    /// Mean cross-validation score of the best candidate
    pub best_score: f64,
    /// All candidates tried, in order
    pub params: Vec<P>,
    /// Mean cross-validation score for each candidate
    pub scores: Vec<f64>,
}

impl<P> GridSearchResult<P> {
    /// Returns the index of the best candidate (first one on ties).
    pub fn best_index(&self) -> usize {
        let mut best = 0;
        for (idx, &score) in self.scores.iter().enumerate() {
            if score > self.scores[best] {
                best = idx;
            }
        }
        best
    }
}

/// Exhaustive grid search over candidate hyperparameters.
///
/// `build` turns a candidate into an unfitted estimator; each one is scored by
/// the mean R² of [`cross_validate`]. The earliest candidate wins ties.
///
/// # Example
///
/// ```rust
/// use regsim::prelude::*;
/// use regsim::model_selection::{grid_search, KFold};
/// use regsim::tree::RandomForestRegressor;
///
/// let x = Matrix::from_vec(20, 1, (0..20).map(f64::from).collect()).unwrap();
/// let y = Vector::from_vec((0..20).map(|i| if i < 10 { 0.0 } else { 1.0 }).collect());
///
/// let result = grid_search(
///     &[1usize, 2, 3],
///     |&n| RandomForestRegressor::new(n).with_random_state(0),
///     &x,
///     &y,
///     &KFold::new(5),
/// )
/// .unwrap();
/// assert_eq!(result.scores.len(), 3);
/// ```
///
/// # Errors
///
/// Returns an error if `params` is empty, or propagates any fold failure.
pub fn grid_search<P, E, F>(
    params: &[P],
    mut build: F,
    x: &Matrix<f64>,
    y: &Vector<f64>,
    cv: &KFold,
) -> Result<GridSearchResult<P>>
where
    P: Clone,
    E: Estimator + Clone,
    F: FnMut(&P) -> E,
{
    if params.is_empty() {
        return Err(RegsimError::EmptyInput(
            "grid search needs at least one candidate".into(),
        ));
    }

    let mut scores = Vec::with_capacity(params.len());
    for param in params {
        let estimator = build(param);
        scores.push(cross_validate(&estimator, x, y, cv)?.mean());
    }

    let mut result = GridSearchResult {
        best_param: params[0].clone(),
        best_score: scores[0],
        params: params.to_vec(),
        scores,
    };
    let best = result.best_index();
    result.best_param = result.params[best].clone();
    result.best_score = result.scores[best];

    Ok(result)
}

#[cfg(test)]
#[path = "tests_kfold_contract.rs"]
mod tests_kfold_contract;
