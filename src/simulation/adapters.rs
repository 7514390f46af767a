//! Built-in estimator adapters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FittedModel, ModelAdapter};
use crate::error::{RegsimError, Result};
use crate::linear_model::LinearRegression;
use crate::model_selection::{grid_search, KFold};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use crate::tree::RandomForestRegressor;

/// Ordinary least squares with an intercept. The seed is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsAdapter;

impl OlsAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ModelAdapter for OlsAdapter {
    fn name(&self) -> &str {
        "linearRegression"
    }

    fn fit(&self, x: &Matrix<f64>, y: &Vector<f64>, _seed: u64) -> Result<Box<dyn FittedModel>> {
        let mut model = LinearRegression::new();
        model.fit(x, y)?;
        Ok(Box::new(model))
    }
}

/// Random forest whose size is tuned by K-fold grid search.
///
/// Every candidate `n_estimators` in `1..=max_estimators` is scored by mean
/// cross-validated R²; the winner (smallest on ties) is refit on all of the
/// data. All forests are seeded with the iteration seed.
#[derive(Debug, Clone)]
pub struct RandomForestCv {
    max_estimators: usize,
    n_folds: usize,
}

impl RandomForestCv {
    /// Grid `1..=10`, 5 folds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_estimators: 10,
            n_folds: 5,
        }
    }

    /// Upper end of the `n_estimators` grid.
    #[must_use]
    pub fn with_max_estimators(mut self, max_estimators: usize) -> Self {
        self.max_estimators = max_estimators;
        self
    }

    /// Number of cross-validation folds.
    #[must_use]
    pub fn with_n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    /// Candidate forest sizes.
    #[must_use]
    pub fn grid(&self) -> Vec<usize> {
        (1..=self.max_estimators).collect()
    }
}

impl Default for RandomForestCv {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelAdapter for RandomForestCv {
    fn name(&self) -> &str {
        "randomForestCV"
    }

    fn fit(&self, x: &Matrix<f64>, y: &Vector<f64>, seed: u64) -> Result<Box<dyn FittedModel>> {
        if self.max_estimators == 0 {
            return Err(RegsimError::invalid_hyperparameter(
                "max_estimators",
                self.max_estimators,
                ">= 1",
            ));
        }

        let search = grid_search(
            &self.grid(),
            |&n| RandomForestRegressor::new(n).with_random_state(seed),
            x,
            y,
            &KFold::new(self.n_folds),
        )?;
        debug!(
            seed,
            n_estimators = search.best_param,
            cv_r2 = search.best_score,
            "forest grid search done"
        );

        let mut forest = RandomForestRegressor::new(search.best_param).with_random_state(seed);
        forest.fit(x, y)?;
        Ok(Box::new(forest))
    }
}

/// Selects a built-in adapter by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// [`OlsAdapter`]
    Ols,
    /// [`RandomForestCv`]
    Forest,
}

impl MethodKind {
    /// Instantiates the adapter with default settings.
    #[must_use]
    pub fn build(self) -> Box<dyn ModelAdapter> {
        match self {
            Self::Ols => Box::new(OlsAdapter::new()),
            Self::Forest => Box::new(RandomForestCv::new()),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ols => write!(f, "ols"),
            Self::Forest => write!(f, "forest"),
        }
    }
}

impl FromStr for MethodKind {
    type Err = RegsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ols" | "linear" | "linearregression" => Ok(Self::Ols),
            "forest" | "rf" | "randomforestcv" => Ok(Self::Forest),
            other => Err(RegsimError::InvalidConfig(format!(
                "unknown method '{other}', expected 'ols' or 'forest'"
            ))),
        }
    }
}
