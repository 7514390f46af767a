//! Monte Carlo comparison of regression methods across sample sizes.
//!
//! For every configured sample size `s` the driver draws one test set with
//! seed `s`, then for each iteration `i` draws a training set of `s` rows with
//! seed `i`, fits the method with seed `i` and scores it on the test set. The
//! per-size aggregate is the mean over iterations.
//!
//! # Example
//!
//! ```
//! use regsim::dgp::LinearDgp;
//! use regsim::simulation::{Evaluation, MonteCarloSimulation, OlsAdapter};
//!
//! let mut sim = MonteCarloSimulation::new(Box::new(LinearDgp::new()), vec![50, 200])
//!     .expect("sizes are positive");
//! sim.simulate(&OlsAdapter::new(), 3, Evaluation::Rss).expect("OLS fits");
//!
//! let rss = sim.results().get("linearRegression").expect("simulated");
//! assert_eq!(rss.len(), 2);
//! assert!(rss.iter().all(|&v| v >= 0.0));
//! ```

mod adapters;
mod history;
mod results;

pub use adapters::{MethodKind, OlsAdapter, RandomForestCv};
pub use history::{HistoryEntry, ModelHistory, DEFAULT_HISTORY_CAPACITY};
pub use results::{MethodSeries, SimulationResults};

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dgp::{DataGenerator, Dataset};
use crate::error::{RegsimError, Result};
use crate::metrics::mse;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Observations in every test set.
pub const DEFAULT_TEST_SIZE: usize = 100;

/// How a fitted model is scored against the test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Evaluation {
    /// Coefficient of determination via the model's own `score`
    #[default]
    R2,
    /// Mean squared error of the model's predictions
    Rss,
}

impl Evaluation {
    /// Scores `model` on `test`.
    ///
    /// # Errors
    ///
    /// Propagates prediction and metric errors.
    pub fn score(self, model: &dyn FittedModel, test: &Dataset) -> Result<f64> {
        match self {
            Self::R2 => model.score(&test.x, &test.y),
            Self::Rss => {
                let predictions = model.predict(&test.x)?;
                mse(&test.y, &predictions)
            }
        }
    }

    /// Whether larger scores are better.
    #[must_use]
    pub fn higher_is_better(self) -> bool {
        matches!(self, Self::R2)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::R2 => write!(f, "R2"),
            Self::Rss => write!(f, "RSS"),
        }
    }
}

impl FromStr for Evaluation {
    type Err = RegsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "R2" => Ok(Self::R2),
            "RSS" => Ok(Self::Rss),
            other => Err(RegsimError::UnsupportedEvaluation(other.to_string())),
        }
    }
}

impl TryFrom<String> for Evaluation {
    type Error = RegsimError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Evaluation> for String {
    fn from(value: Evaluation) -> Self {
        value.to_string()
    }
}

/// A fitted model as seen by the driver.
pub trait FittedModel: Send {
    /// Predicts targets for `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>>;

    /// R² on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error on dimension mismatch.
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64>;
}

impl<E: Estimator + Send> FittedModel for E {
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        Estimator::predict(self, x)
    }

    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        Estimator::score(self, x, y)
    }
}

/// Turns training data and a seed into a fitted model.
pub trait ModelAdapter: Send + Sync {
    /// Method identifier used as the results key.
    fn name(&self) -> &str;

    /// Fits a fresh model.
    ///
    /// # Errors
    ///
    /// Propagates any estimator failure.
    fn fit(&self, x: &Matrix<f64>, y: &Vector<f64>, seed: u64) -> Result<Box<dyn FittedModel>>;
}

/// The Monte Carlo driver.
pub struct MonteCarloSimulation {
    dgp: Box<dyn DataGenerator>,
    sample_sizes: Vec<usize>,
    test_size: usize,
    results: SimulationResults,
    history: ModelHistory,
}

impl fmt::Debug for MonteCarloSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonteCarloSimulation")
            .field("dgp", &self.dgp.name())
            .field("sample_sizes", &self.sample_sizes)
            .field("test_size", &self.test_size)
            .field("results", &self.results)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl MonteCarloSimulation {
    /// Creates a driver for `dgp` over `sample_sizes`.
    ///
    /// # Errors
    ///
    /// Returns [`RegsimError::InvalidConfig`] if `sample_sizes` is empty or
    /// contains zero.
    pub fn new(dgp: Box<dyn DataGenerator>, sample_sizes: Vec<usize>) -> Result<Self> {
        if sample_sizes.is_empty() {
            return Err(RegsimError::InvalidConfig(
                "at least one sample size is required".into(),
            ));
        }
        if let Some(pos) = sample_sizes.iter().position(|&s| s == 0) {
            return Err(RegsimError::InvalidConfig(format!(
                "sample size at position {pos} is zero"
            )));
        }

        Ok(Self {
            dgp,
            sample_sizes,
            test_size: DEFAULT_TEST_SIZE,
            results: SimulationResults::new(),
            history: ModelHistory::default(),
        })
    }

    /// Overrides the test-set size.
    #[must_use]
    pub fn with_test_size(mut self, test_size: usize) -> Self {
        self.test_size = test_size;
        self
    }

    /// Overrides how many fitted models are retained.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = ModelHistory::with_capacity(capacity);
        self
    }

    /// Runs `simulation_num` iterations of `method` at every sample size and
    /// stores the per-size means under `method.name()`.
    ///
    /// The results entry is only written once every size has completed, so a
    /// failure leaves any earlier entry for the method untouched. Fitted
    /// models enter the history as their iteration finishes, including those
    /// fitted before a failure.
    ///
    /// # Errors
    ///
    /// Returns [`RegsimError::InvalidHyperparameter`] if `simulation_num` is
    /// zero; otherwise propagates the first DGP, fit or scoring error.
    pub fn simulate(
        &mut self,
        method: &dyn ModelAdapter,
        simulation_num: usize,
        evaluate: Evaluation,
    ) -> Result<()> {
        if simulation_num == 0 {
            return Err(RegsimError::invalid_hyperparameter(
                "simulation_num",
                simulation_num,
                ">= 1",
            ));
        }

        info!(
            dgp = self.dgp.name(),
            method = method.name(),
            simulation_num,
            evaluate = %evaluate,
            "starting simulation"
        );

        let mut means = Vec::with_capacity(self.sample_sizes.len());
        for idx in 0..self.sample_sizes.len() {
            let size = self.sample_sizes[idx];
            let test = self.dgp.generate(size as u64, self.test_size)?;

            let total = run_size(
                self.dgp.as_ref(),
                &mut self.history,
                method,
                size,
                simulation_num,
                evaluate,
                &test,
            )?;
            let mean = total / simulation_num as f64;

            info!(method = method.name(), size, mean, "sample size done");
            means.push(mean);
        }

        self.results.insert(method.name(), means);
        Ok(())
    }

    /// Per-method mean scores.
    #[must_use]
    pub fn results(&self) -> &SimulationResults {
        &self.results
    }

    /// Consumes the driver, keeping only the results.
    #[must_use]
    pub fn into_results(self) -> SimulationResults {
        self.results
    }

    /// Fitted models retained so far.
    #[must_use]
    pub fn history(&self) -> &ModelHistory {
        &self.history
    }

    /// Configured sample sizes, in order.
    #[must_use]
    pub fn sample_sizes(&self) -> &[usize] {
        &self.sample_sizes
    }

    /// Rows in each test set.
    #[must_use]
    pub fn test_size(&self) -> usize {
        self.test_size
    }

    /// Name of the data-generating process.
    #[must_use]
    pub fn dgp_name(&self) -> &str {
        self.dgp.name()
    }
}

/// Runs every iteration at one sample size, recording each fitted model.
/// Returns the summed score.
#[cfg(not(feature = "parallel"))]
fn run_size(
    dgp: &dyn DataGenerator,
    history: &mut ModelHistory,
    method: &dyn ModelAdapter,
    size: usize,
    simulation_num: usize,
    evaluate: Evaluation,
    test: &Dataset,
) -> Result<f64> {
    let mut total = 0.0;
    for iteration in 0..simulation_num {
        let (score, model) = run_iteration(dgp, method, size, iteration, evaluate, test)?;
        total += score;
        history.push(HistoryEntry {
            method: method.name().to_string(),
            sample_size: size,
            iteration,
            model,
        });
    }
    Ok(total)
}

/// Parallel twin of the sequential `run_size`: iterations fit on the rayon
/// pool, then models are recorded in iteration order up to the first failure.
#[cfg(feature = "parallel")]
fn run_size(
    dgp: &dyn DataGenerator,
    history: &mut ModelHistory,
    method: &dyn ModelAdapter,
    size: usize,
    simulation_num: usize,
    evaluate: Evaluation,
    test: &Dataset,
) -> Result<f64> {
    let runs: Vec<Result<(f64, Box<dyn FittedModel>)>> = (0..simulation_num)
        .into_par_iter()
        .map(|iteration| run_iteration(dgp, method, size, iteration, evaluate, test))
        .collect();

    let mut total = 0.0;
    for (iteration, run) in runs.into_iter().enumerate() {
        let (score, model) = run?;
        total += score;
        history.push(HistoryEntry {
            method: method.name().to_string(),
            sample_size: size,
            iteration,
            model,
        });
    }
    Ok(total)
}

fn run_iteration(
    dgp: &dyn DataGenerator,
    method: &dyn ModelAdapter,
    size: usize,
    iteration: usize,
    evaluate: Evaluation,
    test: &Dataset,
) -> Result<(f64, Box<dyn FittedModel>)> {
    let seed = iteration as u64;
    let train = dgp.generate(seed, size)?;
    let model = method.fit(&train.x, &train.y, seed)?;
    let score = evaluate.score(model.as_ref(), test)?;
    debug!(method = method.name(), size, iteration, score, "iteration scored");
    Ok((score, model))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
