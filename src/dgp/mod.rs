//! Synthetic data-generating processes (DGPs).
//!
//! A DGP maps `(seed, n)` to a [`Dataset`] under a fixed statistical model.
//! Both built-in processes draw from a single `StdRng` seeded with `seed`, in
//! this order:
//!
//! 1. `n` noise values `ε ~ N(0, 1)`
//! 2. the `n × k` feature matrix, row-major, `x ~ N(0, 3²)`
//!
//! so a given `(seed, n)` always yields the same dataset.
//!
//! # Example
//!
//! ```
//! use regsim::dgp::{DataGenerator, LinearDgp};
//!
//! let data = LinearDgp::new().generate(7, 50).expect("n > 0");
//! assert_eq!(data.x.shape(), (50, 3));
//! assert_eq!(data.y.len(), 50);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{RegsimError, Result};
use crate::primitives::{Matrix, Vector};

/// Default coefficients `[β0, β1, β2, β3]`.
pub const DEFAULT_BETA: [f64; 4] = [0.3, 5.0, 10.0, 15.0];

/// Standard deviation of every generated feature.
pub const FEATURE_STD: f64 = 3.0;

/// A feature matrix with its target vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Features, one row per observation
    pub x: Matrix<f64>,
    /// Targets
    pub y: Vector<f64>,
}

impl Dataset {
    /// Number of observations.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.y.len()
    }
}

/// A deterministic source of synthetic regression data.
pub trait DataGenerator: Send + Sync {
    /// Identifier used in logs and chart titles.
    fn name(&self) -> &str;

    /// Number of feature columns produced.
    fn n_features(&self) -> usize;

    /// Draws `n` observations using `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`RegsimError::EmptyInput`] when `n == 0`.
    fn generate(&self, seed: u64, n: usize) -> Result<Dataset>;
}

/// `y = β0 + β1·x1 + β2·x2 + β3·x3 + ε`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearDgp {
    beta: [f64; 4],
}

impl LinearDgp {
    /// Linear process with [`DEFAULT_BETA`].
    #[must_use]
    pub fn new() -> Self {
        Self { beta: DEFAULT_BETA }
    }

    /// Overrides the coefficients.
    #[must_use]
    pub fn with_beta(mut self, beta: [f64; 4]) -> Self {
        self.beta = beta;
        self
    }

    /// Current coefficients.
    #[must_use]
    pub fn beta(&self) -> [f64; 4] {
        self.beta
    }
}

impl Default for LinearDgp {
    fn default() -> Self {
        Self::new()
    }
}

impl DataGenerator for LinearDgp {
    fn name(&self) -> &str {
        "linearDGP"
    }

    fn n_features(&self) -> usize {
        3
    }

    fn generate(&self, seed: u64, n: usize) -> Result<Dataset> {
        let (noise, x) = draw(seed, n, self.n_features())?;
        let [b0, b1, b2, b3] = self.beta;

        let y: Vec<f64> = noise
            .iter()
            .enumerate()
            .map(|(i, &eps)| {
                let row = x.row_slice(i);
                b0 + b1 * row[0] + b2 * row[1] + b3 * row[2] + eps
            })
            .collect();

        Ok(Dataset {
            x,
            y: Vector::from_vec(y),
        })
    }
}

/// Piecewise-constant process over the signs of two features:
///
/// `y = β0 + β1·I(x1 ≥ 0, x2 ≥ 0) + β2·I(x1 ≥ 0, x2 < 0) + β3·I(x1 < 0) + ε`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonLinearDgp {
    beta: [f64; 4],
}

impl NonLinearDgp {
    /// Non-linear process with [`DEFAULT_BETA`].
    #[must_use]
    pub fn new() -> Self {
        Self { beta: DEFAULT_BETA }
    }

    /// Overrides the coefficients.
    #[must_use]
    pub fn with_beta(mut self, beta: [f64; 4]) -> Self {
        self.beta = beta;
        self
    }

    /// Current coefficients.
    #[must_use]
    pub fn beta(&self) -> [f64; 4] {
        self.beta
    }

    /// Noise-free regression function.
    #[must_use]
    pub fn signal(&self, x1: f64, x2: f64) -> f64 {
        let [b0, b1, b2, b3] = self.beta;
        if x1 < 0.0 {
            b0 + b3
        } else if x2 >= 0.0 {
            b0 + b1
        } else {
            b0 + b2
        }
    }
}

impl Default for NonLinearDgp {
    fn default() -> Self {
        Self::new()
    }
}

impl DataGenerator for NonLinearDgp {
    fn name(&self) -> &str {
        "nonLinearDGP"
    }

    fn n_features(&self) -> usize {
        2
    }

    fn generate(&self, seed: u64, n: usize) -> Result<Dataset> {
        let (noise, x) = draw(seed, n, self.n_features())?;

        let y: Vec<f64> = noise
            .iter()
            .enumerate()
            .map(|(i, &eps)| {
                let row = x.row_slice(i);
                self.signal(row[0], row[1]) + eps
            })
            .collect();

        Ok(Dataset {
            x,
            y: Vector::from_vec(y),
        })
    }
}

/// Noise first, then features, from one seeded stream.
fn draw(seed: u64, n: usize, k: usize) -> Result<(Vec<f64>, Matrix<f64>)> {
    if n == 0 {
        return Err(RegsimError::EmptyInput(
            "cannot generate a dataset with zero observations".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noise: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
    let features: Vec<f64> = (0..n * k)
        .map(|_| FEATURE_STD * rng.sample::<f64, _>(StandardNormal))
        .collect();

    let x = Matrix::from_vec(n, k, features)?;
    Ok((noise, x))
}

/// Selects one of the built-in processes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DgpKind {
    /// [`LinearDgp`]
    Linear,
    /// [`NonLinearDgp`]
    NonLinear,
}

impl DgpKind {
    /// Instantiates the process with default coefficients.
    #[must_use]
    pub fn build(self) -> Box<dyn DataGenerator> {
        match self {
            Self::Linear => Box::new(LinearDgp::new()),
            Self::NonLinear => Box::new(NonLinearDgp::new()),
        }
    }
}

impl fmt::Display for DgpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::NonLinear => write!(f, "nonlinear"),
        }
    }
}

impl FromStr for DgpKind {
    type Err = RegsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" | "lineardgp" => Ok(Self::Linear),
            "nonlinear" | "non-linear" | "nonlineardgp" => Ok(Self::NonLinear),
            other => Err(RegsimError::InvalidConfig(format!(
                "unknown DGP '{other}', expected 'linear' or 'nonlinear'"
            ))),
        }
    }
}
