//! Error types for regsim operations.
//!
//! Every failure inside the library surfaces as a [`RegsimError`]; nothing is
//! caught or retried on the way up to the caller of
//! [`MonteCarloSimulation::simulate`](crate::simulation::MonteCarloSimulation::simulate).

use thiserror::Error;

/// Main error type for regsim operations.
///
/// # Examples
///
/// ```
/// use regsim::error::RegsimError;
///
/// let err = RegsimError::DimensionMismatch {
///     expected: "100x3".to_string(),
///     actual: "100x2".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum RegsimError {
    /// Matrix/vector dimensions don't match for the operation.
    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Linear system could not be solved (matrix not positive definite).
    #[error("Singular matrix detected in {context}, cannot solve")]
    SingularMatrix {
        /// Where the singular system arose
        context: String,
    },

    /// An operation received no data to work with.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Invalid hyperparameter value provided.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Prediction or scoring requested before `fit`.
    #[error("{0} is not fitted, call fit() first")]
    NotFitted(String),

    /// Evaluation mode other than `R2` or `RSS`.
    #[error("Unsupported evaluation mode '{0}', expected 'R2' or 'RSS'")]
    UnsupportedEvaluation(String),

    /// Experiment or driver configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while writing reports or reading plans.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RegsimError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an invalid hyperparameter error
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

impl From<serde_json::Error> for RegsimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RegsimError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, RegsimError>;
