//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use regsim::prelude::*;
//! ```

pub use crate::dgp::{DataGenerator, Dataset, DgpKind, LinearDgp, NonLinearDgp};
pub use crate::error::RegsimError;
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::{mse, r_squared};
pub use crate::primitives::{Matrix, Vector};
pub use crate::simulation::{
    Evaluation, MethodKind, ModelAdapter, MonteCarloSimulation, OlsAdapter, RandomForestCv,
    SimulationResults,
};
pub use crate::traits::Estimator;
pub use crate::tree::{DecisionTreeRegressor, RandomForestRegressor};
