//! Regsim: Monte Carlo comparison of random forests and OLS regression.
//!
//! Regsim draws synthetic data from a data-generating process, fits each
//! candidate method on training sets of increasing size, scores it on a fixed
//! test set and averages the scores over repeated simulations.
//!
//! # Quick Start
//!
//! ```
//! use regsim::prelude::*;
//!
//! let mut sim = MonteCarloSimulation::new(Box::new(LinearDgp::new()), vec![100, 1000])
//!     .unwrap();
//! sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss).unwrap();
//!
//! let rss = sim.results().get("linearRegression").unwrap();
//! assert_eq!(rss.len(), 2);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`linear_model`]: Ordinary least squares
//! - [`tree`]: Regression trees and random forests
//! - [`metrics`]: R² and mean squared error
//! - [`model_selection`]: K-Fold cross-validation and grid search
//! - [`dgp`]: Synthetic data-generating processes
//! - [`simulation`]: The Monte Carlo driver and estimator adapters
//! - [`report`]: SVG charts and tabular summaries
//! - [`config`]: TOML experiment plans

pub mod config;
pub mod dgp;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod prelude;
pub mod primitives;
pub mod report;
pub mod simulation;
pub mod traits;
pub mod tree;

pub use error::{RegsimError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::Estimator;
