//! Core compute primitives (Vector, Matrix).
//!
//! Row-major, `f64` throughout the estimators and generators.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
