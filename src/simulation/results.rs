//! Aggregated per-method scores.

use serde::{Deserialize, Serialize};

/// Mean scores of one method, one entry per sample size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSeries {
    /// Method identifier, e.g. `"linearRegression"`
    pub method: String,
    /// Per-size mean scores in sample-size order
    pub scores: Vec<f64>,
}

/// Results keyed by method identifier, in the order methods were first
/// simulated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    series: Vec<MethodSeries>,
}

impl SimulationResults {
    /// Empty results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scores for `method`, replacing any previous entry in place.
    pub fn insert(&mut self, method: impl Into<String>, scores: Vec<f64>) {
        let method = method.into();
        if let Some(existing) = self.series.iter_mut().find(|s| s.method == method) {
            existing.scores = scores;
        } else {
            self.series.push(MethodSeries { method, scores });
        }
    }

    /// Scores recorded for `method`.
    #[must_use]
    pub fn get(&self, method: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.method == method)
            .map(|s| s.scores.as_slice())
    }

    /// Whether `method` has been simulated.
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.get(method).is_some()
    }

    /// Iterates over series in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MethodSeries> {
        self.series.iter()
    }

    /// Method identifiers in insertion order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.method.as_str())
    }

    /// Number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True when nothing has been simulated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
