//! Bounded record of every model fitted by the driver.

use std::collections::VecDeque;
use std::fmt;

use tracing::warn;

use super::FittedModel;

/// Default number of models retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// One fitted model and where it came from.
pub struct HistoryEntry {
    /// Method identifier
    pub method: String,
    /// Training sample size
    pub sample_size: usize,
    /// Monte Carlo iteration (also the training seed)
    pub iteration: usize,
    /// The fitted model
    pub model: Box<dyn FittedModel>,
}

impl fmt::Debug for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("method", &self.method)
            .field("sample_size", &self.sample_size)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

/// FIFO buffer of fitted models; the oldest entry is dropped once full.
#[derive(Debug)]
pub struct ModelHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    evicted: usize,
}

impl ModelHistory {
    /// History holding at most `capacity` models. Zero disables recording.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
            evicted: 0,
        }
    }

    /// Records an entry, evicting the oldest if at capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            if self.evicted == 0 {
                warn!(
                    capacity = self.capacity,
                    "model history full, evicting oldest entries"
                );
            }
            self.evicted += 1;
        }
        self.entries.push_back(entry);
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Most recently recorded entry.
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of models dropped so far.
    #[must_use]
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ModelHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::LinearRegression;

    fn entry(iteration: usize) -> HistoryEntry {
        HistoryEntry {
            method: "linearRegression".into(),
            sample_size: 10,
            iteration,
            model: Box::new(LinearRegression::new()),
        }
    }

    #[test]
    fn test_push_within_capacity() {
        let mut history = ModelHistory::with_capacity(3);
        history.push(entry(0));
        history.push(entry(1));
        assert_eq!(history.len(), 2);
        assert_eq!(history.evicted(), 0);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut history = ModelHistory::with_capacity(2);
        for i in 0..5 {
            history.push(entry(i));
        }
        let kept: Vec<usize> = history.iter().map(|e| e.iteration).collect();
        assert_eq!(kept, vec![3, 4]);
        assert_eq!(history.evicted(), 3);
        assert_eq!(history.last().map(|e| e.iteration), Some(4));
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut history = ModelHistory::with_capacity(0);
        history.push(entry(0));
        assert!(history.is_empty());
        assert_eq!(history.evicted(), 1);
    }

    #[test]
    fn test_debug_omits_model() {
        let text = format!("{:?}", entry(7));
        assert!(text.contains("iteration: 7"));
    }
}
