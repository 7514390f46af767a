//! Regression trees and the random forest ensemble.
//!
//! This module implements:
//! - CART regression trees using the squared-error criterion
//! - Random Forest regressor (bagged trees, predictions averaged)
//!
//! # Example
//!
//! ```
//! use regsim::prelude::*;
//! use regsim::tree::RandomForestRegressor;
//!
//! let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).unwrap();
//! let y = Vector::from_slice(&[1.0, 1.0, 1.0, 5.0, 5.0, 5.0]);
//!
//! let mut rf = RandomForestRegressor::new(5).with_random_state(7);
//! rf.fit(&x, &y).unwrap();
//! let predictions = rf.predict(&x).unwrap();
//! assert_eq!(predictions.len(), 6);
//! ```

use crate::error::{RegsimError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Leaf node in a regression tree.
///
/// Contains the predicted value (mean of training targets) and number of
/// training samples that reached this leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf (mean of y values)
    pub value: f64,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f64,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn n_leaves(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 1,
            RegressionTreeNode::Node(node) => node.left.n_leaves() + node.right.n_leaves(),
        }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    node = if row[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

/// Decision tree regressor using the CART algorithm.
///
/// Splits minimise the summed squared error of the two children. Candidate
/// thresholds are midpoints between consecutive distinct feature values.
/// Leaf nodes predict the mean of their target values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionTreeNode>,
    n_features: usize,
    max_depth: Option<usize>,
}

impl DecisionTreeRegressor {
    /// Creates a new decision tree regressor with default parameters.
    pub fn new() -> Self {
        Self {
            tree: None,
            n_features: 0,
            max_depth: None,
        }
    }

    /// Sets the maximum depth of the tree (root has depth 0).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Returns the fitted tree root, if any.
    pub fn root(&self) -> Option<&RegressionTreeNode> {
        self.tree.as_ref()
    }

    /// Depth of the fitted tree, `None` before `fit`.
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(RegressionTreeNode::depth)
    }

    fn fit_indices(&mut self, x: &Matrix<f64>, y: &[f64], indices: Vec<usize>) {
        let builder = TreeBuilder {
            x,
            y,
            max_depth: self.max_depth,
        };
        self.n_features = x.n_cols();
        self.tree = Some(builder.build(indices, 0));
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for DecisionTreeRegressor {
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        validate_training_data(x, y)?;
        self.fit_indices(x, y.as_slice(), (0..x.n_rows()).collect());
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| RegsimError::NotFitted("DecisionTreeRegressor".into()))?;
        check_width(x, self.n_features)?;

        Ok(Vector::from_vec(
            (0..x.n_rows())
                .map(|row| tree.predict_row(x.row_slice(row)))
                .collect(),
        ))
    }
}

/// Random Forest Regressor.
///
/// Ensemble of decision tree regressors trained on bootstrap samples.
/// Predictions are averaged across all trees to reduce variance.
///
/// Tree `i` draws its bootstrap sample with seed `random_state + i`, so a
/// fixed `random_state` reproduces the forest exactly.
///
/// # Examples
///
/// ```
/// use regsim::prelude::*;
/// use regsim::tree::RandomForestRegressor;
///
/// let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);
///
/// let mut rf = RandomForestRegressor::new(10).with_max_depth(5).with_random_state(0);
/// rf.fit(&x, &y).unwrap();
/// let r2 = rf.score(&x, &y).unwrap();
/// assert!(r2 > 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
}

impl RandomForestRegressor {
    /// Creates a new Random Forest regressor with `n_estimators` trees.
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
        }
    }

    /// Sets the maximum depth for each tree.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the random state for reproducibility.
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Number of trees requested.
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Random state, if set.
    pub fn random_state(&self) -> Option<u64> {
        self.random_state
    }

    /// Fitted trees (empty before `fit`).
    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Estimator for RandomForestRegressor {
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(RegsimError::invalid_hyperparameter(
                "n_estimators",
                self.n_estimators,
                ">= 1",
            ));
        }
        validate_training_data(x, y)?;

        let n_samples = x.n_rows();
        let mut trees = Vec::with_capacity(self.n_estimators);

        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s.wrapping_add(i as u64));
            let bootstrap_indices = bootstrap_sample(n_samples, seed);

            let mut tree = DecisionTreeRegressor::new();
            if let Some(max_depth) = self.max_depth {
                tree = tree.with_max_depth(max_depth);
            }

            tree.fit_indices(x, y.as_slice(), bootstrap_indices);
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    /// Averages the predictions of all trees.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        if self.trees.is_empty() {
            return Err(RegsimError::NotFitted("RandomForestRegressor".into()));
        }

        let mut predictions = vec![0.0; x.n_rows()];
        for tree in &self.trees {
            let tree_preds = tree.predict(x)?;
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.iter()) {
                *pred += tree_pred;
            }
        }

        let n_trees = self.trees.len() as f64;
        for pred in &mut predictions {
            *pred /= n_trees;
        }

        Ok(Vector::from_vec(predictions))
    }
}

fn validate_training_data(x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(RegsimError::dimension_mismatch(
            "target length",
            x.n_rows(),
            y.len(),
        ));
    }
    if x.n_rows() == 0 {
        return Err(RegsimError::EmptyInput(
            "cannot fit a tree on zero samples".into(),
        ));
    }
    Ok(())
}

fn check_width(x: &Matrix<f64>, n_features: usize) -> Result<()> {
    if x.n_cols() != n_features {
        return Err(RegsimError::dimension_mismatch(
            "n_features",
            n_features,
            x.n_cols(),
        ));
    }
    Ok(())
}

/// Creates a bootstrap sample (random sample with replacement).
///
/// Returns indices of samples to include in the bootstrap sample.
fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::distributions::{Distribution, Uniform};
    use rand::SeedableRng;

    let dist = Uniform::from(0..n_samples);

    match random_state {
        Some(seed) => {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            (0..n_samples).map(|_| dist.sample(&mut rng)).collect()
        }
        None => {
            let mut rng = rand::thread_rng();
            (0..n_samples).map(|_| dist.sample(&mut rng)).collect()
        }
    }
}

/// Check if we've reached max depth.
fn at_max_depth(depth: usize, max_depth: Option<usize>) -> bool {
    max_depth.is_some_and(|max_d| depth >= max_d)
}

/// Best split found for a node.
struct Split {
    feature_idx: usize,
    threshold: f64,
    /// `Σleft²/n_left + Σright²/n_right`; larger means lower child SSE.
    proxy: f64,
}

/// Recursive CART builder over row indices into the shared training data.
///
/// Indices may repeat (bootstrap samples); every occurrence counts as a
/// sample.
struct TreeBuilder<'a> {
    x: &'a Matrix<f64>,
    y: &'a [f64],
    max_depth: Option<usize>,
}

impl TreeBuilder<'_> {
    fn build(&self, indices: Vec<usize>, depth: usize) -> RegressionTreeNode {
        let n_samples = indices.len();
        let (sum, sum_sq) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let v = self.y[i];
            (s + v, sq + v * v)
        });
        let n = n_samples as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);

        let leaf = || {
            RegressionTreeNode::Leaf(RegressionLeaf {
                value: mean,
                n_samples,
            })
        };

        if n_samples < 2
            || at_max_depth(depth, self.max_depth)
            || variance < 1e-10
        {
            return leaf();
        }

        let parent_proxy = sum * sum / n;
        let Some(split) = self.find_best_split(&indices, sum) else {
            return leaf();
        };
        if split.proxy <= parent_proxy {
            return leaf();
        }

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x.get(i, split.feature_idx) <= split.threshold);

        RegressionTreeNode::Node(RegressionNode {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left: Box::new(self.build(left, depth + 1)),
            right: Box::new(self.build(right, depth + 1)),
        })
    }

    /// Sort-and-sweep search over every feature.
    ///
    /// Ties keep the earliest feature and the lowest threshold.
    fn find_best_split(&self, indices: &[usize], total: f64) -> Option<Split> {
        let n_samples = indices.len();
        let mut best: Option<Split> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n_samples);

        for feature_idx in 0..self.x.n_cols() {
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x.get(i, feature_idx), self.y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for k in 1..n_samples {
                left_sum += column[k - 1].1;

                let (lo, hi) = (column[k - 1].0, column[k].0);
                if lo == hi {
                    continue;
                }

                let n_left = k as f64;
                let n_right = (n_samples - k) as f64;
                let right_sum = total - left_sum;
                let proxy = left_sum * left_sum / n_left + right_sum * right_sum / n_right;

                if best.as_ref().map_or(true, |b| proxy > b.proxy) {
                    let mid = (lo + hi) / 2.0;
                    // Rounding can land the midpoint on `hi`, which would send it left.
                    let threshold = if mid < hi { mid } else { lo };
                    best = Some(Split {
                        feature_idx,
                        threshold,
                        proxy,
                    });
                }
            }
        }

        best
    }
}
