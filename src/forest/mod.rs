//! Decision tree and random forest binary classifiers.
//!
//! CART trees split on Gini impurity with midpoint thresholds; the forest
//! trains each tree on a seeded bootstrap sample and predicts by majority
//! vote. With a fixed seed the fitted forest, and therefore every
//! prediction, is identical across runs.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

mod helpers;

use helpers::{best_split, class_counts, majority_label, partition_indices};

/// Errors raised when fitting a model.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("cannot fit with zero samples")]
    EmptyTrainingSet,

    #[error("feature matrix has {rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("label at sample {index} is not binary")]
    NonBinaryLabel { index: usize },
}

fn check_binary_labels(y: &[usize]) -> Result<(), FitError> {
    match y.iter().position(|&label| label > 1) {
        Some(index) => Err(FitError::NonBinaryLabel { index }),
        None => Ok(()),
    }
}

/// A node in a fitted decision tree.
#[derive(Debug, Clone)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        label: usize,
    },
}

impl TreeNode {
    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// CART binary classifier.
#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    max_depth: Option<usize>,
}

impl DecisionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Fit on the rows of `x` selected by `indices` (repeats allowed, so a
    /// bootstrap sample needs no matrix copy).
    fn fit_on_indices(
        &mut self,
        x: &ArrayView2<'_, f32>,
        y: &[usize],
        indices: &[usize],
    ) -> Result<(), FitError> {
        if indices.is_empty() {
            return Err(FitError::EmptyTrainingSet);
        }
        check_binary_labels(y)?;
        self.root = Some(build_tree(x, y, indices, 0, self.max_depth));
        Ok(())
    }

    /// Fit on the full training set.
    pub fn fit(&mut self, x: &ArrayView2<'_, f32>, y: &[usize]) -> Result<(), FitError> {
        if x.nrows() != y.len() {
            return Err(FitError::LengthMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.fit_on_indices(x, y, &indices)
    }

    /// Predict the label for one feature vector.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit`.
    pub fn predict_row(&self, row: &ArrayView1<'_, f32>) -> usize {
        let mut node = self.root.as_ref().expect("tree not fitted");
        loop {
            match node {
                TreeNode::Leaf { label } => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Depth of the fitted tree (0 for a single leaf).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }
}

fn build_tree(
    x: &ArrayView2<'_, f32>,
    y: &[usize],
    indices: &[usize],
    depth: usize,
    max_depth: Option<usize>,
) -> TreeNode {
    let counts = class_counts(y, indices);
    let leaf = |counts: [usize; 2]| TreeNode::Leaf {
        label: majority_label(counts),
    };

    // Pure node
    if counts[0] == 0 || counts[1] == 0 {
        return leaf(counts);
    }
    // Depth limit
    if let Some(max_d) = max_depth {
        if depth >= max_d {
            return leaf(counts);
        }
    }
    // No split improves impurity
    let Some((feature, threshold)) = best_split(x, y, indices) else {
        return leaf(counts);
    };

    let (left_idx, right_idx) = partition_indices(x, indices, feature, threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return leaf(counts);
    }

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(build_tree(x, y, &left_idx, depth + 1, max_depth)),
        right: Box::new(build_tree(x, y, &right_idx, depth + 1, max_depth)),
    }
}

/// Bootstrap-aggregated ensemble of decision trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_trees: usize,
    max_depth: Option<usize>,
    seed: u64,
}

impl RandomForest {
    /// Create an unfitted forest with the given number of trees.
    pub fn new(n_trees: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_trees,
            max_depth: None,
            seed: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Seed for the per-tree bootstrap sampling. Tree `i` draws its sample
    /// from an RNG seeded with `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Fit every tree on its own bootstrap sample of the training data.
    pub fn fit(&mut self, x: &ArrayView2<'_, f32>, y: &[usize]) -> Result<(), FitError> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(FitError::EmptyTrainingSet);
        }
        if n_samples != y.len() {
            return Err(FitError::LengthMismatch {
                rows: n_samples,
                labels: y.len(),
            });
        }
        check_binary_labels(y)?;

        self.trees = Vec::with_capacity(self.n_trees);
        for i in 0..self.n_trees {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i as u64));
            let sample: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

            let mut tree = match self.max_depth {
                Some(depth) => DecisionTree::new().with_max_depth(depth),
                None => DecisionTree::new(),
            };
            tree.fit_on_indices(x, y, &sample)?;
            self.trees.push(tree);
        }
        Ok(())
    }

    /// Majority vote over all trees for one feature vector.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit`.
    pub fn predict_row(&self, row: &ArrayView1<'_, f32>) -> usize {
        assert!(!self.trees.is_empty(), "forest not fitted");
        let mut votes = [0usize; 2];
        for tree in &self.trees {
            votes[tree.predict_row(row)] += 1;
        }
        majority_label(votes)
    }

    /// Predict labels for every row of a feature matrix.
    pub fn predict(&self, x: &ArrayView2<'_, f32>) -> Vec<usize> {
        x.rows().into_iter().map(|row| self.predict_row(&row)).collect()
    }

    /// Fraction of correct predictions on labeled data.
    pub fn score(&self, x: &ArrayView2<'_, f32>, y: &[usize]) -> f32 {
        let predictions = self.predict(x);
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, truth)| pred == truth)
            .count();
        correct as f32 / y.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable_data() -> (ndarray::Array2<f32>, Vec<usize>) {
        // Two well-separated clusters on both features
        let x = array![
            [1.0, 1.2],
            [0.8, 0.9],
            [1.1, 1.0],
            [0.9, 1.1],
            [5.0, 5.2],
            [4.8, 4.9],
            [5.1, 5.0],
            [4.9, 5.1],
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_tree_fits_separable_data() {
        let (x, y) = separable_data();
        let mut tree = DecisionTree::new();
        tree.fit(&x.view(), &y).expect("fit");

        for (row, &label) in x.rows().into_iter().zip(&y) {
            assert_eq!(tree.predict_row(&row), label);
        }
    }

    #[test]
    fn test_tree_max_depth_limits_growth() {
        let (x, y) = separable_data();
        let mut tree = DecisionTree::new().with_max_depth(1);
        tree.fit(&x.view(), &y).expect("fit");
        assert!(tree.depth() <= 1);
    }

    #[test]
    fn test_tree_rejects_mismatched_lengths() {
        let x = array![[1.0], [2.0]];
        let y = vec![0];
        let mut tree = DecisionTree::new();
        assert!(matches!(
            tree.fit(&x.view(), &y),
            Err(FitError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_forest_fits_and_classifies() {
        let (x, y) = separable_data();
        let mut forest = RandomForest::new(25).with_seed(42);
        forest.fit(&x.view(), &y).expect("fit");

        assert_eq!(forest.predict(&x.view()), y);
        assert!((forest.score(&x.view(), &y) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_forest_is_deterministic_for_fixed_seed() {
        let (x, y) = separable_data();
        let probe = array![2.9, 3.1];

        let mut first = RandomForest::new(15).with_seed(7);
        first.fit(&x.view(), &y).expect("fit");
        let mut second = RandomForest::new(15).with_seed(7);
        second.fit(&x.view(), &y).expect("fit");

        assert_eq!(
            first.predict_row(&probe.view()),
            second.predict_row(&probe.view())
        );
        assert_eq!(first.predict(&x.view()), second.predict(&x.view()));
    }

    #[test]
    fn test_forest_rejects_empty_training_set() {
        let x = ndarray::Array2::<f32>::zeros((0, 3));
        let y: Vec<usize> = vec![];
        let mut forest = RandomForest::new(5);
        assert!(matches!(
            forest.fit(&x.view(), &y),
            Err(FitError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_forest_rejects_non_binary_labels() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = vec![0, 1, 2];
        let mut forest = RandomForest::new(3);
        assert!(matches!(
            forest.fit(&x.view(), &y),
            Err(FitError::NonBinaryLabel { index: 2 })
        ));
    }

    #[test]
    #[should_panic(expected = "forest not fitted")]
    fn test_unfitted_forest_panics_on_predict() {
        let forest = RandomForest::new(3);
        let row = array![1.0];
        forest.predict_row(&row.view());
    }
}
