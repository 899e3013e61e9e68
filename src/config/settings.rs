// Configuration structs

use std::path::PathBuf;

/// Runtime settings for training and the interactive predictor.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the labeled CSV dataset
    pub dataset_path: PathBuf,

    /// Name of the binary label column
    pub label_column: String,

    /// Number of trees in the forest
    pub n_trees: usize,

    /// Optional per-tree depth limit (unlimited when None)
    pub max_depth: Option<usize>,

    /// Seed driving both the train/test shuffle and bootstrap sampling
    pub seed: u64,

    /// Fraction of rows held out for the test partition
    pub test_ratio: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("cdd.csv"),
            label_column: "Class".to_string(),
            n_trees: 100,
            max_depth: None,
            seed: 42,
            test_ratio: 0.2,
        }
    }
}
