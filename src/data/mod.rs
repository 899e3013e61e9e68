// Dataset loading and train/test splitting
//
// Loads a labeled CSV table once at startup. The header row fixes the
// Feature Schema: every column except the label column, in file order.
// That order drives both the classifier's input layout and the input
// form's field order.

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;

use crate::errors::DataError;

/// An immutable, fully numeric tabular dataset with a binary label column.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Ordered feature column names (the label column excluded)
    pub feature_names: Vec<String>,
    /// Feature values, one row per sample (n_samples x n_features)
    pub features: Array2<f32>,
    /// Binary labels, one per sample
    pub labels: Vec<usize>,
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// One side of a train/test partition.
#[derive(Debug, Clone)]
pub struct Partition {
    pub features: Array2<f32>,
    pub labels: Vec<usize>,
}

/// Load a labeled dataset from a CSV file.
///
/// The file must have a header row containing `label_column`; every other
/// column is treated as a numeric feature. Any non-numeric feature value,
/// non-binary label, or ragged row is fatal.
pub fn load_dataset(path: &Path, label_column: &str) -> Result<Dataset, DataError> {
    let display_path = path.display().to_string();
    // Flexible mode so ragged rows surface as RaggedRow instead of an
    // opaque reader error
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| DataError::Read {
            path: display_path.clone(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| DataError::Read {
            path: display_path.clone(),
            source,
        })?
        .clone();

    let label_idx = headers
        .iter()
        .position(|name| name == label_column)
        .ok_or_else(|| DataError::MissingLabelColumn(label_column.to_string()))?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != label_idx)
        .map(|(_, name)| name.to_string())
        .collect();

    if feature_names.is_empty() {
        return Err(DataError::NoFeatureColumns);
    }

    let n_features = feature_names.len();
    let mut values: Vec<f32> = Vec::new();
    let mut labels: Vec<usize> = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DataError::Read {
            path: display_path.clone(),
            source,
        })?;

        if record.len() != headers.len() {
            return Err(DataError::RaggedRow {
                row,
                expected: headers.len(),
                actual: record.len(),
            });
        }

        for (idx, field) in record.iter().enumerate() {
            if idx == label_idx {
                labels.push(parse_label(field, row)?);
            } else {
                // "NaN" and "inf" parse as f32 but the tree's threshold
                // comparisons require finite values, so reject them here
                let value = field
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| DataError::NonNumericValue {
                        column: headers[idx].to_string(),
                        row,
                        value: field.to_string(),
                    })?;
                values.push(value);
            }
        }
    }

    if labels.is_empty() {
        return Err(DataError::Empty);
    }

    let n_samples = labels.len();
    let features = Array2::from_shape_vec((n_samples, n_features), values)
        .expect("row-major feature buffer matches (n_samples, n_features)");

    Ok(Dataset {
        feature_names,
        features,
        labels,
    })
}

fn parse_label(field: &str, row: usize) -> Result<usize, DataError> {
    // Accept both "1" and "1.0" style labels; anything outside {0, 1} is fatal
    let numeric: f32 = field.trim().parse().map_err(|_| DataError::NonBinaryLabel {
        row,
        value: field.to_string(),
    })?;
    if numeric == 0.0 {
        Ok(0)
    } else if numeric == 1.0 {
        Ok(1)
    } else {
        Err(DataError::NonBinaryLabel {
            row,
            value: field.to_string(),
        })
    }
}

/// Split a dataset into disjoint train and test partitions.
///
/// Indices are shuffled with a seeded RNG, so the same seed always yields
/// the same partition. `test_ratio` is clamped so both sides stay non-empty
/// whenever there are at least two samples.
pub fn train_test_split(dataset: &Dataset, test_ratio: f32, seed: u64) -> (Partition, Partition) {
    let n_samples = dataset.n_samples();
    let mut indices: Vec<usize> = (0..n_samples).collect();

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut n_test = (n_samples as f32 * test_ratio).round() as usize;
    if n_samples >= 2 {
        n_test = n_test.clamp(1, n_samples - 1);
    } else {
        n_test = 0;
    }

    let (test_idx, train_idx) = indices.split_at(n_test);
    (
        take_rows(dataset, train_idx),
        take_rows(dataset, test_idx),
    )
}

fn take_rows(dataset: &Dataset, indices: &[usize]) -> Partition {
    let features = dataset.features.select(Axis(0), indices);
    let labels = indices.iter().map(|&idx| dataset.labels[idx]).collect();
    Partition { features, labels }
}
