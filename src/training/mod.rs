// Training stage
//
// Runs exactly once at process start: load the dataset, split it with the
// configured seed, fit the forest on the train partition. The result is an
// immutable bundle shared read-only by every later predict call.

use anyhow::{Context, Result};
use std::time::Instant;

use crate::config::Settings;
use crate::data::{load_dataset, train_test_split};
use crate::forest::RandomForest;

/// The fitted model together with the feature schema it was trained on.
///
/// The schema order is the dataset's column order; the input form must
/// present its fields in exactly this order.
#[derive(Debug, Clone)]
pub struct TrainedBundle {
    pub model: RandomForest,
    pub schema: Vec<String>,
}

/// Outcome of the one-shot startup training, including the held-out score.
#[derive(Debug)]
pub struct TrainingReport {
    pub bundle: TrainedBundle,
    pub n_train: usize,
    pub n_test: usize,
    pub holdout_accuracy: f32,
}

/// Load, split, and fit. Fatal on any dataset problem: the application
/// cannot start without a fitted model.
pub fn fit_startup_model(settings: &Settings) -> Result<TrainingReport> {
    let started = Instant::now();

    let dataset = load_dataset(&settings.dataset_path, &settings.label_column)
        .with_context(|| {
            format!(
                "Failed to load dataset from {}",
                settings.dataset_path.display()
            )
        })?;

    tracing::info!(
        rows = dataset.n_samples(),
        features = dataset.n_features(),
        "Dataset loaded"
    );

    let (train, test) = train_test_split(&dataset, settings.test_ratio, settings.seed);

    let mut model = RandomForest::new(settings.n_trees).with_seed(settings.seed);
    if let Some(depth) = settings.max_depth {
        model = model.with_max_depth(depth);
    }
    model
        .fit(&train.features.view(), &train.labels)
        .context("Failed to fit random forest")?;

    let holdout_accuracy = if test.labels.is_empty() {
        f32::NAN
    } else {
        model.score(&test.features.view(), &test.labels)
    };

    tracing::info!(
        trees = model.n_trees(),
        train_rows = train.labels.len(),
        test_rows = test.labels.len(),
        holdout_accuracy = holdout_accuracy as f64,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Model fitted"
    );

    Ok(TrainingReport {
        bundle: TrainedBundle {
            model,
            schema: dataset.feature_names,
        },
        n_train: train.labels.len(),
        n_test: test.labels.len(),
        holdout_accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture_settings(csv: &str) -> (tempfile::NamedTempFile, Settings) {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(csv.as_bytes()).expect("write csv");
        let settings = Settings {
            dataset_path: file.path().to_path_buf(),
            n_trees: 10,
            ..Settings::default()
        };
        (file, settings)
    }

    fn sample_csv() -> String {
        let mut csv = String::from("amt,time,Class\n");
        for i in 0..20 {
            let label = usize::from(i >= 10);
            csv.push_str(&format!("{}.0,{}.5,{}\n", i * 10, i, label));
        }
        csv
    }

    #[test]
    fn test_startup_training_produces_schema_in_column_order() {
        let (_file, settings) = fixture_settings(&sample_csv());
        let report = fit_startup_model(&settings).expect("train");

        assert_eq!(report.bundle.schema, vec!["amt", "time"]);
        assert_eq!(report.n_train + report.n_test, 20);
        assert_eq!(report.n_test, 4);
    }

    #[test]
    fn test_startup_training_fails_on_missing_file() {
        let settings = Settings {
            dataset_path: "/nonexistent/cdd.csv".into(),
            ..Settings::default()
        };
        assert!(fit_startup_model(&settings).is_err());
    }

    #[test]
    fn test_repeated_training_is_deterministic() {
        let (_file, settings) = fixture_settings(&sample_csv());
        let first = fit_startup_model(&settings).expect("train");
        let second = fit_startup_model(&settings).expect("train");

        let probe = ndarray::array![55.0f32, 5.5];
        assert_eq!(
            first.bundle.model.predict_row(&probe.view()),
            second.bundle.model.predict_row(&probe.view())
        );
        assert_eq!(first.holdout_accuracy, second.holdout_accuracy);
    }
}
