// Configuration loader
// Reads optional overrides from ~/.fraudlens/config.toml; missing file
// falls back to defaults.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Settings;

/// Load settings, applying overrides from the config file if one exists.
///
/// When `config_path` is `None` the default location
/// `~/.fraudlens/config.toml` is used; a missing file there is not an
/// error, it just means defaults.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(Settings::default()),
        },
    };

    if !path.exists() {
        if required {
            bail!("config file not found: {}", path.display());
        }
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_settings(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fraudlens/config.toml"))
}

fn parse_settings(contents: &str) -> Result<Settings> {
    #[derive(serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    struct TomlSettings {
        #[serde(default)]
        dataset_path: Option<PathBuf>,
        #[serde(default)]
        label_column: Option<String>,
        #[serde(default)]
        n_trees: Option<usize>,
        #[serde(default)]
        max_depth: Option<usize>,
        #[serde(default)]
        seed: Option<u64>,
        #[serde(default)]
        test_ratio: Option<f32>,
    }

    let parsed: TomlSettings = toml::from_str(contents)?;

    let mut settings = Settings::default();
    if let Some(dataset_path) = parsed.dataset_path {
        settings.dataset_path = dataset_path;
    }
    if let Some(label_column) = parsed.label_column {
        settings.label_column = label_column;
    }
    if let Some(n_trees) = parsed.n_trees {
        settings.n_trees = n_trees;
    }
    if parsed.max_depth.is_some() {
        settings.max_depth = parsed.max_depth;
    }
    if let Some(seed) = parsed.seed {
        settings.seed = seed;
    }
    if let Some(test_ratio) = parsed.test_ratio {
        settings.test_ratio = test_ratio;
    }

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.n_trees == 0 {
        bail!("n_trees must be at least 1");
    }
    if !(0.0..1.0).contains(&settings.test_ratio) {
        bail!(
            "test_ratio must be in [0, 1), got {}",
            settings.test_ratio
        );
    }
    if settings.label_column.is_empty() {
        bail!("label_column must not be empty");
    }
    Ok(())
}
