// Fraudlens - terminal fraud-detection predictor
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use fraudlens::cli::run_app;
use fraudlens::config::{load_settings, Settings};
use fraudlens::predictor::on_predict_requested;
use fraudlens::training::fit_startup_model;

#[derive(Parser, Debug)]
#[command(name = "fraudlens")]
#[command(about = "Train a fraud classifier on a CSV and predict interactively", version)]
struct Args {
    /// Run mode
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the labeled CSV dataset
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Name of the binary label column
    #[arg(long = "label-column")]
    label_column: Option<String>,

    /// Number of trees in the forest
    #[arg(long)]
    trees: Option<usize>,

    /// Per-tree depth limit
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    /// Seed for the train/test shuffle and bootstrap sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Explicit config file (default: ~/.fraudlens/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Train, classify one feature vector, and print the result
    Predict {
        /// Feature values in dataset column order
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Train and report the held-out accuracy
    Eval,
}

fn main() -> Result<()> {
    // Install panic handler to cleanup terminal on panic
    install_panic_handler();

    let args = Args::parse();

    init_tracing();

    let mut settings = load_settings(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);

    match args.command {
        Some(Command::Predict { values }) => run_predict(&settings, &values),
        Some(Command::Eval) => run_eval(&settings),
        None => run_interactive(&settings),
    }
}

/// Apply CLI flag overrides on top of the loaded settings.
fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(dataset) = &args.dataset {
        settings.dataset_path = dataset.clone();
    }
    if let Some(label_column) = &args.label_column {
        settings.label_column = label_column.clone();
    }
    if let Some(trees) = args.trees {
        settings.n_trees = trees;
    }
    if args.max_depth.is_some() {
        settings.max_depth = args.max_depth;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
}

/// Train once, then run the interactive TUI predictor.
fn run_interactive(settings: &Settings) -> Result<()> {
    eprintln!(
        "Training on {} ({} trees)...",
        settings.dataset_path.display(),
        settings.n_trees
    );
    let report = fit_startup_model(settings)?;
    eprintln!(
        "✓ Model ready: {} features, {} train / {} test rows",
        report.bundle.schema.len(),
        report.n_train,
        report.n_test
    );

    run_app(report.bundle)
}

/// Headless one-shot predict for scripting and sanity checks.
fn run_predict(settings: &Settings, values: &[String]) -> Result<()> {
    let report = fit_startup_model(settings)?;
    let result = on_predict_requested(&report.bundle, values)
        .context("Invalid feature values")?;
    println!("{result}");
    Ok(())
}

/// Train and print the held-out accuracy.
fn run_eval(settings: &Settings) -> Result<()> {
    let report = fit_startup_model(settings)?;
    println!(
        "Trained {} trees on {} rows ({} features)",
        settings.n_trees,
        report.n_train,
        report.bundle.schema.len()
    );
    println!(
        "Held-out accuracy: {:.4} ({} test rows)",
        report.holdout_accuracy, report.n_test
    );
    Ok(())
}

/// Install panic handler to cleanup terminal state on panic
///
/// If the program panics while in raw mode (TUI active), the terminal
/// can be left in a broken state. This handler ensures proper cleanup.
fn install_panic_handler() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use crossterm::{cursor, execute, terminal};
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            terminal::LeaveAlternateScreen,
            cursor::Show
        );

        default_panic(info);
    }));
}

/// Initialize tracing to an append-only log file
///
/// The TUI owns the terminal, so logs go to ~/.fraudlens/fraudlens.log
/// instead of stdout. RUST_LOG controls verbosity (default: info).
fn init_tracing() {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    let log_dir = home.join(".fraudlens");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }

    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("fraudlens.log"))
    else {
        return;
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
}
