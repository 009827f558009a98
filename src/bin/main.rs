//! QBoost Command Line Interface
//!
//! A command-line interface for training, evaluating, and using QBoost
//! ensemble models with LibSVM and CSV data formats.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use qboost::api::{quick, Qboost};
use qboost::core::{BinaryOptimizer, Result};
use qboost::persistence::SerializableModel;
use qboost::utils::scaling::ScalingMethod;
use qboost::utils::validation;
use qboost::{CsvDataset, Dataset, ExactSolver, LibsvmDataset, SimulatedAnnealer};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "qboost")]
#[command(about = "A Rust implementation of the QBoost ensemble method")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "QBoost Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new QBoost model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Quick operations without model saving
    Quick(QuickArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (LibSVM or CSV format)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Data format: auto, libsvm, or csv
    #[arg(short, long, default_value = "auto")]
    format: String,

    /// Sparsity penalty strength
    #[arg(short, long, default_value = "0.0")]
    lambda: f64,

    /// Optimizer backend
    #[arg(long, default_value = "exact")]
    solver: CliSolver,

    /// Number of optimizer reads (annealer only)
    #[arg(long, default_value = "10")]
    num_reads: usize,

    /// Annealing sweeps per read
    #[arg(long, default_value = "1000")]
    sweeps: usize,

    /// RNG seed for reproducible annealing
    #[arg(long)]
    seed: Option<u64>,

    /// Optimizer time limit in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Number of decision stumps (default: one per feature)
    #[arg(long)]
    stumps: Option<usize>,

    /// Feature scaling method
    #[arg(long)]
    feature_scaling: Option<CliScalingMethod>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliSolver {
    /// Exhaustive search over all weight assignments (exact, small ensembles)
    #[value(name = "exact")]
    Exact,
    /// Simulated annealing (stochastic, scales to large ensembles)
    #[value(name = "annealer")]
    Annealer,
}

#[derive(ValueEnum, Clone, Debug)]
enum CliScalingMethod {
    /// Min-Max scaling to [-1, 1] range
    #[value(name = "minmax")]
    MinMax,
    /// Standard score (Z-score) normalization
    #[value(name = "standard")]
    StandardScore,
    /// Unit scaling by maximum absolute value
    #[value(name = "unit")]
    UnitScale,
}

impl From<CliScalingMethod> for ScalingMethod {
    fn from(cli_method: CliScalingMethod) -> Self {
        match cli_method {
            CliScalingMethod::MinMax => ScalingMethod::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            },
            CliScalingMethod::StandardScore => ScalingMethod::StandardScore,
            CliScalingMethod::UnitScale => ScalingMethod::UnitScale,
        }
    }
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Data format: auto, libsvm, or csv
    #[arg(short, long, default_value = "auto")]
    format: String,

    /// Show confidence scores
    #[arg(long)]
    confidence: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,

    /// Data format: auto, libsvm, or csv
    #[arg(short, long, default_value = "auto")]
    format: String,

    /// Show detailed metrics
    #[arg(long)]
    detailed: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct QuickArgs {
    #[command(subcommand)]
    operation: QuickOperation,
}

#[derive(Subcommand)]
enum QuickOperation {
    /// Quick train and evaluate with train/test split
    Eval {
        /// Training data file
        train: PathBuf,
        /// Test data file
        test: PathBuf,
        /// Sparsity penalty strength
        #[arg(short, long, default_value = "0.0")]
        lambda: f64,
        /// Feature scaling method
        #[arg(long)]
        feature_scaling: Option<CliScalingMethod>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Quick(args) => quick_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training QBoost model...");
    info!("Data file: {:?}", args.data);
    info!(
        "Parameters: lambda={}, solver={:?}, num_reads={}",
        args.lambda, args.solver, args.num_reads
    );

    // Determine format
    let format = if args.format == "auto" {
        detect_format(&args.data)
    } else {
        args.format.clone()
    };

    info!("Loading dataset as {format} format");

    // Process different formats separately to avoid trait object issues
    match format.as_str() {
        "libsvm" => {
            let dataset = LibsvmDataset::from_file(&args.data)?;
            train_with_dataset(&args, dataset)
        }
        "csv" => {
            let dataset = CsvDataset::from_file(&args.data)?;
            train_with_dataset(&args, dataset)
        }
        _ => Err(qboost::core::QboostError::InvalidParameter(format!(
            "Unsupported format: {format}. Use 'libsvm' or 'csv'"
        ))),
    }
}

fn train_with_dataset<D: Dataset>(args: &TrainArgs, dataset: D) -> Result<()> {
    info!(
        "Loaded {} samples with {} dimensions",
        dataset.len(),
        dataset.dim()
    );

    if dataset.len() < 2 {
        return Err(qboost::core::QboostError::InvalidDataset(
            "Dataset must contain at least 2 samples".to_string(),
        ));
    }

    validation::validate_bipolar_labels(&dataset)?;
    let (positives, negatives, ratio) = validation::check_label_balance(&dataset);
    if positives == 0 || negatives == 0 {
        warn!("Dataset contains a single class ({positives} positive, {negatives} negative)");
    } else if !(0.1..=0.9).contains(&ratio) {
        warn!("Dataset is heavily imbalanced ({positives} positive, {negatives} negative)");
    }

    let model = match args.solver {
        CliSolver::Exact => {
            let trainer = configure_trainer(Qboost::with_optimizer(ExactSolver::new()), args);
            trainer.train(&dataset)?
        }
        CliSolver::Annealer => {
            let annealer = SimulatedAnnealer::new().with_sweeps(args.sweeps);
            let trainer = configure_trainer(Qboost::with_optimizer(annealer), args)
                .with_num_reads(args.num_reads);
            trainer.train(&dataset)?
        }
    };

    info!("Training completed successfully");

    let model_info = model.info();
    info!(
        "Selected {} of {} weak learners",
        model_info.n_selected, model_info.n_learners
    );
    info!("Best energy: {:.6}", model_info.best_energy);

    // Save model
    let serializable = SerializableModel::from_trained_model(&model)?;
    serializable.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    // Quick evaluation on training data
    let accuracy = model.evaluate(&dataset)?;
    info!("Training accuracy: {:.2}%", accuracy * 100.0);

    Ok(())
}

fn configure_trainer<O: BinaryOptimizer>(trainer: Qboost<O>, args: &TrainArgs) -> Qboost<O> {
    let mut trainer = trainer.with_lambda(args.lambda);

    if let Some(n) = args.stumps {
        trainer = trainer.with_stump_count(n);
    }
    if let Some(seed) = args.seed {
        trainer = trainer.with_seed(seed);
    }
    if let Some(secs) = args.timeout {
        trainer = trainer.with_timeout(Duration::from_secs(secs));
    }
    if let Some(scaling_method) = &args.feature_scaling {
        info!("Using feature scaling: {scaling_method:?}");
        trainer = trainer.with_feature_scaling(scaling_method.clone().into());
    }

    trainer
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;
    let model = serializable_model.to_trained_model()?;

    info!("Loading prediction data from: {:?}", args.data);

    let format = if args.format == "auto" {
        detect_format(&args.data)
    } else {
        args.format.clone()
    };

    info!(
        "Making predictions using {} of {} weak learners",
        serializable_model.metadata.n_selected, serializable_model.metadata.n_learners
    );

    let predictions = match format.as_str() {
        "libsvm" => {
            let dataset = LibsvmDataset::from_file(&args.data)?;
            model.predict_dataset(&dataset)?
        }
        "csv" => {
            let dataset = CsvDataset::from_file(&args.data)?;
            model.predict_dataset(&dataset)?
        }
        _ => {
            return Err(qboost::core::QboostError::InvalidParameter(format!(
                "Unsupported format: {format}"
            )))
        }
    };

    // Output results
    if let Some(output_path) = args.output {
        // Write to file
        use std::fs::File;
        use std::io::{BufWriter, Write};

        let file = File::create(&output_path).map_err(qboost::core::QboostError::IoError)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "# Predictions for {} samples", predictions.len())
            .map_err(qboost::core::QboostError::IoError)?;
        writeln!(
            writer,
            "# Format: sample_index predicted_label{}",
            if args.confidence { " confidence" } else { "" }
        )
        .map_err(qboost::core::QboostError::IoError)?;

        for (i, pred) in predictions.iter().enumerate() {
            if args.confidence {
                writeln!(writer, "{} {:.0} {:.6}", i, pred.label, pred.confidence())
                    .map_err(qboost::core::QboostError::IoError)?;
            } else {
                writeln!(writer, "{} {:.0}", i, pred.label)
                    .map_err(qboost::core::QboostError::IoError)?;
            }
        }

        info!("Predictions saved to: {output_path:?}");
    } else {
        // Print to stdout
        println!("# Predictions for {} samples", predictions.len());
        println!(
            "# Format: sample_index predicted_label{}",
            if args.confidence { " confidence" } else { "" }
        );

        for (i, pred) in predictions.iter().enumerate() {
            if args.confidence {
                println!("{} {:.0} {:.6}", i, pred.label, pred.confidence());
            } else {
                println!("{} {:.0}", i, pred.label);
            }
        }
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;
    let model = serializable_model.to_trained_model()?;

    info!("Loading test data from: {:?}", args.data);

    let format = if args.format == "auto" {
        detect_format(&args.data)
    } else {
        args.format.clone()
    };

    let (accuracy, detailed_metrics) = match format.as_str() {
        "libsvm" => {
            let dataset = LibsvmDataset::from_file(&args.data)?;
            let accuracy = model.evaluate(&dataset)?;
            let detailed = if args.detailed {
                Some(model.evaluate_detailed(&dataset)?)
            } else {
                None
            };
            (accuracy, detailed)
        }
        "csv" => {
            let dataset = CsvDataset::from_file(&args.data)?;
            let accuracy = model.evaluate(&dataset)?;
            let detailed = if args.detailed {
                Some(model.evaluate_detailed(&dataset)?)
            } else {
                None
            };
            (accuracy, detailed)
        }
        _ => {
            return Err(qboost::core::QboostError::InvalidParameter(format!(
                "Unsupported format: {format}"
            )))
        }
    };

    // Show evaluation results
    println!("=== Model Evaluation ===");
    serializable_model.print_summary();

    println!("\nTest Results:");
    println!("  Accuracy: {:.2}%", accuracy * 100.0);

    if let Some(metrics) = detailed_metrics {
        println!("\nDetailed Metrics:");
        println!("  True Positives:  {}", metrics.true_positives);
        println!("  True Negatives:  {}", metrics.true_negatives);
        println!("  False Positives: {}", metrics.false_positives);
        println!("  False Negatives: {}", metrics.false_negatives);
        println!("  Precision:       {:.4}", metrics.precision());
        println!("  Recall:          {:.4}", metrics.recall());
        println!("  F1 Score:        {:.4}", metrics.f1_score());
        println!("  Specificity:     {:.4}", metrics.specificity());
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;

    serializable_model.print_summary();

    println!("\nWeak Learner Details:");
    let n_show = serializable_model.stumps.len().min(10);
    for (i, stump) in serializable_model.stumps.iter().enumerate().take(n_show) {
        let selected = serializable_model
            .weights
            .get(i)
            .map(|&w| w == 1)
            .unwrap_or(false);
        println!(
            "  stump {i}: feature {} {} {:.6} [{}]",
            stump.feature,
            if stump.polarity >= 0.0 { ">" } else { "<" },
            stump.threshold,
            if selected { "selected" } else { "dropped" }
        );
    }
    if serializable_model.stumps.len() > n_show {
        println!("  ... ({} more)", serializable_model.stumps.len() - n_show);
    }

    Ok(())
}

fn quick_command(args: QuickArgs) -> Result<()> {
    match args.operation {
        QuickOperation::Eval {
            train,
            test,
            lambda,
            feature_scaling,
        } => {
            info!("Quick evaluation: train on {train:?}, test on {test:?}");

            let scaling_method = feature_scaling.clone().map(|s| s.into());
            let accuracy = quick::evaluate_split_with_params(&train, &test, lambda, scaling_method)?;

            println!("=== Quick Evaluation Results ===");
            println!("Training file: {train:?}");
            println!("Test file: {test:?}");
            println!("Lambda: {lambda}");
            if let Some(ref scaling) = feature_scaling {
                println!("Feature scaling: {scaling:?}");
            }
            println!("Test accuracy: {:.2}%", accuracy * 100.0);

            Ok(())
        }
    }
}

fn detect_format(path: &Path) -> String {
    if let Some(ext) = path.extension() {
        match ext.to_str() {
            Some("csv") => "csv".to_string(),
            Some("libsvm") | Some("svm") => "libsvm".to_string(),
            _ => {
                warn!("Unknown file extension, assuming LibSVM format");
                "libsvm".to_string()
            }
        }
    } else {
        warn!("No file extension, assuming LibSVM format");
        "libsvm".to_string()
    }
}
