//! svm-session command line interface
//!
//! Trains an SVM backend on LibSVM-format data and tests it, printing one
//! result line per test example followed by the break-even summary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process;
use svm_session::features::load_libsvm;
use svm_session::{
    BackendKind, BackendRegistry, Environment, FeatureSet, KernelSpec, ReportMetadata, Result,
    SavedReport, ScalingMethod, SessionConfig, SvmSession,
};

#[derive(Parser)]
#[command(name = "svm-session")]
#[command(about = "Train and test SVM classifiers with ROC / break-even evaluation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
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
    /// Train on a data set and report the fit on the same data
    Train(SessionArgs),
    /// Train, then score a separate test set
    Test(TestArgs),
    /// List backend tokens and whether they are available
    Backends,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Training data file (LibSVM format)
    #[arg(long)]
    train: PathBuf,

    /// JSON session file; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend token: LIGHT, CPLEX or MPI
    #[arg(short, long)]
    backend: Option<String>,

    /// Regularization parameter C
    #[arg(short = 'C', long)]
    c: Option<f64>,

    /// Kernel: linear, rbf[:gamma] or poly[:degree]
    #[arg(short, long)]
    kernel: Option<KernelSpec>,

    /// Feature scaling applied before training
    #[arg(long)]
    preproc: Option<CliScalingMethod>,

    /// Convergence tolerance
    #[arg(short, long)]
    epsilon: Option<f64>,

    /// Maximum solver passes
    #[arg(short, long)]
    max_iterations: Option<usize>,

    /// Kernel cache size in MB
    #[arg(long)]
    cache_size: Option<usize>,
}

#[derive(Args, Debug)]
struct TestArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Test data file (LibSVM format)
    #[arg(long)]
    test: PathBuf,

    /// Per-example results file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// ROC curve file
    #[arg(long)]
    roc: Option<PathBuf>,

    /// Save a JSON evaluation report
    #[arg(long)]
    report: Option<PathBuf>,
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
            CliScalingMethod::MinMax => ScalingMethod::default(),
            CliScalingMethod::StandardScore => ScalingMethod::StandardScore,
            CliScalingMethod::UnitScale => ScalingMethod::UnitScale,
        }
    }
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
        Commands::Test(args) => test_command(args),
        Commands::Backends => backends_command(),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

/// Session file values with command-line overrides applied
fn resolve_config(args: &SessionArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Reading session file {path:?}");
            SessionConfig::from_file(path)?
        }
        None => SessionConfig::default(),
    };

    if let Some(backend) = &args.backend {
        config.backend = backend.clone();
    }
    if let Some(c) = args.c {
        config.c = Some(c);
    }
    if let Some(kernel) = args.kernel {
        config.kernel = kernel;
    }
    if let Some(method) = &args.preproc {
        config.preprocessor = Some(method.clone().into());
    }
    if let Some(epsilon) = args.epsilon {
        config.optimizer.epsilon = epsilon;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.optimizer.max_iterations = max_iterations;
    }
    if let Some(mb) = args.cache_size {
        config.optimizer.cache_size = cache_bytes(mb);
    }
    Ok(config)
}

/// Megabytes to bytes, pinned at `usize::MAX`
fn cache_bytes(mb: usize) -> usize {
    mb.saturating_mul(1 << 20)
}

/// Selected session plus an environment holding the training set
fn prepare(config: &SessionConfig, args: &SessionArgs) -> Result<(SvmSession, Environment)> {
    let session = config.build_session()?;

    let train = load_libsvm(&args.train, None)?;
    let (positives, negatives) = train.label_balance();
    info!(
        "Loaded {} training examples ({positives} positive, {negatives} negative) with {} features",
        train.num_examples(),
        train.num_features()
    );

    let mut env = Environment::new();
    config.configure(&mut env)?;
    env.set_train_features(Some(Box::new(train)));
    Ok((session, env))
}

fn train_command(args: SessionArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let (mut session, mut env) = prepare(&config, &args)?;

    session.train(&mut env)?;
    info!("Training completed successfully");

    // score the training data itself, read fresh so it goes through the
    // fitted preprocessor exactly once
    let num_features = env.train_features().map_or(0, |f| f.num_features());
    env.set_test_features(Some(Box::new(load_libsvm(&args.train, Some(num_features))?)));
    let report = session.evaluate(&mut env)?;

    println!("Training set:");
    print!("{report}");
    Ok(())
}

fn test_command(args: TestArgs) -> Result<()> {
    let config = resolve_config(&args.session)?;
    let (mut session, mut env) = prepare(&config, &args.session)?;

    let num_features = env.train_features().map_or(0, |f| f.num_features());
    let test = load_libsvm(&args.test, Some(num_features))?;
    info!("Loaded {} test examples", test.num_examples());
    env.set_test_features(Some(Box::new(test)));

    session.train(&mut env)?;
    // the session prints the summary block itself
    let report = session.test(&mut env, args.output.as_deref(), args.roc.as_deref())?;

    if let Some(path) = &args.report {
        let mut metadata = ReportMetadata::new(config.backend.clone(), config.kernel.to_string());
        metadata.preprocessor = config.preprocessor.map(|m| m.to_string());
        metadata.regularization = config.c;
        SavedReport::new(metadata, report).save_to_file(path)?;
        info!("Report saved to: {path:?}");
    }
    Ok(())
}

fn backends_command() -> Result<()> {
    let registry = BackendRegistry::default();
    for kind in BackendKind::ALL {
        let status = if registry.is_available(kind) {
            "available"
        } else {
            "disabled"
        };
        println!("{}\t{}\t{}", kind.token(), kind.description(), status);
    }
    Ok(())
}
