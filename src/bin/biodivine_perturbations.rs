use biodivine_algo_perturbation::PerturbError;
use biodivine_algo_perturbation::model::load_model_nodes;
use biodivine_algo_perturbation::oracle::{CommandOracle, DEFAULT_BOUND};
use biodivine_algo_perturbation::perturbation::{PerturbationKind, SpecDestination, SpecTemplate};
use biodivine_algo_perturbation::report::PerturbationReport;
use biodivine_algo_perturbation::sweep::{
    OracleFailurePolicy, PairEnumeration, SweepConfig, SweepMode, count_experiments,
    run_parallel, run_sweep,
};
use cancel_this::Cancellable;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "biodivine_perturbations")]
#[command(about = "Predict the effect of node knockouts and overexpressions on a target node")]
struct Args {
    /// Path to the network definition (.net)
    #[arg(value_name = "MODEL")]
    model: PathBuf,

    /// Path to the observation specification used as a template (.spec)
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Verifier mode, passed to the verifier unchanged
    #[arg(value_name = "MODE")]
    mode: String,

    /// Perturb single nodes or pairs of nodes
    #[arg(value_name = "SWEEP")]
    sweep: Sweep,

    /// The node whose final value is predicted
    #[arg(value_name = "TARGET")]
    target: String,

    /// Perturbation code (`KO` = knockout, anything else = overexpression)
    #[arg(value_name = "KIND")]
    kind: String,

    /// Number of steps after which the target value is checked
    #[arg(value_name = "HORIZON")]
    horizon: String,

    /// Maximal number of solutions the verifier looks for
    #[arg(long, default_value_t = DEFAULT_BOUND, require_equals = true)]
    bound: usize,

    /// Verifier executable
    #[arg(long, default_value = "java", require_equals = true)]
    verifier: String,

    /// Argument placed before the verifier parameters; repeatable (default for java:
    /// `-jar NAE.jar`)
    #[arg(
        long = "verifier-arg",
        value_name = "ARG",
        require_equals = true,
        allow_hyphen_values = true
    )]
    verifier_args: Vec<String>,

    /// Prefix of a first output line that reports solutions. Other lines are verifier
    /// errors (default: any line except the "No Solutions Found" sentinel and crash or
    /// usage messages reports solutions)
    #[arg(long, value_name = "PREFIX", require_equals = true)]
    solution_marker: Option<String>,

    /// How node pairs are enumerated by a double sweep
    #[arg(long, default_value = "ordered", require_equals = true)]
    pairs: Pairs,

    /// What to do when the verifier fails
    #[arg(long, default_value = "abort", require_equals = true)]
    on_oracle_error: OnOracleError,

    /// Write every experiment into its own file in this directory (default: one shared
    /// `perturbations.spec` next to the model)
    #[arg(long, value_name = "DIR", require_equals = true)]
    scratch_dir: Option<PathBuf>,

    /// Number of verifier processes running at the same time (0 = one per CPU); requires
    /// --scratch-dir
    #[arg(long, require_equals = true, requires = "scratch_dir")]
    jobs: Option<usize>,

    /// Stop the sweep after this many seconds
    #[arg(long, value_name = "SECS", require_equals = true, conflicts_with = "jobs")]
    timeout: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Logging verbosity (use -v for info, or -v=LEVEL for specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum Sweep {
    Single,
    Double,
}

#[derive(Clone, clap::ValueEnum)]
enum Pairs {
    Ordered,
    Unordered,
}

#[derive(Clone, clap::ValueEnum)]
enum OnOracleError {
    Abort,
    Inconclusive,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
}

impl From<Sweep> for SweepMode {
    fn from(value: Sweep) -> Self {
        match value {
            Sweep::Single => SweepMode::Single,
            Sweep::Double => SweepMode::Double,
        }
    }
}

impl From<Pairs> for PairEnumeration {
    fn from(value: Pairs) -> Self {
        match value {
            Pairs::Ordered => PairEnumeration::Ordered,
            Pairs::Unordered => PairEnumeration::Unordered,
        }
    }
}

impl From<OnOracleError> for OracleFailurePolicy {
    fn from(value: OnOracleError) -> Self {
        match value {
            OnOracleError::Abort => OracleFailurePolicy::Abort,
            OnOracleError::Inconclusive => OracleFailurePolicy::Inconclusive,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
        }
    }
}

fn main() {
    let args = Args::parse();

    // None = not specified, Some(None) = -v without value, Some(Some(level)) = -v=level
    let log_level = match args.verbose {
        None => LevelFilter::Warn,
        Some(None) => LevelFilter::Info,
        Some(Some(ref level)) => level.clone().into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let nodes = load_model_nodes(&args.model).unwrap_or_else(|e| {
        eprintln!("Failed to load model {}: {}", args.model.display(), e);
        std::process::exit(1);
    });

    // The code itself names the indicator function, so e.g. `OE` stays `OE` in the predicate.
    let kind = PerturbationKind::from_code(&args.kind);
    let template = SpecTemplate::load(nodes, &args.template)
        .map(|template| template.with_indicator(&args.kind))
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });

    let oracle = if args.verifier_args.is_empty() && args.verifier == "java" {
        CommandOracle::default()
    } else {
        let verifier_args: Vec<&str> = args.verifier_args.iter().map(|a| a.as_str()).collect();
        CommandOracle::new(&args.verifier, &verifier_args)
    };
    let oracle = match &args.solution_marker {
        Some(marker) => oracle.with_solution_marker(marker),
        None => oracle,
    };
    if let Err(e) = oracle.locate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let mut config = SweepConfig::new(
        &args.model,
        template,
        &args.target,
        kind,
        &args.horizon,
        Arc::new(oracle),
    )
    .unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    config.mode = args.sweep.into();
    config.pairs = args.pairs.into();
    config.bound = args.bound;
    config.verifier_mode = args.mode.clone();
    config.on_oracle_failure = args.on_oracle_error.into();
    if let Some(dir) = &args.scratch_dir {
        config.destination = SpecDestination::PerExperiment(dir.clone());
    }

    println!(
        "Loaded model with {} nodes; {} experiments to run.",
        config.nodes().len(),
        count_experiments(config.nodes(), &config.target, config.mode, config.pairs)
    );

    let result = match (args.jobs, args.timeout) {
        (Some(jobs), _) => run_parallel(&config, jobs),
        (None, Some(seconds)) => {
            let timeout = Duration::from_secs(seconds);
            let finished: Cancellable<Result<PerturbationReport, PerturbError>> =
                cancel_this::on_timeout(timeout, || Ok(run_sweep(config.clone())));
            finished.unwrap_or_else(|e| Err(e.into()))
        }
        (None, None) => run_sweep(config),
    };

    let report = result.unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report);
    }

    let degraded = report.degraded().count();
    if degraded > 0 {
        eprintln!(
            "Warning: verifier failed on {} perturbation(s), reported as inconclusive.",
            degraded
        );
    }
}
