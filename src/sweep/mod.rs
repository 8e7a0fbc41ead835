//! Sweeps over all valid perturbations of a model.
//!
//! For every perturbation (a single node, or a pair of nodes, other than the target), the
//! sweep runs two experiments: one expecting the target to be on after the time horizon,
//! and one expecting it to be off. The two verifier answers are then classified into an
//! [`Outcome`](crate::outcome::Outcome).
//!
//! # Variants
//!
//! - [`PerturbationSweep`]: a sequential generator which yields one result per perturbation.
//!   It can use a single shared specification file, since only one experiment runs at a time.
//!   Use [`run_sweep`] to collect the full report.
//! - [`run_parallel`]: evaluates perturbations on a thread pool. Every experiment needs its
//!   own specification file
//!   ([`SpecDestination::PerExperiment`](crate::perturbation::SpecDestination::PerExperiment)).
//!
//! # Example
//!
//! ```no_run
//! use biodivine_algo_perturbation::model::load_model_nodes;
//! use biodivine_algo_perturbation::oracle::CommandOracle;
//! use biodivine_algo_perturbation::perturbation::{PerturbationKind, SpecTemplate};
//! use biodivine_algo_perturbation::sweep::{SweepConfig, run_sweep};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let model = Path::new("models/toy/model.net");
//! let nodes = load_model_nodes(model).unwrap();
//! let template = SpecTemplate::load(nodes, Path::new("models/toy/observations.spec")).unwrap();
//! let oracle = Arc::new(CommandOracle::default());
//! let config =
//!     SweepConfig::new(model, template, "C", PerturbationKind::Knockout, "18", oracle).unwrap();
//!
//! let report = run_sweep(config).unwrap();
//! print!("{}", report);
//! ```

mod parallel;
mod sweep_config;
mod sweep_state;
mod sweep_step;


use crate::error::PerturbError;
use crate::outcome::PerturbationOutcome;
use crate::perturbation::{Boundary, Experiment, Perturbation, PerturbationKind, write_spec};
use crate::report::PerturbationReport;
use computation_process::{Generator, Stateful};
use log::{debug, info, warn};
pub use parallel::run_parallel;
use std::collections::HashSet;
pub use sweep_config::{DEFAULT_VERIFIER_MODE, SweepConfig};
pub use sweep_state::SweepState;
pub use sweep_step::SweepStep;

/// One item produced by the sweep: the outcome of a perturbation, or the failure which
/// ended the sweep.
pub type SweepItem = Result<PerturbationOutcome, PerturbError>;

/// A sequential perturbation sweep.
///
/// Basic algorithm idea:
///  - Enumerate all perturbations of non-target nodes (see [`enumerate_perturbations`]).
///  - For each perturbation, generate and check the "target on" specification, then the
///    "target off" specification.
///  - Classify the pair of answers and yield the result.
///  - A verifier failure is yielded as an error and ends the sweep, unless
///    [`OracleFailurePolicy::Inconclusive`] is configured.
pub type PerturbationSweep = Generator<SweepConfig, SweepState, SweepItem, SweepStep>;

/// Which perturbations are enumerated.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SweepMode {
    /// Perturb every non-target node on its own.
    Single,
    /// Perturb every pair of distinct non-target nodes.
    Double,
}

/// How node pairs are enumerated in [`SweepMode::Double`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PairEnumeration {
    /// Every ordered pair `(N1, N2)`. Both `(A, B)` and `(B, A)` are evaluated and reported,
    /// always with the same outcome.
    Ordered,
    /// Every unordered pair, reported once in declaration order. Gives the same outcomes
    /// as [`PairEnumeration::Ordered`] with half of the verifier calls.
    Unordered,
}

/// What happens when the verifier fails to give an answer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleFailurePolicy {
    /// Stop the sweep and report the failure.
    Abort,
    /// Record the experiment as unknown and mark the perturbation inconclusive.
    Inconclusive,
}

/// Enumerate all perturbations of `nodes` which do not involve `target`, in declaration order.
pub fn enumerate_perturbations(
    nodes: &[String],
    target: &str,
    mode: SweepMode,
    pairs: PairEnumeration,
    kind: PerturbationKind,
) -> Vec<Perturbation> {
    let candidates = nodes
        .iter()
        .filter(|node| node.as_str() != target)
        .collect::<Vec<_>>();
    match mode {
        SweepMode::Single => candidates
            .into_iter()
            .map(|node| Perturbation::single(node, kind))
            .collect(),
        SweepMode::Double => {
            let mut seen = HashSet::new();
            let mut result = Vec::new();
            for &first in &candidates {
                for &second in &candidates {
                    if first == second {
                        continue;
                    }
                    if pairs == PairEnumeration::Unordered {
                        let key = if first < second {
                            (first, second)
                        } else {
                            (second, first)
                        };
                        if !seen.insert(key) {
                            continue;
                        }
                    }
                    result.push(Perturbation::double(first, second, kind));
                }
            }
            result
        }
    }
}

/// The number of verifier calls a sweep makes (two per perturbation).
pub fn count_experiments(
    nodes: &[String],
    target: &str,
    mode: SweepMode,
    pairs: PairEnumeration,
) -> usize {
    // The kind does not influence the enumeration.
    2 * enumerate_perturbations(nodes, target, mode, pairs, PerturbationKind::Knockout).len()
}

/// Run a sequential [`PerturbationSweep`] to completion and collect its report.
///
/// Fails if the model has no nodes, if the target is not a model node, or on the first
/// failed experiment (unless verifier failures are configured to be tolerated).
pub fn run_sweep(config: SweepConfig) -> Result<PerturbationReport, PerturbError> {
    config.validate()?;
    let mut report = PerturbationReport::new(&config.target, config.kind, &config.horizon);
    let state = SweepState::from(&config);
    info!(
        "Starting {:?} {} sweep of {} perturbation(s) for target `{}`.",
        config.mode,
        config.kind,
        state.remaining(),
        config.target
    );

    for item in PerturbationSweep::configure(config, state) {
        report.entries.push(item??);
    }

    info!("Sweep finished with {} result(s).", report.entries.len());
    Ok(report)
}

/// Evaluate both experiments of the perturbation at `position` in the sweep.
///
/// The position names per-experiment specification files
/// (see [`SpecDestination::path_for`](crate::perturbation::SpecDestination::path_for)).
pub fn evaluate_perturbation(
    config: &SweepConfig,
    position: usize,
    perturbation: Perturbation,
) -> Result<PerturbationOutcome, PerturbError> {
    let on = run_experiment(config, position, &perturbation, Boundary::On)?;
    let off = run_experiment(config, position, &perturbation, Boundary::Off)?;
    let outcome = PerturbationOutcome::new(perturbation, on, off);
    info!("{}: {}", outcome.perturbation.label(), outcome.outcome);
    Ok(outcome)
}

/// Generate, write and check the specification of one experiment.
///
/// Returns `None` if the verifier failed and the failure is tolerated by the configured
/// [`OracleFailurePolicy`].
pub(crate) fn run_experiment(
    config: &SweepConfig,
    position: usize,
    perturbation: &Perturbation,
    expected: Boundary,
) -> Result<Option<bool>, PerturbError> {
    let experiment = Experiment {
        perturbation,
        target: &config.target,
        expected,
        horizon: &config.horizon,
    };
    let spec = config.template.render(&experiment)?;
    let path = config.destination.path_for(&experiment, position);
    write_spec(&path, &spec)?;

    let answer = config.oracle.solutions_exist(
        config.bound,
        &config.model_path,
        &path,
        &config.verifier_mode,
    );
    match answer {
        Ok(exists) => {
            debug!(
                "Experiment `{}` expecting {:?}: solutions exist = {}.",
                perturbation.label(),
                expected,
                exists
            );
            Ok(Some(exists))
        }
        Err(source) => match config.on_oracle_failure {
            OracleFailurePolicy::Abort => Err(PerturbError::Oracle {
                label: perturbation.label(),
                expected,
                source,
            }),
            OracleFailurePolicy::Inconclusive => {
                warn!(
                    "Verifier failed on `{}` expecting {:?} ({}); recording as unknown.",
                    perturbation.label(),
                    expected,
                    source
                );
                Ok(None)
            }
        },
    }
}
