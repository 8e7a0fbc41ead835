use crate::error::PerturbError;
use crate::report::PerturbationReport;
use crate::sweep::{SweepConfig, evaluate_perturbation};
use log::info;
use rayon::prelude::*;

/// Evaluate all perturbations of `config` on a pool of `jobs` worker threads
/// (`0` = one per CPU).
///
/// Every experiment writes its own specification file, so the configured destination must be
/// [`SpecDestination::PerExperiment`](crate::perturbation::SpecDestination::PerExperiment).
/// The report lists perturbations in the same order as [`run_sweep`](crate::sweep::run_sweep),
/// regardless of the order in which the workers finish.
pub fn run_parallel(
    config: &SweepConfig,
    jobs: usize,
) -> Result<PerturbationReport, PerturbError> {
    config.validate()?;
    if config.destination.is_shared() {
        return Err(PerturbError::SharedSpecPath);
    }

    let perturbations = config.perturbations();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    info!(
        "Starting parallel {:?} {} sweep of {} perturbation(s) on {} thread(s).",
        config.mode,
        config.kind,
        perturbations.len(),
        pool.current_num_threads()
    );

    let entries = pool.install(|| {
        perturbations
            .into_par_iter()
            .enumerate()
            .map(|(position, perturbation)| evaluate_perturbation(config, position, perturbation))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut report = PerturbationReport::new(&config.target, config.kind, &config.horizon);
    report.entries = entries;
    info!("Parallel sweep finished with {} result(s).", report.entries.len());
    Ok(report)
}
