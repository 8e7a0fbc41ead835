use crate::outcome::PerturbationOutcome;
use crate::perturbation::Boundary;
use crate::sweep::sweep_state::Step;
use crate::sweep::{SweepConfig, SweepItem, SweepState, run_experiment};
use cancel_this::is_cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, GeneratorStep};
use log::{debug, info};

/// Step implementation of the sequential perturbation sweep.
///
/// Each step performs at most one verifier call, so the sweep can be cancelled
/// between any two experiments.
pub struct SweepStep;

impl GeneratorStep<SweepConfig, SweepState, SweepItem> for SweepStep {
    fn step(context: &SweepConfig, state: &mut SweepState) -> Completable<Option<SweepItem>> {
        is_cancelled!()?;

        // A failed experiment leaves the state `Finished`, which ends the sweep.
        // While a perturbation is in progress, `evaluated` is its position in the sweep.
        match std::mem::replace(&mut state.computing, Step::Finished) {
            Step::Finished => Ok(None),
            Step::Idle => {
                let Some(perturbation) = state.pending.pop_front() else {
                    debug!("No perturbations remaining.");
                    return Ok(None);
                };

                info!(
                    "[{}/{}] Start processing `{}`.",
                    state.evaluated + 1,
                    state.total,
                    perturbation.label()
                );

                state.computing = Step::ExpectOn(perturbation);
                Err(Suspended)
            }
            Step::ExpectOn(perturbation) => {
                match run_experiment(context, state.evaluated, &perturbation, Boundary::On) {
                    Ok(on) => {
                        state.computing = Step::ExpectOff(perturbation, on);
                        Err(Suspended)
                    }
                    Err(error) => Ok(Some(Err(error))),
                }
            }
            Step::ExpectOff(perturbation, on) => {
                match run_experiment(context, state.evaluated, &perturbation, Boundary::Off) {
                    Ok(off) => {
                        let outcome = PerturbationOutcome::new(perturbation, on, off);
                        info!("{}: {}", outcome.perturbation.label(), outcome.outcome);
                        state.evaluated += 1;
                        state.computing = Step::Idle;
                        Ok(Some(Ok(outcome)))
                    }
                    Err(error) => Ok(Some(Err(error))),
                }
            }
        }
    }
}
