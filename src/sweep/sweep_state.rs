use crate::perturbation::Perturbation;
use crate::sweep::SweepConfig;
use std::collections::VecDeque;

/// Internal state of a [`PerturbationSweep`](crate::sweep::PerturbationSweep).
///
/// Tracks the perturbations that still need to be evaluated and the experiment
/// that is currently in progress.
pub struct SweepState {
    pub(crate) computing: Step,
    pub(crate) pending: VecDeque<Perturbation>,
    pub(crate) evaluated: usize,
    pub(crate) total: usize,
}

/// The sweep evaluates one perturbation in two steps: first the "target on" experiment,
/// then the "target off" experiment.
pub(crate) enum Step {
    Idle,
    ExpectOn(Perturbation),
    ExpectOff(Perturbation, Option<bool>),
    /// The sweep is exhausted or was stopped by a failure.
    Finished,
}

impl From<Vec<Perturbation>> for SweepState {
    fn from(value: Vec<Perturbation>) -> Self {
        SweepState {
            computing: Step::Idle,
            total: value.len(),
            pending: value.into(),
            evaluated: 0,
        }
    }
}

impl From<&SweepConfig> for SweepState {
    fn from(value: &SweepConfig) -> Self {
        SweepState::from(value.perturbations())
    }
}

impl SweepState {
    /// Number of perturbations that have not been fully evaluated yet.
    pub fn remaining(&self) -> usize {
        match self.computing {
            Step::Finished => 0,
            Step::Idle => self.pending.len(),
            Step::ExpectOn(_) | Step::ExpectOff(_, _) => self.pending.len() + 1,
        }
    }

    /// Number of perturbations with a result.
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.computing, Step::Finished)
    }
}
