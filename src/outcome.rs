use crate::perturbation::Perturbation;
use std::fmt::{Display, Formatter};

/// The predicted final value of the target node under a perturbation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    On,
    Off,
    Inconclusive,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Outcome::On => "On",
            Outcome::Off => "Off",
            Outcome::Inconclusive => "Inconclusive",
        };
        write!(f, "{}", name)
    }
}

/// Classify a perturbation based on whether the verifier found solutions for the
/// "target is on" and "target is off" hypotheses.
///
/// The effect is conclusive only when exactly one of the hypotheses is satisfiable.
pub fn classify(on_exists: bool, off_exists: bool) -> Outcome {
    match (on_exists, off_exists) {
        (true, false) => Outcome::On,
        (false, true) => Outcome::Off,
        (true, true) | (false, false) => Outcome::Inconclusive,
    }
}

/// The result of both experiments of a single perturbation.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerturbationOutcome {
    pub perturbation: Perturbation,
    /// `None` if the verifier failed and the failure was tolerated.
    pub solutions_on: Option<bool>,
    /// `None` if the verifier failed and the failure was tolerated.
    pub solutions_off: Option<bool>,
    pub outcome: Outcome,
}

impl PerturbationOutcome {
    pub fn new(
        perturbation: Perturbation,
        solutions_on: Option<bool>,
        solutions_off: Option<bool>,
    ) -> PerturbationOutcome {
        let outcome = match (solutions_on, solutions_off) {
            (Some(on), Some(off)) => classify(on, off),
            _ => Outcome::Inconclusive,
        };
        PerturbationOutcome {
            perturbation,
            solutions_on,
            solutions_off,
            outcome,
        }
    }

    /// True if one of the two experiments failed and was recorded as unknown.
    pub fn is_degraded(&self) -> bool {
        self.solutions_on.is_none() || self.solutions_off.is_none()
    }
}
