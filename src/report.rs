use crate::outcome::{Outcome, PerturbationOutcome};
use crate::perturbation::PerturbationKind;
use std::fmt::{Display, Formatter};

const SEPARATOR: &str = "***************************";

/// The results of a perturbation sweep, one entry per perturbation in evaluation order.
///
/// Displays as a short header followed by one `<label>: <outcome>` line per perturbation.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerturbationReport {
    pub target: String,
    pub kind: PerturbationKind,
    pub horizon: String,
    pub entries: Vec<PerturbationOutcome>,
}

impl PerturbationReport {
    pub fn new(target: &str, kind: PerturbationKind, horizon: &str) -> PerturbationReport {
        PerturbationReport {
            target: target.to_string(),
            kind,
            horizon: horizon.to_string(),
            entries: Vec::new(),
        }
    }

    /// The outcome of the first perturbation reported under `label` (e.g. `A` or `A & B`).
    pub fn outcome_of(&self, label: &str) -> Option<Outcome> {
        self.entries
            .iter()
            .find(|it| it.perturbation.label() == label)
            .map(|it| it.outcome)
    }

    /// Number of perturbations with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries.iter().filter(|it| it.outcome == outcome).count()
    }

    /// Perturbations where at least one experiment failed and was recorded as unknown.
    pub fn degraded(&self) -> impl Iterator<Item = &PerturbationOutcome> {
        self.entries.iter().filter(|it| it.is_degraded())
    }
}

impl Display for PerturbationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f, "Target Node: {}", self.target)?;
        writeln!(f, "Perturbation Type: {}", self.kind)?;
        writeln!(f, "Time Step: {}", self.horizon)?;
        writeln!(f, "{}", SEPARATOR)?;
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.perturbation.label(), entry.outcome)?;
        }
        Ok(())
    }
}
