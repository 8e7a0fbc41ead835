use crate::error::PerturbError;
use crate::model::ModelParseError;
use crate::oracle::{DEFAULT_BOUND, VerifierOracle};
use crate::perturbation::{
    Perturbation, PerturbationKind, SpecDestination, SpecError, SpecTemplate,
};
use crate::sweep::{OracleFailurePolicy, PairEnumeration, SweepMode, enumerate_perturbations};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The verifier mode used unless configured otherwise.
pub const DEFAULT_VERIFIER_MODE: &str = "1";

/// A configuration object for a perturbation sweep.
///
/// The node list (inside [`SpecTemplate`]) and the template are loaded once and stay
/// fixed for the whole sweep.
#[derive(Clone)]
pub struct SweepConfig {
    /// The model node list and the specification template text.
    pub template: SpecTemplate,
    /// The node whose final value is predicted.
    pub target: String,
    pub kind: PerturbationKind,
    /// Number of time steps after which the target is checked. Passed to the verifier
    /// specification verbatim.
    pub horizon: String,
    /// Perturb single nodes or pairs of nodes (default: single).
    pub mode: SweepMode,
    /// How pairs are enumerated in [`SweepMode::Double`] (default: ordered).
    pub pairs: PairEnumeration,
    pub oracle: Arc<dyn VerifierOracle>,
    /// Solution bound passed to the verifier (default: [`DEFAULT_BOUND`]).
    pub bound: usize,
    /// The network definition handed to the verifier.
    pub model_path: PathBuf,
    /// Verifier mode, passed through to the verifier (default: [`DEFAULT_VERIFIER_MODE`]).
    pub verifier_mode: String,
    /// Where the generated specifications are written (default: `perturbations.spec`
    /// next to the model).
    pub destination: SpecDestination,
    /// What to do when the verifier fails (default: abort).
    pub on_oracle_failure: OracleFailurePolicy,
}

impl SweepConfig {
    /// Create a new [`SweepConfig`] for a single-node sweep which writes its specifications
    /// next to the model and aborts on the first verifier failure.
    pub fn new(
        model_path: &Path,
        template: SpecTemplate,
        target: &str,
        kind: PerturbationKind,
        horizon: &str,
        oracle: Arc<dyn VerifierOracle>,
    ) -> Result<SweepConfig, SpecError> {
        Ok(SweepConfig {
            destination: SpecDestination::beside_model(model_path)?,
            template,
            target: target.to_string(),
            kind,
            horizon: horizon.to_string(),
            mode: SweepMode::Single,
            pairs: PairEnumeration::Ordered,
            oracle,
            bound: DEFAULT_BOUND,
            model_path: model_path.to_path_buf(),
            verifier_mode: DEFAULT_VERIFIER_MODE.to_string(),
            on_oracle_failure: OracleFailurePolicy::Abort,
        })
    }

    pub fn nodes(&self) -> &[String] {
        &self.template.nodes
    }

    /// All perturbations of this sweep, in evaluation order.
    pub fn perturbations(&self) -> Vec<Perturbation> {
        enumerate_perturbations(self.nodes(), &self.target, self.mode, self.pairs, self.kind)
    }

    /// Check that the sweep can produce meaningful results: the model has nodes and the
    /// target is one of them.
    pub fn validate(&self) -> Result<(), PerturbError> {
        if self.nodes().is_empty() {
            return Err(ModelParseError::NoNodes.into());
        }
        if !self.nodes().contains(&self.target) {
            return Err(PerturbError::UnknownTarget(self.target.clone()));
        }
        Ok(())
    }
}
