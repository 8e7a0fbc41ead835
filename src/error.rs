use crate::model::ModelParseError;
use crate::oracle::OracleError;
use crate::perturbation::{Boundary, SpecError};
use cancel_this::Cancelled;
use thiserror::Error;

/// Any failure that stops a perturbation sweep.
#[derive(Debug, Error)]
pub enum PerturbError {
    #[error(transparent)]
    Model(#[from] ModelParseError),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("Target node `{0}` is not declared in the model")]
    UnknownTarget(String),
    #[error("Verifier failed on `{label}` (expecting target {expected:?}): {source}")]
    Oracle {
        label: String,
        expected: Boundary,
        #[source]
        source: OracleError,
    },
    #[error("A parallel sweep needs a separate specification file for every experiment")]
    SharedSpecPath,
    #[error("Cannot start the worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Sweep cancelled: {0}")]
    Cancelled(Cancelled),
}

impl From<Cancelled> for PerturbError {
    fn from(value: Cancelled) -> Self {
        PerturbError::Cancelled(value)
    }
}
