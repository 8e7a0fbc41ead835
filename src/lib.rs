//! Knockout and overexpression analysis of logical network models.
//!
//! For a chosen target node, the crate checks whether forcing other nodes permanently off
//! (knockout) or on (overexpression) drives the target to a predictable value after a fixed
//! number of steps. The network dynamics are not simulated here: every question is phrased as
//! a temporal specification and handed to an external verifier (see [`oracle`]).
//!
//! The pipeline is: [`model`] (node names) → [`sweep`] (all valid perturbations) →
//! [`perturbation`] (specification text) → [`oracle`] (satisfiability) → [`outcome`]
//! (`On`/`Off`/`Inconclusive`) → [`report`].

#[cfg(test)]
mod test_utils;

mod error;
pub mod model;
pub mod oracle;
pub mod outcome;
pub mod perturbation;
pub mod report;
pub mod sweep;

pub use error::PerturbError;
