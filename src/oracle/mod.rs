//! The boundary between the perturbation sweep and the external verifier.
//!
//! The sweep treats the verifier as a black-box satisfiability oracle: it hands over a model,
//! a generated specification and a few pass-through parameters, and reads back the first
//! line of the verifier output. The verifier prints [`NO_SOLUTIONS_SENTINEL`] when the
//! specification is unsatisfiable.
//!
//! Anything that is neither the sentinel nor a plausible answer (no output, a crash trace,
//! a non-zero exit status) is reported as an [`OracleError`] instead of being counted
//! as a solution.

mod command;


pub use command::CommandOracle;

use log::debug;
use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;

/// The first output line of a verifier run which found no solutions.
pub const NO_SOLUTIONS_SENTINEL: &str = "No Solutions Found";

/// The solution bound passed to the verifier unless configured otherwise.
pub const DEFAULT_BOUND: usize = 100;

/// Prefixes of first output lines which indicate that the verifier crashed or was
/// invoked incorrectly.
const FAILURE_PREFIXES: [&str; 6] = [
    "Exception",
    "Error:",
    "error:",
    "Caused by:",
    "Usage:",
    "usage:",
];

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Verifier executable `{program}` not found: {source}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },
    #[error("Cannot start verifier `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Verifier exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("Verifier produced no output")]
    EmptyOutput,
    #[error("Verifier produced unexpected output `{0}`")]
    Malformed(String),
}

/// An external procedure which decides whether a specification has solutions over a model.
///
/// Implementations must be usable from multiple threads, since the parallel sweep calls
/// the oracle concurrently (each call with its own specification file).
pub trait VerifierOracle: Send + Sync {
    /// Run the verifier and return the first line of its output.
    fn run(
        &self,
        bound: usize,
        model: &Path,
        spec: &Path,
        mode: &str,
    ) -> Result<String, OracleError>;

    /// If set, a first line only counts as "solutions exist" when it starts with this marker.
    fn solution_marker(&self) -> Option<&str> {
        None
    }

    /// Run the verifier and decide whether the specification has at least one solution.
    fn solutions_exist(
        &self,
        bound: usize,
        model: &Path,
        spec: &Path,
        mode: &str,
    ) -> Result<bool, OracleError> {
        let line = self.run(bound, model, spec, mode)?;
        debug!("Verifier answered `{}` for `{}`.", line, spec.display());
        interpret_first_line(&line, self.solution_marker())
    }
}

/// Decide whether the first verifier output `line` reports solutions.
///
/// Returns `Ok(false)` only for the exact [`NO_SOLUTIONS_SENTINEL`] (ignoring trailing
/// whitespace and `\r`). Empty output, crash traces, usage messages and near misses of the
/// sentinel (different case, leading whitespace, trailing punctuation) are errors. When a
/// `solution_marker` is given, every other line must start with it.
pub fn interpret_first_line(
    line: &str,
    solution_marker: Option<&str>,
) -> Result<bool, OracleError> {
    let line = line.trim_end();
    if line.trim_start().is_empty() {
        return Err(OracleError::EmptyOutput);
    }
    if line == NO_SOLUTIONS_SENTINEL {
        return Ok(false);
    }
    if is_near_sentinel(line) || is_crash(line) {
        return Err(OracleError::Malformed(line.to_string()));
    }
    match solution_marker {
        Some(marker) if !line.starts_with(marker) => Err(OracleError::Malformed(line.to_string())),
        _ => Ok(true),
    }
}

fn is_near_sentinel(line: &str) -> bool {
    let sentinel = NO_SOLUTIONS_SENTINEL.as_bytes();
    let line = line.trim_start().as_bytes();
    line.len() >= sentinel.len() && line[..sentinel.len()].eq_ignore_ascii_case(sentinel)
}

/// A crash trace or usage message, e.g. `java.lang.NullPointerException: ...`.
fn is_crash(line: &str) -> bool {
    if FAILURE_PREFIXES.iter().any(|prefix| line.starts_with(*prefix))
        || line.contains("Exception in thread")
    {
        return true;
    }
    let first = line
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(':');
    first.ends_with("Exception") || first.ends_with("Error")
}
