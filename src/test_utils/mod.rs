use crate::oracle::{NO_SOLUTIONS_SENTINEL, OracleError, VerifierOracle};
use crate::perturbation::Boundary;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Convert a list of `&str` node names into owned strings.
pub fn mk_nodes(names: &[&str]) -> Vec<String> {
    names.iter().map(|it| it.to_string()).collect()
}

/// What the [`ScriptedOracle`] prints for an experiment.
#[derive(Clone, Debug)]
pub enum Answer {
    /// The verifier found at least one solution.
    Solutions,
    /// The verifier printed the "no solutions" sentinel.
    NoSolutions,
    /// The verifier printed this exact first line.
    Line(&'static str),
    /// The verifier could not be run at all.
    Failure,
}

/// A single recorded call of a [`ScriptedOracle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleCall {
    /// Perturbation identifier found in the specification, e.g. `AKnockout`.
    pub identifier: String,
    pub expected: Boundary,
    pub spec_path: PathBuf,
    pub spec: String,
    pub bound: usize,
    pub mode: String,
}

/// A test double for the external verifier.
///
/// It reads the generated specification, recovers the perturbation identifier and the
/// expected target value, and answers according to a script. Every call is recorded.
pub struct ScriptedOracle {
    answers: HashMap<(String, Boundary), Answer>,
    default: Answer,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    /// An oracle which gives the `default` answer to every experiment that is not scripted.
    pub fn new(default: Answer) -> ScriptedOracle {
        ScriptedOracle {
            answers: HashMap::new(),
            default,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the answers for both experiments of the perturbation with the given identifier.
    pub fn answer(mut self, identifier: &str, on: Answer, off: Answer) -> ScriptedOracle {
        self.answers
            .insert((identifier.to_string(), Boundary::On), on);
        self.answers
            .insert((identifier.to_string(), Boundary::Off), off);
        self
    }

    /// Shorthand for [`Self::answer`] with plain "solutions exist" flags.
    pub fn solutions(self, identifier: &str, on: bool, off: bool) -> ScriptedOracle {
        let mk = |exists: bool| {
            if exists {
                Answer::Solutions
            } else {
                Answer::NoSolutions
            }
        };
        self.answer(identifier, mk(on), mk(off))
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl VerifierOracle for ScriptedOracle {
    fn run(
        &self,
        bound: usize,
        _model: &Path,
        spec: &Path,
        mode: &str,
    ) -> Result<String, OracleError> {
        let text = std::fs::read_to_string(spec).expect("Specification must exist");
        let (identifier, expected) = parse_experiment(&text);
        let answer = self
            .answers
            .get(&(identifier.clone(), expected))
            .unwrap_or(&self.default)
            .clone();

        self.calls.lock().unwrap().push(OracleCall {
            identifier,
            expected,
            spec_path: spec.to_path_buf(),
            spec: text,
            bound,
            mode: mode.to_string(),
        });

        match answer {
            Answer::Solutions => Ok("Solution 1 found".to_string()),
            Answer::NoSolutions => Ok(NO_SOLUTIONS_SENTINEL.to_string()),
            Answer::Line(line) => Ok(line.to_string()),
            Answer::Failure => Err(OracleError::EmptyOutput),
        }
    }
}

/// Recover the perturbation identifier and the expected target value from a generated spec.
fn parse_experiment(spec: &str) -> (String, Boundary) {
    let start = spec
        .rfind("//Perturbations Specs")
        .expect("Missing perturbation specs");
    let spec = &spec[start..];
    let experiment = spec
        .lines()
        .find(|line| line.starts_with('#') && line.contains("Experiment[0] |= $"))
        .expect("Missing perturbation experiment");
    let identifier = experiment[1..experiment.find("Experiment[0]").unwrap()].to_string();

    let result = spec
        .lines()
        .find(|line| line.contains("ResultExpression := {"))
        .expect("Missing result expression");
    let expected = if result.ends_with("= 1};") {
        Boundary::On
    } else {
        Boundary::Off
    };

    (identifier, expected)
}
