use crate::oracle::{OracleError, VerifierOracle};
use log::{debug, trace};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A [`VerifierOracle`] which runs an external verifier process.
///
/// The process is started as `<program> <args...> <bound> <model> <spec> <mode>` and its
/// standard output is captured. By default, this is the network analysis engine packaged
/// as `NAE.jar`, i.e. `java -jar NAE.jar <bound> <model> <spec> <mode>`.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandOracle {
    pub program: String,
    /// Arguments inserted before the verifier parameters (default: `-jar NAE.jar`).
    pub args: Vec<String>,
    /// See [`VerifierOracle::solution_marker`].
    pub solution_marker: Option<String>,
}

impl Default for CommandOracle {
    fn default() -> Self {
        CommandOracle::new("java", &["-jar", "NAE.jar"])
    }
}

impl CommandOracle {
    pub fn new(program: &str, args: &[&str]) -> CommandOracle {
        CommandOracle {
            program: program.to_string(),
            args: args.iter().map(|it| it.to_string()).collect(),
            solution_marker: None,
        }
    }

    /// Only accept first output lines starting with `marker` as "solutions exist".
    pub fn with_solution_marker(mut self, marker: &str) -> CommandOracle {
        self.solution_marker = Some(marker.to_string());
        self
    }

    /// Resolve the verifier executable, failing if it cannot be found on `PATH`.
    pub fn locate(&self) -> Result<PathBuf, OracleError> {
        which::which(&self.program).map_err(|source| OracleError::NotFound {
            program: self.program.clone(),
            source,
        })
    }
}

impl VerifierOracle for CommandOracle {
    fn run(
        &self,
        bound: usize,
        model: &Path,
        spec: &Path,
        mode: &str,
    ) -> Result<String, OracleError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(bound.to_string())
            .arg(model)
            .arg(spec)
            .arg(mode)
            .stdin(Stdio::null());
        trace!("Starting verifier: {:?}", command);

        let output = command.output().map_err(|source| OracleError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OracleError::Failed {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(
            "Verifier finished with {} output line(s).",
            stdout.lines().count()
        );
        Ok(stdout.lines().next().unwrap_or_default().to_string())
    }

    fn solution_marker(&self) -> Option<&str> {
        self.solution_marker.as_deref()
    }
}
