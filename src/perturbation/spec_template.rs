use crate::perturbation::{Boundary, Experiment, Perturbation, PerturbationKind, PerturbedNodes};
use log::debug;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the specification shared by all experiments of a sequential sweep.
pub const SHARED_SPEC_FILE: &str = "perturbations.spec";

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Cannot read specification template `{}`: {source}", path.display())]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot generate a perturbation specification for a model without nodes")]
    EmptyModel,
    #[error("Node `{0}` is the target node and cannot be perturbed")]
    TargetPerturbed(String),
    #[error("Node `{0}` appears twice in a double perturbation")]
    RepeatedNode(String),
    #[error("Cannot resolve the directory of model `{}`", path.display())]
    UnresolvableDirectory { path: PathBuf },
    #[error("Cannot write specification `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The static part of every generated specification: the ordered node list of the model and
/// the template text which is copied verbatim in front of the perturbation specs.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecTemplate {
    pub nodes: Vec<String>,
    pub text: String,
    /// Name of the indicator function used in the perturbation-applied predicate
    /// (default: [`PerturbationKind::default_indicator`]).
    pub indicator: Option<String>,
}

impl SpecTemplate {
    pub fn new(nodes: Vec<String>, text: &str) -> SpecTemplate {
        SpecTemplate {
            nodes,
            text: text.to_string(),
            indicator: None,
        }
    }

    /// Load the template text from `path`. Every template line is terminated by `\n`.
    pub fn load(nodes: Vec<String>, path: &Path) -> Result<SpecTemplate, SpecError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SpecError::TemplateUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut text = String::with_capacity(raw.len() + 1);
        for line in raw.lines() {
            text.push_str(line);
            text.push('\n');
        }
        Ok(SpecTemplate::new(nodes, &text))
    }

    pub fn with_indicator(mut self, indicator: &str) -> SpecTemplate {
        self.indicator = Some(indicator.to_string());
        self
    }

    pub fn indicator_for(&self, kind: PerturbationKind) -> &str {
        self.indicator
            .as_deref()
            .unwrap_or(kind.default_indicator())
    }

    /// Render the specification of a single [`Experiment`].
    pub fn render(&self, experiment: &Experiment) -> Result<String, SpecError> {
        if self.nodes.is_empty() {
            return Err(SpecError::EmptyModel);
        }
        let perturbation = experiment.perturbation;
        if perturbation.nodes.contains(experiment.target) {
            return Err(SpecError::TargetPerturbed(experiment.target.to_string()));
        }
        if let PerturbedNodes::Double(first, second) = &perturbation.nodes
            && first == second
        {
            return Err(SpecError::RepeatedNode(first.clone()));
        }

        let kind = perturbation.kind.name();
        let id = perturbation.identifier();
        let indicator = self.indicator_for(perturbation.kind);
        let target = experiment.target;
        let value = experiment.expected.value();
        let horizon = experiment.horizon;

        // Writing into a `String` cannot fail.
        let mut spec = self.text.clone();
        spec.push_str("\n//Perturbations Specs");
        let _ = write!(spec, "\n${kind}ResultExpression := {{{target} = {value}}};\n\n");
        let _ = writeln!(spec, "#{id}Experiment[0] |= ${id};");
        let _ = write!(spec, "#{id}Experiment[{horizon}] |= ${kind}ResultExpression;\n\n");
        let _ = write!(spec, "${id}:=\n{{\n");
        for (i, node) in self.nodes.iter().enumerate() {
            if i != 0 {
                spec.push_str(" and ");
            }
            let forced = u8::from(perturbation.nodes.contains(node));
            let _ = writeln!(spec, "  {indicator}({node})={forced}");
        }
        spec.push_str("};\n");
        Ok(spec)
    }

    /// Render the specification of a single-node perturbation of `perturbed`.
    pub fn render_single(
        &self,
        perturbed: &str,
        target: &str,
        expected: Boundary,
        kind: PerturbationKind,
        horizon: &str,
    ) -> Result<String, SpecError> {
        let perturbation = Perturbation::single(perturbed, kind);
        self.render(&Experiment {
            perturbation: &perturbation,
            target,
            expected,
            horizon,
        })
    }

    /// Render the specification of a double-node perturbation of `first` and `second`.
    pub fn render_double(
        &self,
        first: &str,
        second: &str,
        target: &str,
        expected: Boundary,
        kind: PerturbationKind,
        horizon: &str,
    ) -> Result<String, SpecError> {
        let perturbation = Perturbation::double(first, second, kind);
        self.render(&Experiment {
            perturbation: &perturbation,
            target,
            expected,
            horizon,
        })
    }
}

/// Where generated specifications are written before the verifier reads them.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecDestination {
    /// Every experiment overwrites the same file. Only usable by a sequential sweep.
    Shared(PathBuf),
    /// Every experiment gets its own file inside the given directory.
    PerExperiment(PathBuf),
}

impl SpecDestination {
    /// The shared `perturbations.spec` file in the directory of `model_path`.
    pub fn beside_model(model_path: &Path) -> Result<SpecDestination, SpecError> {
        let directory = match model_path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => {
                return Err(SpecError::UnresolvableDirectory {
                    path: model_path.to_path_buf(),
                });
            }
        };
        Ok(SpecDestination::Shared(directory.join(SHARED_SPEC_FILE)))
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, SpecDestination::Shared(_))
    }

    /// The file of an `experiment` on the perturbation at `position` in the sweep.
    ///
    /// Per-experiment files are named `perturbations_<position>_<identifier>_<on|off>.spec`.
    /// The position keeps the names apart even when the model declares a node twice.
    pub fn path_for(&self, experiment: &Experiment, position: usize) -> PathBuf {
        match self {
            SpecDestination::Shared(path) => path.clone(),
            SpecDestination::PerExperiment(directory) => directory.join(format!(
                "perturbations_{}_{}_{}.spec",
                position,
                experiment.perturbation.identifier(),
                experiment.expected.suffix()
            )),
        }
    }
}

/// Write `spec` to `path`, replacing any previous content.
pub fn write_spec(path: &Path, spec: &str) -> Result<(), SpecError> {
    std::fs::write(path, spec).map_err(|source| SpecError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Specification written to `{}`.", path.display());
    Ok(())
}
