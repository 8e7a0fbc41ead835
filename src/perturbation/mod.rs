//! Perturbations, experiments, and the generation of their verifier specifications.
//!
//! A [`Perturbation`] forces one or two nodes of the network to a boundary value for the whole
//! experiment. Each perturbation is tested by two [`Experiment`]s: one asserting that the
//! target node ends up [`Boundary::On`] after the time horizon, and one asserting that it
//! ends up [`Boundary::Off`]. The [`SpecTemplate`] turns an experiment into specification text
//! that the verifier can check for satisfiability.

mod spec_template;


pub use spec_template::{
    SHARED_SPEC_FILE, SpecDestination, SpecError, SpecTemplate, write_spec,
};

use std::fmt::{Display, Formatter};

/// The perturbation code used for knockouts in network definitions.
pub const KNOCKOUT_CODE: &str = "KO";
/// The perturbation code used for overexpression (forced expression) in network definitions.
pub const OVEREXPRESS_CODE: &str = "FE";
/// Joins the two node names of a pair identifier when one of the names contains `_`.
///
/// Escaped names only contain runs of `_` of even length, so the odd runs around this
/// separator cannot be produced by the names themselves.
pub const ESCAPED_PAIR_SEPARATOR: &str = "_and_";

/// The direction in which perturbed nodes are forced.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerturbationKind {
    /// Force the activity indicator of the node to `0`.
    Knockout,
    /// Force the activity indicator of the node to `1`.
    Overexpress,
}

impl PerturbationKind {
    /// Interpret a perturbation code: `KO` is a knockout, everything else is overexpression.
    pub fn from_code(code: &str) -> PerturbationKind {
        if code == KNOCKOUT_CODE {
            PerturbationKind::Knockout
        } else {
            PerturbationKind::Overexpress
        }
    }

    /// Human-readable name, also used inside generated specification identifiers.
    pub fn name(&self) -> &'static str {
        match self {
            PerturbationKind::Knockout => "Knockout",
            PerturbationKind::Overexpress => "Overexpress",
        }
    }

    /// The indicator function used in the perturbation-applied predicate when none
    /// is configured explicitly.
    pub fn default_indicator(&self) -> &'static str {
        match self {
            PerturbationKind::Knockout => KNOCKOUT_CODE,
            PerturbationKind::Overexpress => OVEREXPRESS_CODE,
        }
    }
}

impl Display for PerturbationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The node set of a [`Perturbation`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerturbedNodes {
    Single(String),
    Double(String, String),
}

impl PerturbedNodes {
    pub fn contains(&self, node: &str) -> bool {
        self.iter().any(|it| it == node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let (first, second) = match self {
            PerturbedNodes::Single(n) => (n.as_str(), None),
            PerturbedNodes::Double(n1, n2) => (n1.as_str(), Some(n2.as_str())),
        };
        std::iter::once(first).chain(second)
    }
}

/// A full force-to-boundary perturbation of one or two nodes.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Perturbation {
    pub nodes: PerturbedNodes,
    pub kind: PerturbationKind,
}

impl Perturbation {
    pub fn single(node: &str, kind: PerturbationKind) -> Perturbation {
        Perturbation {
            nodes: PerturbedNodes::Single(node.to_string()),
            kind,
        }
    }

    pub fn double(first: &str, second: &str, kind: PerturbationKind) -> Perturbation {
        Perturbation {
            nodes: PerturbedNodes::Double(first.to_string(), second.to_string()),
            kind,
        }
    }

    /// The label under which the perturbation is reported, e.g. `A` or `A & B`.
    pub fn label(&self) -> String {
        match &self.nodes {
            PerturbedNodes::Single(n) => n.clone(),
            PerturbedNodes::Double(n1, n2) => format!("{} & {}", n1, n2),
        }
    }

    /// The identifier embedded in the generated specification, e.g. `AKnockout`
    /// or `A_BKnockout`.
    ///
    /// If a perturbed node name contains `_`, every `_` inside the names is doubled and
    /// a pair is joined by [`ESCAPED_PAIR_SEPARATOR`], so `(A_B, C)` becomes
    /// `A__B_and_CKnockout` while `(A, B_C)` becomes `A_and_B__CKnockout`. Identifiers
    /// are therefore distinct for distinct node sequences of the same kind.
    pub fn identifier(&self) -> String {
        let kind = self.kind.name();
        if !self.nodes.iter().any(|it| it.contains('_')) {
            return match &self.nodes {
                PerturbedNodes::Single(n) => format!("{}{}", n, kind),
                PerturbedNodes::Double(n1, n2) => format!("{}_{}{}", n1, n2, kind),
            };
        }
        let escaped = self
            .nodes
            .iter()
            .map(|it| it.replace('_', "__"))
            .collect::<Vec<_>>();
        format!("{}{}", escaped.join(ESCAPED_PAIR_SEPARATOR), kind)
    }
}

/// The expected final value of the target node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Boundary {
    On,
    Off,
}

impl Boundary {
    pub fn value(&self) -> u8 {
        match self {
            Boundary::On => 1,
            Boundary::Off => 0,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Boundary::On => "on",
            Boundary::Off => "off",
        }
    }
}

/// A single verifier invocation: does the `target` reach the `expected` value
/// `horizon` steps after the `perturbation` is applied?
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Experiment<'a> {
    pub perturbation: &'a Perturbation,
    pub target: &'a str,
    pub expected: Boundary,
    /// Passed through to the specification verbatim.
    pub horizon: &'a str,
}
