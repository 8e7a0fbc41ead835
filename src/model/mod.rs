//! Extraction of node names from network definition (`.net`) files.
//!
//! A network definition starts with an arbitrary number of `directive ...` lines, followed by
//! a single line of `;`-separated node declarations:
//!
//! ```text
//! directive updates sync;
//! directive length 20;
//! Pou5f1(0..8); Sox2[+](0..8); Nanog(1);
//! Pou5f1 Sox2 positive;
//! ```
//!
//! Only the names (`Pou5f1`, `Sox2`, `Nanog`) are needed by the perturbation sweep, since
//! the network dynamics are handled by the external verifier.


use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The first token of every line that should be skipped before the declaration line.
pub const DIRECTIVE_MARKER: &str = "directive";

#[derive(Debug, Error)]
pub enum ModelParseError {
    #[error("Cannot read network definition `{}`: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Network definition contains no node declaration line")]
    MissingDeclarations,
    #[error("Network definition declares no nodes")]
    NoNodes,
}

/// Parse the ordered list of node names from the network definition `text`.
///
/// Leading directive (and blank) lines are skipped. The first remaining line is split on `;`
/// and every clause containing `(` or `[` contributes the trimmed text before that bracket.
/// Declaration order is preserved and duplicates are kept.
///
/// An empty list is a valid result (e.g. a declaration line with no declarations); callers
/// that cannot work with zero nodes should report [`ModelParseError::NoNodes`].
pub fn parse_model_nodes(text: &str) -> Result<Vec<String>, ModelParseError> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

    let declarations = text
        .lines()
        .find(|line| !is_skipped_line(line))
        .ok_or(ModelParseError::MissingDeclarations)?;

    let nodes = declarations
        .trim()
        .split(';')
        .filter_map(declared_name)
        .collect::<Vec<_>>();

    debug!("Parsed {} node declaration(s): {:?}", nodes.len(), nodes);
    Ok(nodes)
}

/// Read the network definition at `path` and extract its node names.
///
/// See [`parse_model_nodes`].
pub fn load_model_nodes(path: &Path) -> Result<Vec<String>, ModelParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ModelParseError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_model_nodes(&text)
}

fn is_skipped_line(line: &str) -> bool {
    match line.split_whitespace().next() {
        None => true,
        Some(token) => token.starts_with(DIRECTIVE_MARKER),
    }
}

/// The node name of a single declaration clause, or `None` if the clause
/// is not a declaration.
fn declared_name(clause: &str) -> Option<String> {
    let bracket = clause.find(['(', '['])?;
    Some(clause[..bracket].trim().to_string())
}
