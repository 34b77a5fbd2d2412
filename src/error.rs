//! Error types for graph operations.

use crate::graph::{NodeId, StronglyConnectedComponent};
use std::fmt;
use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// All errors a graph operation can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// More than one node holds the value that was looked up.
    #[error("multiple nodes with the same value to search for: {value}")]
    AmbiguousLookup { value: String, matches: usize },

    /// The graph is not acyclic, so it has no topological order.
    #[error(transparent)]
    CyclesFound(#[from] CyclesFound),
}

impl GraphError {
    /// Builds an [`AmbiguousLookup`](Self::AmbiguousLookup) for `value`, held
    /// by `matches` nodes.
    pub fn ambiguous_lookup(value: impl fmt::Display, matches: usize) -> Self {
        Self::AmbiguousLookup {
            value: value.to_string(),
            matches,
        }
    }

    /// The cycle report, if this is a failed topological sort.
    pub fn cycles(&self) -> Option<&CyclesFound> {
        match self {
            Self::CyclesFound(found) => Some(found),
            Self::AmbiguousLookup { .. } => None,
        }
    }
}

/// Every cyclic component found by a rejected topological sort.
///
/// Member values are rendered when the error is raised, so the message can be
/// printed after the graph is gone or has been changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("found {} cycle(s) in graph:{}", .cycles.len(), format_cycles(.rendered))]
pub struct CyclesFound {
    cycles: Vec<StronglyConnectedComponent>,
    rendered: Vec<String>,
}

impl CyclesFound {
    pub(crate) fn new(cycles: Vec<StronglyConnectedComponent>, rendered: Vec<String>) -> Self {
        debug_assert_eq!(cycles.len(), rendered.len());
        Self { cycles, rendered }
    }

    /// The cyclic components, in the order the finder produced them.
    pub fn cycles(&self) -> &[StronglyConnectedComponent] {
        &self.cycles
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Whether one of the cycles has exactly these members, in this order.
    pub fn contains(&self, members: &[NodeId]) -> bool {
        self.cycles.iter().any(|scc| scc.members() == members)
    }

    /// Member values of each cycle joined by `" -> "`.
    pub fn rendered(&self) -> &[String] {
        &self.rendered
    }
}

fn format_cycles(rendered: &[String]) -> String {
    rendered.iter().map(|cycle| format!("\n  {cycle}")).collect()
}
