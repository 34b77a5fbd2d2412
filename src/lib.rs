//! # digraph - in-memory directed graphs
//!
//! A generic directed graph whose nodes carry a value, ordered outgoing links
//! and equality-compared [`Mark`]s. On top of it sit Tarjan's strongly
//! connected components algorithm and an all-or-nothing topological sort that
//! reports every cycle it finds.

pub mod error;
pub mod graph;

// Re-export commonly used types
pub use error::{CyclesFound, GraphError, Result};
pub use graph::{
    CustomMark, Graph, Mark, Node, NodeDisplay, NodeId, StronglyConnectedComponent,
    StronglyConnectedComponentsFinder,
};
