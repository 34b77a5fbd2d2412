//! Topological sorting on top of the component finder.

use super::scc::{clear_scratch_marks, StronglyConnectedComponentsFinder};
use super::{join_values, Graph};
use crate::error::{CyclesFound, Result};
use std::fmt;
use tracing::debug;

impl<T: fmt::Display> Graph<T> {
    /// Reorders the nodes so every link points from an earlier node to a
    /// later one.
    ///
    /// Fails with [`GraphError::CyclesFound`](crate::GraphError::CyclesFound),
    /// listing every cyclic component, if the graph is not acyclic. On failure
    /// the node order, links and marks are exactly as before the call.
    pub fn topological_sort(&mut self) -> Result<()> {
        debug!(nodes = self.len(), "topological sort");

        let components = StronglyConnectedComponentsFinder::find(self);
        clear_scratch_marks(self);

        let mut sorted = Vec::with_capacity(components.len());
        let mut cycles = Vec::new();
        for scc in components {
            sorted.push(scc.representative());
            if scc.is_cycle(self) {
                cycles.push(scc);
            }
        }

        if !cycles.is_empty() {
            debug!(cycles = cycles.len(), "topological sort rejected");
            let rendered = cycles
                .iter()
                .map(|scc| join_values(self, scc.members(), " -> "))
                .collect();
            return Err(CyclesFound::new(cycles, rendered).into());
        }

        sorted.reverse();
        self.replace_nodes(sorted);
        debug!(nodes = self.len(), "topological sort committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::graph::Mark;

    #[test]
    fn test_sort_empty_graph() {
        let mut graph: Graph<&str> = Graph::new();
        graph.topological_sort().unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_sort_two_nodes() {
        let mut graph = Graph::new();
        let b = graph.create_node("B");
        let a = graph.create_node("A");
        graph.link(a, b);

        graph.topological_sort().unwrap();
        assert_eq!(graph.nodes(), &[a, b]);
    }

    #[test]
    fn test_sort_keeps_user_marks() {
        let mut graph = Graph::new();
        let b = graph.create_node("B");
        let a = graph.create_node("A");
        graph.link(a, b);
        graph[b].mark(Mark::tag("m"));

        graph.topological_sort().unwrap();
        assert_eq!(graph.to_string(), "A -> {B}\nB[m] -> {}");
    }

    #[test]
    fn test_cycle_leaves_graph_unchanged() {
        let mut graph = Graph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        graph.link(a, b).link(b, a);
        graph[a].mark(Mark::tag("m"));
        let before = graph.to_string();

        let err = graph.topological_sort().unwrap_err();

        let found = err.cycles().unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains(&[b, a]));
        assert_eq!(graph.nodes(), &[a, b]);
        assert_eq!(graph.to_string(), before);
        assert!(matches!(err, GraphError::CyclesFound(_)));
    }

    #[test]
    fn test_duplicate_links_are_not_cycles() {
        let mut graph = Graph::new();
        let b = graph.create_node("B");
        let a = graph.create_node("A");
        graph.link(a, b).link(a, b);

        graph.topological_sort().unwrap();
        assert_eq!(graph.to_string(), "A -> {B, B}\nB -> {}");
    }

    #[test]
    fn test_dangling_link_target_is_readmitted() {
        let mut graph = Graph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        graph.link(a, b);
        graph.remove(b);
        assert_eq!(graph.nodes(), &[a]);

        graph.topological_sort().unwrap();
        assert_eq!(graph.nodes(), &[a, b]);
        assert_eq!(graph.to_string(), "A -> {B}\nB -> {}");
    }

    #[test]
    fn test_cycle_through_removed_node_is_reported() {
        let mut graph = Graph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        graph.link(a, b).link(b, a);
        graph.remove(b);

        let err = graph.topological_sort().unwrap_err();
        assert!(err.cycles().unwrap().contains(&[b, a]));
        assert_eq!(graph.nodes(), &[a]);
        assert!(!graph[a].has_marks());
        assert!(!graph[b].has_marks());
    }
}
