//! Tarjan's strongly connected components algorithm.
//!
//! The traversal is iterative: each node on the depth-first path has a frame
//! recording how far through its links it has got, so long chains do not
//! consume call stack. Visit order, pop order and therefore the order of
//! components and of members within a component are the same as in the
//! textbook recursive formulation.
//!
//! Discovery index and low-link ("root") values are kept as marks on the
//! nodes while the algorithm runs and are removed before it returns.
//!
//! See <https://en.wikipedia.org/wiki/Tarjan%27s_strongly_connected_components_algorithm>.

use super::mark::Mark;
use super::{Graph, NodeId};
use tracing::trace;

/// A strongly connected component, members in the order they were popped
/// off the algorithm's stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StronglyConnectedComponent {
    members: Vec<NodeId>,
}

impl StronglyConnectedComponent {
    pub(crate) fn new(members: Vec<NodeId>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// The first member, standing in for the whole component.
    pub fn representative(&self) -> NodeId {
        self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// A component is a cycle if it has several members, or a single member
    /// that links to itself.
    pub fn is_cycle<T>(&self, graph: &Graph<T>) -> bool {
        match self.members.as_slice() {
            [only] => graph[*only].is_linked_to(*only),
            members => members.len() > 1,
        }
    }
}

/// Position of the depth-first search within one node's links.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    next_link: usize,
}

/// Finds the strongly connected components of a [`Graph`].
///
/// State lives for a single run; use [`find`](Self::find) or
/// [`Graph::strongly_connected_components`].
#[derive(Debug, Default)]
pub struct StronglyConnectedComponentsFinder {
    next_index: usize,
    stack: Vec<NodeId>,
    /// Indexed by arena position.
    on_stack: Vec<bool>,
    components: Vec<StronglyConnectedComponent>,
}

impl StronglyConnectedComponentsFinder {
    /// Computes all components, in reverse topological order.
    ///
    /// Starting points are taken in graph order. Every link is followed,
    /// including links to nodes that have since been removed from the graph;
    /// such nodes show up in the components like any other.
    pub fn find<T>(graph: &mut Graph<T>) -> Vec<StronglyConnectedComponent> {
        let mut finder = Self {
            on_stack: vec![false; graph.arena.len()],
            ..Self::default()
        };

        let starts = graph.nodes().to_vec();
        for node in starts {
            if index_of(graph, node).is_none() {
                finder.strong_connect(graph, node);
            }
        }

        clear_scratch_marks(graph);
        finder.components
    }

    fn strong_connect<T>(&mut self, graph: &mut Graph<T>, start: NodeId) {
        let mut path = vec![self.open(graph, start)];

        while let Some(&Frame { node, next_link }) = path.last() {
            let successor = graph[node].links().get(next_link).copied();
            match successor {
                Some(successor) => {
                    if let Some(top) = path.last_mut() {
                        top.next_link += 1;
                    }
                    match index_of(graph, successor) {
                        None => path.push(self.open(graph, successor)),
                        Some(index) if self.on_stack[successor.0] => {
                            lower_root(graph, node, index);
                        }
                        Some(_) => {}
                    }
                }
                None => {
                    path.pop();
                    let root = root_of(graph, node);
                    if Some(root) == index_of(graph, node) {
                        self.pop_component(node);
                    }
                    if let Some(parent) = path.last() {
                        lower_root(graph, parent.node, root);
                    }
                }
            }
        }
    }

    /// Assigns the next discovery index and pushes the node.
    fn open<T>(&mut self, graph: &mut Graph<T>, node: NodeId) -> Frame {
        let index = self.next_index;
        self.next_index += 1;
        graph[node].mark(Mark::index(index));
        graph[node].mark(Mark::root(index));
        self.stack.push(node);
        self.on_stack[node.0] = true;
        Frame { node, next_link: 0 }
    }

    fn pop_component(&mut self, root: NodeId) {
        let mut members = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member.0] = false;
            members.push(member);
            if member == root {
                break;
            }
        }
        trace!(size = members.len(), representative = %root, "found component");
        self.components.push(StronglyConnectedComponent::new(members));
    }
}

fn index_of<T>(graph: &Graph<T>, node: NodeId) -> Option<usize> {
    graph[node].find_mark(Mark::as_index)
}

fn root_of<T>(graph: &Graph<T>, node: NodeId) -> usize {
    graph[node]
        .find_mark(Mark::as_root)
        .unwrap_or(usize::MAX)
}

fn lower_root<T>(graph: &mut Graph<T>, node: NodeId, candidate: usize) {
    let current = root_of(graph, node);
    if candidate < current {
        let n = &mut graph[node];
        n.unmark(&Mark::root(current));
        n.mark(Mark::root(candidate));
    }
}

/// Strips index and root marks from every node in the arena, removed nodes
/// reached through dangling links included.
pub(crate) fn clear_scratch_marks<T>(graph: &mut Graph<T>) -> usize {
    graph
        .arena
        .iter_mut()
        .map(|node| node.unmark_where(Mark::is_internal))
        .filter(|&removed| removed > 0)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(graph: &Graph<&'static str>, scc: &StronglyConnectedComponent) -> Vec<&'static str> {
        scc.members().iter().map(|&id| *graph[id].value()).collect()
    }

    fn values(graph: &Graph<&'static str>, sccs: &[StronglyConnectedComponent]) -> Vec<Vec<&'static str>> {
        sccs.iter().map(|scc| members(graph, scc)).collect()
    }

    #[test]
    fn test_empty_graph() {
        let mut graph: Graph<&str> = Graph::new();
        assert!(graph.strongly_connected_components().is_empty());
    }

    #[test]
    fn test_chain_is_reverse_topological() {
        let mut graph = Graph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        let c = graph.create_node("C");
        graph.link(a, b).link(b, c);

        let sccs = graph.strongly_connected_components();
        assert_eq!(values(&graph, &sccs), vec![vec!["C"], vec!["B"], vec!["A"]]);
        assert!(sccs.iter().all(|scc| !scc.is_cycle(&graph)));
    }

    #[test]
    fn test_three_cycle_pop_order() {
        // C -> A, B -> C, A -> B, created C, B, A
        let mut graph = Graph::new();
        let c = graph.create_node("C");
        let b = graph.create_node("B");
        let a = graph.create_node("A");
        graph.link(b, c).link(a, b).link(c, a);

        let sccs = graph.strongly_connected_components();
        assert_eq!(values(&graph, &sccs), vec![vec!["B", "A", "C"]]);
        assert_eq!(sccs[0].representative(), b);
        assert!(sccs[0].is_cycle(&graph));
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let mut graph = Graph::new();
        let a = graph.create_node("A");
        graph.link(a, a);

        let sccs = graph.strongly_connected_components();
        assert_eq!(sccs.len(), 1);
        assert!(sccs[0].is_cycle(&graph));
    }

    #[test]
    fn test_textbook_example() {
        // 0 -> 1; 1 -> 2, 3; 2 -> 1, 4; 3 -> 2; 4
        let mut graph = Graph::new();
        let n: Vec<_> = ["0", "1", "2", "3", "4"]
            .into_iter()
            .map(|v| graph.create_node(v))
            .collect();
        graph
            .link(n[0], n[1])
            .link(n[1], n[2])
            .link(n[1], n[3])
            .link(n[2], n[1])
            .link(n[2], n[4])
            .link(n[3], n[2]);

        let sccs = graph.strongly_connected_components();
        assert_eq!(
            values(&graph, &sccs),
            vec![vec!["4"], vec!["3", "2", "1"], vec!["0"]]
        );
    }

    #[test]
    fn test_scratch_marks_are_removed() {
        let mut graph = Graph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        graph.link(a, b).link(b, a);
        graph[a].mark(Mark::tag("keep"));

        graph.strongly_connected_components();

        assert_eq!(graph[a].marks(), &[Mark::tag("keep")]);
        assert!(!graph[b].has_marks());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let mut graph = Graph::new();
        let n: Vec<_> = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|v| graph.create_node(v))
            .collect();
        graph
            .link(n[0], n[1])
            .link(n[1], n[2])
            .link(n[2], n[0])
            .link(n[2], n[3])
            .link(n[3], n[4])
            .link(n[4], n[3]);

        let first = graph.strongly_connected_components();
        let second = graph.strongly_connected_components();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dangling_links_are_followed() {
        let mut graph = Graph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        graph.link(a, b).link(b, a);
        graph.remove(b);

        let sccs = graph.strongly_connected_components();
        assert_eq!(values(&graph, &sccs), vec![vec!["B", "A"]]);
        assert!(sccs[0].is_cycle(&graph));
        assert!(!graph[a].has_marks());
        assert!(!graph[b].has_marks());
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let mut graph = Graph::new();
        let ids: Vec<_> = (0..100_000).map(|i| graph.create_node(i)).collect();
        for pair in ids.windows(2) {
            graph.link(pair[0], pair[1]);
        }

        let sccs = graph.strongly_connected_components();
        assert_eq!(sccs.len(), ids.len());
        assert_eq!(sccs[0].representative(), ids[ids.len() - 1]);
    }
}
