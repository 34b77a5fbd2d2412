//! Directed graph with node marks, strongly connected components and
//! topological sorting.
//!
//! Nodes live in an arena owned by the [`Graph`] and are addressed by
//! [`NodeId`] handles; links between nodes are handles too, so cycles in the
//! graph never turn into ownership cycles.

pub mod mark;
pub mod node;
pub mod scc;
mod sort;

pub use mark::{CustomMark, Mark};
pub use node::Node;
pub use scc::{StronglyConnectedComponent, StronglyConnectedComponentsFinder};

use crate::error::{GraphError, Result};
use std::fmt;
use std::ops::{Index, IndexMut};
use tracing::debug;

/// Handle to a node inside the graph that created it.
///
/// Handles compare by identity: two nodes with equal values still have
/// distinct handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the graph's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered collection of nodes.
///
/// The order of [`nodes`](Graph::nodes) is the iteration and display order,
/// and the order in which the component finder picks its starting points.
/// It only changes through node creation, removal and a successful
/// [`topological_sort`](Graph::topological_sort).
///
/// # Example
///
/// ```
/// use digraph::Graph;
///
/// let mut graph = Graph::new();
/// let c = graph.create_node("C");
/// let b = graph.create_node("B");
/// let a = graph.create_node("A");
/// graph.link(b, c).link(a, b);
///
/// graph.topological_sort().unwrap();
/// assert_eq!(graph.nodes(), &[a, b, c]);
/// assert_eq!(graph.to_string(), "A -> {B}\nB -> {C}\nC -> {}");
/// ```
#[derive(Debug, Clone)]
pub struct Graph<T> {
    /// Every node ever created; removal does not shrink it.
    arena: Vec<Node<T>>,
    /// Handles of the nodes currently in the graph, in graph order.
    order: Vec<NodeId>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Number of nodes currently in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles of the nodes in graph order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    /// Iterates over the nodes in graph order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.order.iter().map(|&id| (id, &self.arena[id.0]))
    }

    /// Creates a node and appends it to the end of the graph.
    ///
    /// Never checks for an existing node with the same value.
    pub fn create_node(&mut self, value: T) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(Node::new(value));
        self.order.push(id);
        id
    }

    /// Adds a link `from -> to`.
    ///
    /// Duplicate links and self-links are kept as given.
    ///
    /// # Panics
    ///
    /// If either handle was not created by this graph.
    pub fn link(&mut self, from: NodeId, to: NodeId) -> &mut Self {
        assert!(
            to.0 < self.arena.len(),
            "node {to} does not belong to this graph"
        );
        self[from].push_link(to);
        self
    }

    /// Removes the first link `from -> to`.
    ///
    /// Returns false if `from` had no such link. Other links from `from` to
    /// `to` stay in place.
    pub fn unlink(&mut self, from: NodeId, to: NodeId) -> bool {
        self[from].remove_link(to)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.arena.get_mut(id.0)
    }

    /// Whether the node is currently part of the graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.order.contains(&id)
    }

    /// Applies `visitor` to every node in graph order.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeId, &Node<T>),
    {
        for &id in &self.order {
            visitor(id, &self.arena[id.0]);
        }
    }

    pub fn visit_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(NodeId, &mut Node<T>),
    {
        for &id in &self.order {
            visitor(id, &mut self.arena[id.0]);
        }
    }

    /// Visits every node and counts those for which `visitor` returns true.
    pub fn counting_visit<F>(&mut self, mut visitor: F) -> usize
    where
        F: FnMut(&mut Node<T>) -> bool,
    {
        let mut count = 0;
        self.visit_mut(|_, node| {
            if visitor(node) {
                count += 1;
            }
        });
        count
    }

    /// Marks every node, returning how many were not marked before.
    pub fn mark(&mut self, mark: &Mark) -> usize {
        self.counting_visit(|node| node.mark(mark.clone()))
    }

    /// Unmarks every node, returning how many were marked before.
    pub fn unmark(&mut self, mark: &Mark) -> usize {
        self.counting_visit(|node| node.unmark(mark))
    }

    /// Removes matching marks from every node, returning how many nodes lost
    /// at least one mark.
    pub fn unmark_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&Mark) -> bool,
    {
        self.counting_visit(|node| node.unmark_where(&mut predicate) > 0)
    }

    /// All nodes matching `predicate`, in graph order.
    pub fn find<P>(&self, mut predicate: P) -> Vec<NodeId>
    where
        P: FnMut(&Node<T>) -> bool,
    {
        let mut found = Vec::new();
        self.visit(|id, node| {
            if predicate(node) {
                found.push(id);
            }
        });
        found
    }

    /// All nodes carrying `mark`, in graph order.
    pub fn find_marked(&self, mark: &Mark) -> Vec<NodeId> {
        self.find(|node| node.is_marked(mark))
    }

    /// Removes a node from the graph.
    ///
    /// Links from other nodes to it are left in place, and a later
    /// [`topological_sort`](Self::topological_sort) that reaches it through
    /// one of them puts it back. Returns false if the node was not in the
    /// graph.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.order.iter().position(|&n| n == id) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes every node matching `predicate` and returns them.
    pub fn remove_where<P>(&mut self, predicate: P) -> Vec<NodeId>
    where
        P: FnMut(&Node<T>) -> bool,
    {
        let removed = self.find(predicate);
        self.order.retain(|id| !removed.contains(id));
        debug!(removed = removed.len(), remaining = self.order.len(), "removed nodes");
        removed
    }

    /// Runs Tarjan's algorithm over the whole graph.
    ///
    /// Components come back in reverse topological order. The graph is left
    /// without any of the scratch marks the algorithm uses.
    pub fn strongly_connected_components(&mut self) -> Vec<StronglyConnectedComponent> {
        StronglyConnectedComponentsFinder::find(self)
    }

    pub(crate) fn replace_nodes(&mut self, order: Vec<NodeId>) {
        self.order = order;
    }
}

impl<T: PartialEq> Graph<T> {
    /// Looks up the single node holding `value`.
    ///
    /// # Panics
    ///
    /// If more than one node holds `value`; see [`try_find_node`](Self::try_find_node)
    /// for a non-panicking lookup.
    pub fn find_node(&self, value: &T) -> Option<NodeId>
    where
        T: fmt::Display,
    {
        match self.try_find_node(value) {
            Ok(found) => found,
            Err(err) => panic!("{err}"),
        }
    }

    /// Looks up the single node holding `value`, reporting an ambiguous
    /// lookup as [`GraphError::AmbiguousLookup`].
    pub fn try_find_node(&self, value: &T) -> Result<Option<NodeId>>
    where
        T: fmt::Display,
    {
        let found = self.find(|node| node.value() == value);
        match found.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(GraphError::ambiguous_lookup(value, found.len())),
        }
    }

    /// Returns the node holding `value`, creating it if there is none.
    pub fn find_or_create_node(&mut self, value: T) -> NodeId
    where
        T: fmt::Display,
    {
        match self.find_node(&value) {
            Some(id) => id,
            None => self.create_node(value),
        }
    }
}

impl<T: fmt::Display> Graph<T> {
    /// Values of the given nodes joined by `", "`.
    pub fn node_names(&self, ids: &[NodeId]) -> String {
        join_values(self, ids, ", ")
    }

    /// Renders one node as `value[marks] -> {links}`.
    pub fn display_node(&self, id: NodeId) -> NodeDisplay<'_, T> {
        NodeDisplay { graph: self, id }
    }
}

pub(crate) fn join_values<T: fmt::Display>(graph: &Graph<T>, ids: &[NodeId], sep: &str) -> String {
    ids.iter()
        .map(|&id| graph[id].value().to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

impl<T> Index<NodeId> for Graph<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        &self.arena[id.0]
    }
}

impl<T> IndexMut<NodeId> for Graph<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.arena[id.0]
    }
}

/// [`Display`](fmt::Display) adapter for a single node, see
/// [`Graph::display_node`].
pub struct NodeDisplay<'a, T> {
    graph: &'a Graph<T>,
    id: NodeId,
}

impl<T: fmt::Display> fmt::Display for NodeDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = &self.graph[self.id];
        write!(f, "{}", node.value())?;
        if node.has_marks() {
            let marks = node
                .marks()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "[{marks}]")?;
        }
        write!(f, " -> {{{}}}", self.graph.node_names(node.links()))
    }
}

impl<T: fmt::Display> fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &id) in self.order.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", self.display_node(id))?;
        }
        Ok(())
    }
}
