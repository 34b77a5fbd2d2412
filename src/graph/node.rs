//! A single vertex of a [`Graph`](super::Graph).

use super::mark::Mark;
use super::NodeId;

/// A graph vertex: a value, its outgoing links and the marks attached to it.
///
/// Nodes are owned by the graph that created them and are addressed by
/// [`NodeId`]. Links are handles into the same graph, kept in insertion order,
/// duplicates and self-links included.
#[derive(Debug, Clone)]
pub struct Node<T> {
    value: T,
    links: Vec<NodeId>,
    marks: Vec<Mark>,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            links: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Outgoing links in the order they were added.
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    /// Attached marks in the order they were added.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub(crate) fn push_link(&mut self, target: NodeId) {
        self.links.push(target);
    }

    /// Removes the first link to `target`, returning whether there was one.
    pub(crate) fn remove_link(&mut self, target: NodeId) -> bool {
        match self.links.iter().position(|&link| link == target) {
            Some(pos) => {
                self.links.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_linked_to(&self, target: NodeId) -> bool {
        self.links.contains(&target)
    }

    /// True if every one of `targets` is linked, regardless of order.
    pub fn is_linked_to_all(&self, targets: &[NodeId]) -> bool {
        targets.iter().all(|target| self.links.contains(target))
    }

    /// Attaches `mark` unless an equal mark is already present.
    ///
    /// Returns whether the node changed.
    pub fn mark(&mut self, mark: Mark) -> bool {
        if self.marks.contains(&mark) {
            return false;
        }
        self.marks.push(mark);
        true
    }

    /// Removes the first mark equal to `mark`.
    ///
    /// Returns whether the node was marked.
    pub fn unmark(&mut self, mark: &Mark) -> bool {
        match self.marks.iter().position(|m| m == mark) {
            Some(pos) => {
                self.marks.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes every mark matching `predicate`, returning how many went.
    pub fn unmark_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&Mark) -> bool,
    {
        let before = self.marks.len();
        self.marks.retain(|mark| !predicate(mark));
        before - self.marks.len()
    }

    pub fn is_marked(&self, mark: &Mark) -> bool {
        self.marks.contains(mark)
    }

    pub fn has_marks(&self) -> bool {
        !self.marks.is_empty()
    }

    pub(crate) fn find_mark<R, F>(&self, f: F) -> Option<R>
    where
        F: FnMut(&Mark) -> Option<R>,
    {
        self.marks.iter().find_map(f)
    }
}
