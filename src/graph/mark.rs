//! Marks: equality-compared tags attached to nodes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Payload of a user-defined mark.
///
/// Blanket-implemented for every `PartialEq + Debug + Display` type, so any
/// enum or struct can be used as a mark through [`Mark::custom`]. Two custom
/// marks are equal when they have the same concrete type and compare equal.
pub trait CustomMark: fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    fn eq_mark(&self, other: &dyn CustomMark) -> bool;
}

impl<M> CustomMark for M
where
    M: PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_mark(&self, other: &dyn CustomMark) -> bool {
        other
            .as_any()
            .downcast_ref::<M>()
            .is_some_and(|other| self == other)
    }
}

#[derive(Debug, Clone)]
enum MarkKind {
    Tag(String),
    Custom(Arc<dyn CustomMark>),
    /// Discovery index, only present while components are being computed.
    Index(usize),
    /// Lowest index reachable, only present while components are being computed.
    Root(usize),
}

/// A tag attached to a node, compared by value.
#[derive(Debug, Clone)]
pub struct Mark(MarkKind);

impl Mark {
    /// A plain string mark.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self(MarkKind::Tag(tag.into()))
    }

    /// A mark carrying a caller-defined value.
    pub fn custom<M: CustomMark>(value: M) -> Self {
        Self(MarkKind::Custom(Arc::new(value)))
    }

    pub(crate) fn index(index: usize) -> Self {
        Self(MarkKind::Index(index))
    }

    pub(crate) fn root(index: usize) -> Self {
        Self(MarkKind::Root(index))
    }

    /// Returns the string if this is a tag mark.
    pub fn as_tag(&self) -> Option<&str> {
        match &self.0 {
            MarkKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self.0, MarkKind::Tag(_))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.0, MarkKind::Custom(_))
    }

    /// Returns the payload of a custom mark of type `M`.
    pub fn downcast_ref<M: CustomMark>(&self) -> Option<&M> {
        match &self.0 {
            MarkKind::Custom(value) => value.as_any().downcast_ref::<M>(),
            _ => None,
        }
    }

    pub(crate) fn as_index(&self) -> Option<usize> {
        match self.0 {
            MarkKind::Index(index) => Some(index),
            _ => None,
        }
    }

    pub(crate) fn as_root(&self) -> Option<usize> {
        match self.0 {
            MarkKind::Root(index) => Some(index),
            _ => None,
        }
    }

    /// True for the scratch marks used while computing components.
    pub(crate) fn is_internal(&self) -> bool {
        matches!(self.0, MarkKind::Index(_) | MarkKind::Root(_))
    }
}

impl PartialEq for Mark {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (MarkKind::Tag(a), MarkKind::Tag(b)) => a == b,
            (MarkKind::Custom(a), MarkKind::Custom(b)) => a.eq_mark(b.as_ref()),
            (MarkKind::Index(a), MarkKind::Index(b)) => a == b,
            (MarkKind::Root(a), MarkKind::Root(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            MarkKind::Tag(tag) => f.write_str(tag),
            MarkKind::Custom(value) => fmt::Display::fmt(value, f),
            MarkKind::Index(index) => write!(f, "index:{index}"),
            MarkKind::Root(index) => write!(f, "root:{index}"),
        }
    }
}

impl From<&str> for Mark {
    fn from(tag: &str) -> Self {
        Mark::tag(tag)
    }
}

impl From<String> for Mark {
    fn from(tag: String) -> Self {
        Mark::tag(tag)
    }
}
