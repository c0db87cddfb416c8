//! Catalog node: an id, an optional parent id and an opaque payload.

use serde::{Deserialize, Serialize};

/// Identifier of a catalog record.
pub type NodeId = i64;

/// Parent id the backend uses for "no parent".
pub const NO_PARENT: NodeId = 0;

/// A self-referencing catalog record.
///
/// The payload is carried through every view untouched; the tree builders
/// only look at `id` and `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<T> {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Node<T> {
    pub fn new(id: NodeId, parent_id: Option<NodeId>, payload: T) -> Self {
        Self {
            id,
            parent_id,
            payload,
        }
    }

    /// Create a node without a parent.
    pub fn root(id: NodeId, payload: T) -> Self {
        Self::new(id, None, payload)
    }

    /// Declared parent, with `NO_PARENT` folded into `None`.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent_id.filter(|&parent| parent != NO_PARENT)
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// True when the node names itself as parent.
    pub fn is_self_parented(&self) -> bool {
        self.parent() == Some(self.id)
    }
}
