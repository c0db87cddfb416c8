//! Flattened tree: pre-order sequence with a level per record, for indented lists.

use serde::Serialize;
use tracing::instrument;

use crate::domain::forest::{build_forest, Forest};
use crate::domain::node::{Node, NodeId};

/// One line of an indented listing.
#[derive(Debug, Serialize)]
pub struct FlatEntry<'a, T> {
    pub node: &'a Node<T>,
    pub level: usize,
}

impl<T> Clone for FlatEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FlatEntry<'_, T> {}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct FlattenedTree<'a, T> {
    entries: Vec<FlatEntry<'a, T>>,
}

impl<'a, T> FlattenedTree<'a, T> {
    pub fn entries(&self) -> &[FlatEntry<'a, T>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlatEntry<'a, T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the first entry with this id.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.node.id == id)
    }

    /// `(id, level)` pairs in emission order.
    pub fn pairs(&self) -> Vec<(NodeId, usize)> {
        self.entries.iter().map(|e| (e.node.id, e.level)).collect()
    }
}

impl<'a, 'v, T> IntoIterator for &'v FlattenedTree<'a, T> {
    type Item = &'v FlatEntry<'a, T>;
    type IntoIter = std::slice::Iter<'v, FlatEntry<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a, T> From<&Forest<'a, T>> for FlattenedTree<'a, T> {
    fn from(forest: &Forest<'a, T>) -> Self {
        let entries = forest
            .iter()
            .map(|(_, n)| FlatEntry {
                node: n.node,
                level: n.depth,
            })
            .collect();
        Self { entries }
    }
}

/// Depth-first, pre-order flattening of a snapshot.
///
/// Every record is emitted exactly once: declared roots (parent absent or 0)
/// first in id order, then whatever the roots could not reach, entered at
/// level 0 in snapshot order. Never fails.
#[instrument(level = "debug", skip(nodes), fields(count = nodes.len()))]
pub fn build_flattened<T>(nodes: &[Node<T>]) -> FlattenedTree<'_, T> {
    let forest = build_forest(nodes);
    FlattenedTree::from(&forest)
}
