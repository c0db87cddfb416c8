//! Parent/child index over a flat node snapshot.
//!
//! Records are addressed by their position in the snapshot, never by id, so
//! duplicate ids stay distinct entries.

use std::collections::{BTreeMap, HashMap};

use crate::domain::node::{Node, NodeId};

pub(crate) struct Hierarchy<'a, T> {
    nodes: &'a [Node<T>],
    /// id -> record position, last write wins
    by_id: HashMap<NodeId, usize>,
    /// declared parent id -> child positions, ascending by id
    buckets: BTreeMap<NodeId, Vec<usize>>,
    /// positions of declared roots, ascending by id
    roots: Vec<usize>,
}

impl<'a, T> Hierarchy<'a, T> {
    pub(crate) fn new(nodes: &'a [Node<T>]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut buckets: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
        let mut roots = Vec::new();

        for (idx, node) in nodes.iter().enumerate() {
            by_id.insert(node.id, idx);
            match node.parent() {
                None => roots.push(idx),
                Some(parent) => buckets.entry(parent).or_default().push(idx),
            }
        }

        // stable: equal ids keep input order
        let by_node_id = |idx: &usize| nodes[*idx].id;
        roots.sort_by_key(by_node_id);
        for bucket in buckets.values_mut() {
            bucket.sort_by_key(by_node_id);
        }

        Self {
            nodes,
            by_id,
            buckets,
            roots,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, idx: usize) -> &'a Node<T> {
        &self.nodes[idx]
    }

    pub(crate) fn lookup(&self, id: NodeId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// True when `idx` is the record its id resolves to.
    pub(crate) fn is_identity(&self, idx: usize) -> bool {
        self.lookup(self.nodes[idx].id) == Some(idx)
    }

    pub(crate) fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub(crate) fn children_of(&self, id: NodeId) -> &[usize] {
        self.buckets.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Child buckets in ascending parent id order.
    pub(crate) fn buckets(&self) -> impl Iterator<Item = (NodeId, &[usize])> + '_ {
        self.buckets
            .iter()
            .map(|(&parent, children)| (parent, children.as_slice()))
    }
}
