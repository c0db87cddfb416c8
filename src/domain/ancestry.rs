//! Parent-chain queries used when editing a record's parent.

use std::collections::{HashSet, VecDeque};

use crate::domain::hierarchy::Hierarchy;
use crate::domain::node::{Node, NodeId};

/// Ids above `id`, nearest first. Stops at a missing parent or at the first
/// repeated id.
pub fn ancestors<T>(nodes: &[Node<T>], id: NodeId) -> Vec<NodeId> {
    let hierarchy = Hierarchy::new(nodes);
    let mut result = Vec::new();
    let mut seen = HashSet::from([id]);

    let mut current = hierarchy
        .lookup(id)
        .and_then(|idx| hierarchy.node(idx).parent());

    while let Some(parent) = current {
        let Some(idx) = hierarchy.lookup(parent) else {
            break;
        };
        if !seen.insert(parent) {
            break;
        }
        result.push(parent);
        current = hierarchy.node(idx).parent();
    }

    result
}

/// Ids below `id` in breadth-first order, `id` itself excluded.
pub fn descendants<T>(nodes: &[Node<T>], id: NodeId) -> Vec<NodeId> {
    let hierarchy = Hierarchy::new(nodes);
    let mut result = Vec::new();
    let mut seen = HashSet::from([id]);
    let mut queue = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        for &child in hierarchy.children_of(current) {
            let child_id = hierarchy.node(child).id;
            if seen.insert(child_id) {
                result.push(child_id);
                queue.push_back(child_id);
            }
        }
    }

    result
}

/// True when giving `id` the parent `new_parent` would close a loop.
pub fn creates_cycle<T>(nodes: &[Node<T>], id: NodeId, new_parent: Option<NodeId>) -> bool {
    match new_parent.filter(|&p| p != crate::domain::node::NO_PARENT) {
        None => false,
        Some(parent) if parent == id => true,
        Some(parent) => ancestors(nodes, parent).contains(&id),
    }
}
