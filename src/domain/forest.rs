//! Arena forest of a snapshot: the traversal behind the flattened view and
//! the tree rendering.

use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::hierarchy::Hierarchy;
use crate::domain::node::{Node, NodeId};

/// Node of the emitted forest, borrowing the snapshot record.
#[derive(Debug)]
pub struct ForestNode<'a, T> {
    /// Snapshot record for this node
    pub node: &'a Node<T>,
    /// Index of the parent in the arena, None for roots
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, ascending by id
    pub children: Vec<Index>,
    /// Number of ancestors above this node, roots are 0
    pub depth: usize,
}

/// Arena-based forest built from a flat, possibly malformed snapshot.
///
/// Every snapshot record lives in exactly one node. Roots are the declared
/// roots in id order, followed by the entry points of whatever they could not
/// reach (dangling chains and cycles).
#[derive(Debug)]
pub struct Forest<'a, T> {
    /// Arena storage for all forest nodes
    arena: Arena<ForestNode<'a, T>>,
    /// Root indices in emission order
    roots: Vec<Index>,
}

impl<'a, T> Default for Forest<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> Forest<'a, T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    #[instrument(level = "trace", skip(self, node), fields(id = node.id))]
    pub fn insert_node(&mut self, node: &'a Node<T>, parent: Option<Index>) -> Index {
        let depth = parent
            .and_then(|p| self.arena.get(p))
            .map(|p| p.depth + 1)
            .unwrap_or(0);
        let node_idx = self.arena.insert(ForestNode {
            node,
            parent,
            children: Vec::new(),
            depth,
        });

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ForestNode<'a, T>> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Arena index of the first emitted node with this id.
    pub fn find(&self, id: NodeId) -> Option<Index> {
        self.iter().find(|(_, n)| n.node.id == id).map(|(idx, _)| idx)
    }

    /// Pre-order, roots in emission order, children left to right.
    pub fn iter(&self) -> PreOrderIterator<'_, 'a, T> {
        PreOrderIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, 'a, T> {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest branch, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.arena
            .iter()
            .map(|(_, n)| n.depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Ids of childless nodes in pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, n)| n.children.is_empty())
            .map(|(_, n)| n.node.id)
            .collect()
    }
}

/// Build the forest of a snapshot.
///
/// Declared roots are walked first, ascending by id. The snapshot is then
/// swept in input order; a record not yet emitted starts a new walk from the
/// top of its unreachable parent chain, or from the record where that chain
/// loops back on itself. A record is marked before its children are pushed,
/// so cycles stop at the first record seen twice.
#[instrument(level = "debug", skip(nodes), fields(count = nodes.len()))]
pub fn build_forest<T>(nodes: &[Node<T>]) -> Forest<'_, T> {
    let hierarchy = Hierarchy::new(nodes);
    let mut forest = Forest::new();
    let mut visited = vec![false; hierarchy.len()];

    for &root in hierarchy.roots() {
        walk(&hierarchy, &mut forest, &mut visited, root);
    }

    let mut secondary = 0usize;
    for idx in 0..hierarchy.len() {
        if !visited[idx] {
            secondary += 1;
            let start = sweep_start(&hierarchy, &visited, idx);
            walk(&hierarchy, &mut forest, &mut visited, start);
        }
    }
    if secondary > 0 {
        tracing::debug!(secondary, "unreachable records emitted as roots");
    }

    forest
}

/// Topmost unvisited ancestor of `idx`, or the first record met twice when
/// climbing the parent chain.
fn sweep_start<T>(hierarchy: &Hierarchy<'_, T>, visited: &[bool], idx: usize) -> usize {
    let mut on_path = HashSet::from([idx]);
    let mut current = idx;

    while let Some(parent) = hierarchy
        .node(current)
        .parent()
        .and_then(|id| hierarchy.lookup(id))
    {
        if visited[parent] {
            break;
        }
        if !on_path.insert(parent) {
            return parent;
        }
        current = parent;
    }

    current
}

fn walk<'a, T>(
    hierarchy: &Hierarchy<'a, T>,
    forest: &mut Forest<'a, T>,
    visited: &mut [bool],
    start: usize,
) {
    let mut stack: Vec<(usize, Option<Index>)> = vec![(start, None)];

    while let Some((current, parent_idx)) = stack.pop() {
        if visited[current] {
            continue;
        }
        visited[current] = true;

        let node = hierarchy.node(current);
        let current_idx = forest.insert_node(node, parent_idx);

        // a shadowed duplicate has no children of its own
        if !hierarchy.is_identity(current) {
            continue;
        }

        // reverse push keeps ascending id order on pop
        for &child in hierarchy.children_of(node.id).iter().rev() {
            if !visited[child] {
                stack.push((child, Some(current_idx)));
            }
        }
    }
}

pub struct PreOrderIterator<'f, 'a, T> {
    forest: &'f Forest<'a, T>,
    stack: Vec<Index>,
}

impl<'f, 'a, T> PreOrderIterator<'f, 'a, T> {
    fn new(forest: &'f Forest<'a, T>) -> Self {
        let stack = forest.roots().iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'f, 'a, T> Iterator for PreOrderIterator<'f, 'a, T> {
    type Item = (Index, &'f ForestNode<'a, T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'f, 'a, T> {
    forest: &'f Forest<'a, T>,
    stack: Vec<(Index, bool)>,
}

impl<'f, 'a, T> PostOrderIterator<'f, 'a, T> {
    fn new(forest: &'f Forest<'a, T>) -> Self {
        let stack = forest
            .roots()
            .iter()
            .rev()
            .map(|&root| (root, false))
            .collect();
        Self { forest, stack }
    }
}

impl<'f, 'a, T> Iterator for PostOrderIterator<'f, 'a, T> {
    type Item = (Index, &'f ForestNode<'a, T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
