//! Grouped view: every parent with its direct children, one level deep.
//!
//! Children whose declared parent is not in the snapshot are collected into a
//! single trailing group without a parent.

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use crate::domain::hierarchy::Hierarchy;
use crate::domain::node::{Node, NodeId};

/// A parent and its direct children. `parent` is `None` for the orphans bucket.
#[derive(Debug, Serialize)]
pub struct Group<'a, T> {
    pub parent: Option<&'a Node<T>>,
    pub children: Vec<&'a Node<T>>,
}

impl<'a, T> Group<'a, T> {
    pub fn is_orphans(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent.map(|p| p.id)
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children.iter().map(|c| c.id).collect()
    }
}

// derive(Clone) would require T: Clone
impl<T> Clone for Group<'_, T> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent,
            children: self.children.clone(),
        }
    }
}

/// Ordered groups: parents ascending by id, orphans last.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GroupedView<'a, T> {
    groups: Vec<Group<'a, T>>,
}

impl<'a, T> GroupedView<'a, T> {
    pub fn groups(&self) -> &[Group<'a, T>] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<'a, T>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The trailing orphans bucket, if any record points at a missing parent.
    pub fn orphans(&self) -> Option<&Group<'a, T>> {
        self.groups.last().filter(|g| g.is_orphans())
    }

    /// Group headed by the record with this id.
    pub fn group_of(&self, id: NodeId) -> Option<&Group<'a, T>> {
        self.groups.iter().find(|g| g.parent_id() == Some(id))
    }

    /// `(parent id, child ids)` pairs, handy for assertions and logging.
    pub fn outline(&self) -> Vec<(Option<NodeId>, Vec<NodeId>)> {
        self.groups
            .iter()
            .map(|g| (g.parent_id(), g.child_ids()))
            .collect()
    }
}

impl<'a, 'v, T> IntoIterator for &'v GroupedView<'a, T> {
    type Item = &'v Group<'a, T>;
    type IntoIter = std::slice::Iter<'v, Group<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group a flat snapshot by parent.
///
/// Parents are the declared roots plus every record that some other record
/// names as parent, one per id. On duplicate ids only the record the id index
/// resolves to (last write wins) heads a group and receives that id's
/// children; a shadowed root goes to the parentless bucket. Never fails;
/// empty input gives an empty view.
#[instrument(level = "debug", skip(nodes), fields(count = nodes.len()))]
pub fn build_groups<T>(nodes: &[Node<T>]) -> GroupedView<'_, T> {
    let hierarchy = Hierarchy::new(nodes);
    let by_position = |idx: &usize| (hierarchy.node(*idx).id, *idx);

    let (mut parents, mut orphans): (Vec<usize>, Vec<usize>) = hierarchy
        .roots()
        .iter()
        .copied()
        .partition(|&idx| hierarchy.is_identity(idx));
    let mut seen: HashSet<usize> = parents.iter().copied().collect();

    for (parent_id, children) in hierarchy.buckets() {
        match hierarchy.lookup(parent_id) {
            Some(idx) => {
                if seen.insert(idx) {
                    parents.push(idx);
                }
            }
            None => orphans.extend_from_slice(children),
        }
    }

    parents.sort_by_key(by_position);
    orphans.sort_by_key(by_position);

    let mut groups: Vec<Group<'_, T>> = parents
        .into_iter()
        .map(|idx| {
            let parent = hierarchy.node(idx);
            let children = hierarchy
                .children_of(parent.id)
                .iter()
                .filter(|&&child| child != idx)
                .map(|&child| hierarchy.node(child))
                .collect();
            Group {
                parent: Some(parent),
                children,
            }
        })
        .collect();

    if !orphans.is_empty() {
        tracing::debug!(count = orphans.len(), "records with a missing parent");
        groups.push(Group {
            parent: None,
            children: orphans.into_iter().map(|idx| hierarchy.node(idx)).collect(),
        });
    }

    GroupedView { groups }
}
