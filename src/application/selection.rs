//! Characteristic selection for a subscription
//!
//! The selection owns its state keyed by id; views over the catalog are never
//! written through.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{CharacteristicNode, DomainError, NodeId, SubscriptionDetail};

/// Selected characteristics with their optional limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSelection {
    selected: BTreeMap<NodeId, Option<i64>>,
}

impl FeatureSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preselect the details of an existing subscription.
    ///
    /// Ids missing from `nodes` are dropped; limits are kept only for
    /// characteristics that manage them.
    pub fn from_details(details: &[SubscriptionDetail], nodes: &[CharacteristicNode]) -> Self {
        let by_id: HashMap<NodeId, &CharacteristicNode> =
            nodes.iter().map(|n| (n.id, n)).collect();

        let selected = details
            .iter()
            .filter_map(|detail| {
                let node = by_id.get(&detail.characteristic_id)?;
                let limit = detail.limit.filter(|_| node.payload.manages_limits);
                Some((node.id, limit))
            })
            .collect();

        Self { selected }
    }

    /// Check or uncheck a characteristic. Unchecking forgets its limit.
    pub fn toggle(&mut self, node: &CharacteristicNode, checked: bool) {
        if checked {
            self.selected.entry(node.id).or_insert(None);
        } else {
            self.selected.remove(&node.id);
        }
    }

    pub fn set_limit(
        &mut self,
        node: &CharacteristicNode,
        limit: Option<i64>,
    ) -> Result<(), DomainError> {
        if !node.payload.manages_limits {
            return Err(DomainError::LimitNotManaged(node.id));
        }
        let slot = self
            .selected
            .get_mut(&node.id)
            .ok_or(DomainError::NotSelected(node.id))?;
        *slot = limit;
        Ok(())
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains_key(&id)
    }

    pub fn limit(&self, id: NodeId) -> Option<i64> {
        self.selected.get(&id).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Detail lines to submit, ascending by id.
    pub fn details(&self, nodes: &[CharacteristicNode]) -> Vec<SubscriptionDetail> {
        let by_id: HashMap<NodeId, &CharacteristicNode> =
            nodes.iter().map(|n| (n.id, n)).collect();

        self.selected
            .iter()
            .filter_map(|(&id, &limit)| {
                let node = by_id.get(&id)?;
                Some(SubscriptionDetail {
                    characteristic_id: id,
                    limit: limit.filter(|_| node.payload.manages_limits),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Characteristic, Node};

    fn catalog() -> Vec<CharacteristicNode> {
        vec![
            Node::root(1, Characteristic::new("Users", "users").with_limits(true)),
            Node::root(2, Characteristic::new("Reports", "reports")),
        ]
    }

    #[test]
    fn given_unchecked_feature_when_toggling_off_then_limit_cleared() {
        let nodes = catalog();
        let mut selection = FeatureSelection::new();
        selection.toggle(&nodes[0], true);
        selection.set_limit(&nodes[0], Some(10)).expect("set limit");

        selection.toggle(&nodes[0], false);
        selection.toggle(&nodes[0], true);

        assert!(selection.is_selected(1));
        assert_eq!(selection.limit(1), None);
    }

    #[test]
    fn given_feature_without_limits_when_setting_limit_then_errors() {
        let nodes = catalog();
        let mut selection = FeatureSelection::new();
        selection.toggle(&nodes[1], true);

        let result = selection.set_limit(&nodes[1], Some(3));

        assert_eq!(result, Err(DomainError::LimitNotManaged(2)));
    }
}
