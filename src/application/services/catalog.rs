//! Catalog service
//!
//! Lists the characteristic catalog, derives its views and applies edits
//! (status toggles, create/update) through the persistence sink.

use std::collections::HashSet;
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{
    build_flattened, build_forest, build_groups, creates_cycle, descendants, Actor,
    Characteristic, CharacteristicNode, DomainError, FlattenedTree, Forest, GroupedView, NodeId,
    Status, StatusFilter,
};
use crate::infrastructure::traits::{CatalogSource, PersistenceSink};

/// Point-in-time copy of the catalog. Views borrow from it and are rebuilt on
/// every call.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    nodes: Vec<CharacteristicNode>,
}

impl CatalogSnapshot {
    pub fn new(nodes: Vec<CharacteristicNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[CharacteristicNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&CharacteristicNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn groups(&self) -> GroupedView<'_, Characteristic> {
        build_groups(&self.nodes)
    }

    pub fn flattened(&self) -> FlattenedTree<'_, Characteristic> {
        build_flattened(&self.nodes)
    }

    pub fn forest(&self) -> Forest<'_, Characteristic> {
        build_forest(&self.nodes)
    }
}

/// Service for listing and editing the characteristic catalog.
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    sink: Arc<dyn PersistenceSink>,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>, sink: Arc<dyn PersistenceSink>) -> Self {
        Self { source, sink }
    }

    /// Fetch the records matching `filter`.
    #[instrument(level = "debug", skip(self))]
    pub fn snapshot(&self, actor: &Actor, filter: StatusFilter) -> ApplicationResult<CatalogSnapshot> {
        let nodes = self
            .source
            .list(actor, filter.statuses())
            .with_context("list catalog")?;
        debug!("snapshot: {} records", nodes.len());
        Ok(CatalogSnapshot::new(nodes))
    }

    /// Fetch one record regardless of status.
    #[instrument(level = "debug", skip(self))]
    pub fn get(&self, actor: &Actor, id: NodeId) -> ApplicationResult<CharacteristicNode> {
        self.source
            .get(actor, id)
            .with_context(format!("read record {id}"))?
            .ok_or_else(|| DomainError::NodeNotFound(id).into())
    }

    /// Flip a record between active and archived. Returns the new status.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_status(&self, actor: &Actor, id: NodeId) -> ApplicationResult<Status> {
        let node = self.get(actor, id)?;
        let next = node.payload.status.toggled();
        self.sink
            .set_status(actor, id, next)
            .with_context(format!("set status of record {id}"))?;
        info!("record {} is now {}", id, next);
        Ok(next)
    }

    /// Create (id 0) or update a record.
    ///
    /// Rejects blank names, a missing characteristic type, a parent that does
    /// not exist, the record itself as parent, and a parent below the record.
    /// New records are saved active.
    #[instrument(level = "debug", skip(self, draft), fields(id = draft.id))]
    pub fn save(&self, actor: &Actor, mut draft: CharacteristicNode) -> ApplicationResult<NodeId> {
        validate_draft(&draft)?;
        draft.parent_id = draft.parent();

        let all = self
            .source
            .list(actor, StatusFilter::All.statuses())
            .with_context("list catalog")?;

        let is_new = draft.id == 0;
        if !is_new && !all.iter().any(|n| n.id == draft.id) {
            return Err(DomainError::NodeNotFound(draft.id).into());
        }

        if let Some(parent) = draft.parent() {
            if parent == draft.id || !all.iter().any(|n| n.id == parent) {
                return Err(DomainError::InvalidParent {
                    id: draft.id,
                    parent,
                }
                .into());
            }
            if !is_new && creates_cycle(&all, draft.id, Some(parent)) {
                return Err(DomainError::CycleDetected {
                    id: draft.id,
                    parent,
                }
                .into());
            }
        }

        if is_new {
            draft.payload.status = Status::Active;
        }

        let id = self
            .sink
            .save(actor, &draft)
            .with_context(format!("save record {}", draft.id))?;
        info!("saved record {}", id);
        Ok(id)
    }

    /// Active records that may become the parent of `id`.
    ///
    /// Excludes the record itself and everything below it. `None` is a record
    /// that does not exist yet, for which every active record qualifies.
    #[instrument(level = "debug", skip(self))]
    pub fn parent_candidates(
        &self,
        actor: &Actor,
        id: Option<NodeId>,
    ) -> ApplicationResult<Vec<CharacteristicNode>> {
        let all = self
            .source
            .list(actor, StatusFilter::All.statuses())
            .with_context("list catalog")?;

        let excluded: HashSet<NodeId> = match id {
            Some(id) => descendants(&all, id).into_iter().chain([id]).collect(),
            None => HashSet::new(),
        };

        Ok(all
            .into_iter()
            .filter(|n| n.payload.status == Status::Active && !excluded.contains(&n.id))
            .sorted_by_key(|n| n.id)
            .collect())
    }
}

/// Required fields: both names non-blank and a characteristic type.
fn validate_draft(draft: &CharacteristicNode) -> Result<(), DomainError> {
    let blank = [
        ("name", &draft.payload.name),
        ("technical_name", &draft.payload.technical_name),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field);
    let missing_kind = (draft.payload.kind <= 0).then_some("kind");

    let missing = blank.chain(missing_kind).join(", ");
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InvalidNode {
            id: draft.id,
            message: format!("required: {missing}"),
        })
    }
}
