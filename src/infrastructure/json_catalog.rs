//! JSON file backed catalog
//!
//! The file holds a single array of records. A missing or blank file is an
//! empty catalog.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::domain::{Actor, CharacteristicNode, NodeId, Status};
use crate::infrastructure::traits::{CatalogSource, FileSystem, PersistenceSink};

pub struct JsonFileCatalog {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<Vec<CharacteristicNode>> {
        if !self.fs.exists(&self.path) {
            return Ok(Vec::new());
        }
        let content = self.fs.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let nodes = serde_json::from_str(&content)?;
        Ok(nodes)
    }

    fn store(&self, nodes: &[CharacteristicNode]) -> io::Result<()> {
        self.fs.ensure_parent(&self.path)?;
        let mut json = serde_json::to_string_pretty(nodes)?;
        json.push('\n');
        self.fs.write(&self.path, &json)
    }

    fn modify<R>(
        &self,
        f: impl FnOnce(&mut Vec<CharacteristicNode>) -> io::Result<R>,
    ) -> io::Result<R> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| io::Error::other("catalog lock poisoned"))?;
        let mut nodes = self.load()?;
        let result = f(&mut nodes)?;
        self.store(&nodes)?;
        Ok(result)
    }
}

fn not_found(id: NodeId) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("record {id} not in catalog"))
}

impl CatalogSource for JsonFileCatalog {
    #[instrument(level = "debug", skip(self))]
    fn list(&self, _actor: &Actor, statuses: &[Status]) -> io::Result<Vec<CharacteristicNode>> {
        let nodes: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|n| statuses.contains(&n.payload.status))
            .collect();
        debug!("list: {} records from {}", nodes.len(), self.path.display());
        Ok(nodes)
    }

    #[instrument(level = "debug", skip(self))]
    fn get(&self, _actor: &Actor, id: NodeId) -> io::Result<Option<CharacteristicNode>> {
        Ok(self.load()?.into_iter().find(|n| n.id == id))
    }
}

impl PersistenceSink for JsonFileCatalog {
    #[instrument(level = "debug", skip(self, node), fields(id = node.id))]
    fn save(&self, _actor: &Actor, node: &CharacteristicNode) -> io::Result<NodeId> {
        self.modify(|nodes| {
            if node.id == 0 {
                let id = nodes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
                let mut created = node.clone();
                created.id = id;
                nodes.push(created);
                debug!("save: created record {id}");
                return Ok(id);
            }
            let slot = nodes
                .iter_mut()
                .find(|n| n.id == node.id)
                .ok_or_else(|| not_found(node.id))?;
            *slot = node.clone();
            debug!("save: updated record {}", node.id);
            Ok(node.id)
        })
    }

    #[instrument(level = "debug", skip(self))]
    fn set_status(&self, _actor: &Actor, id: NodeId, status: Status) -> io::Result<()> {
        self.modify(|nodes| {
            let slot = nodes
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| not_found(id))?;
            slot.payload.status = status;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Characteristic, Node};
    use crate::infrastructure::traits::RealFileSystem;
    use tempfile::TempDir;

    fn catalog(temp: &TempDir) -> JsonFileCatalog {
        JsonFileCatalog::new(temp.path().join("catalog.json"), Arc::new(RealFileSystem))
    }

    #[test]
    fn given_missing_file_when_listing_then_empty() {
        let temp = TempDir::new().unwrap();
        let nodes = catalog(&temp)
            .list(&Actor::default(), &[Status::Active])
            .unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn given_new_records_when_saving_then_ids_assigned_in_sequence() {
        let temp = TempDir::new().unwrap();
        let store = catalog(&temp);
        let actor = Actor::new(1);

        let first = store
            .save(&actor, &Node::root(0, Characteristic::new("A", "a")))
            .unwrap();
        let second = store
            .save(&actor, &Node::new(0, Some(first), Characteristic::new("B", "b")))
            .unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(
            store.get(&actor, 2).unwrap().and_then(|n| n.parent()),
            Some(1)
        );
    }

    #[test]
    fn given_archived_record_when_listing_active_then_filtered() {
        let temp = TempDir::new().unwrap();
        let store = catalog(&temp);
        let actor = Actor::default();
        let id = store
            .save(&actor, &Node::root(0, Characteristic::new("A", "a")))
            .unwrap();

        store.set_status(&actor, id, Status::Archived).unwrap();

        assert!(store.list(&actor, &[Status::Active]).unwrap().is_empty());
        assert_eq!(
            store
                .list(&actor, &[Status::Active, Status::Archived])
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn given_status_change_when_storing_then_file_holds_backend_codes() {
        let temp = TempDir::new().unwrap();
        let store = catalog(&temp);
        let actor = Actor::default();
        let first = store
            .save(&actor, &Node::root(0, Characteristic::new("A", "a")))
            .unwrap();
        store
            .save(&actor, &Node::root(0, Characteristic::new("B", "b")))
            .unwrap();

        store.set_status(&actor, first, Status::Archived).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["status"], 3);
        assert_eq!(raw[1]["status"], 2);
    }

    #[test]
    fn given_file_with_status_codes_when_listing_then_decoded() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("catalog.json"),
            r#"[{"id": 1, "name": "A", "technical_name": "a", "status": 2},
                {"id": 2, "name": "B", "technical_name": "b", "status": 3}]"#,
        )
        .unwrap();

        let active = catalog(&temp)
            .list(&Actor::default(), &[Status::Active])
            .unwrap();

        assert_eq!(active.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn given_unknown_id_when_setting_status_then_not_found() {
        let temp = TempDir::new().unwrap();
        let err = catalog(&temp)
            .set_status(&Actor::default(), 42, Status::Archived)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn given_corrupt_file_when_listing_then_invalid_data() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("catalog.json"), "{not json").unwrap();

        let err = catalog(&temp)
            .list(&Actor::default(), &[Status::Active])
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
