//! I/O boundary traits for testability
//!
//! These traits abstract the catalog backend and the filesystem, allowing
//! services to be tested with mock implementations.

use std::io::{self, Write};
use std::path::Path;

use crate::domain::{Actor, CharacteristicNode, NodeId, Status};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace file content. Readers never observe a partial write.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Source of the current catalog snapshot.
pub trait CatalogSource: Send + Sync {
    /// All records whose status is in `statuses`, in storage order.
    fn list(&self, actor: &Actor, statuses: &[Status]) -> io::Result<Vec<CharacteristicNode>>;

    /// One record regardless of status.
    fn get(&self, actor: &Actor, id: NodeId) -> io::Result<Option<CharacteristicNode>>;
}

/// Sink for record edits.
pub trait PersistenceSink: Send + Sync {
    /// Create (id 0) or update a record, returning its id.
    fn save(&self, actor: &Actor, node: &CharacteristicNode) -> io::Result<NodeId>;

    /// Change the status of an existing record.
    fn set_status(&self, actor: &Actor, id: NodeId, status: Status) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_nested_path_when_writing_then_creates_parent_and_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/catalog.json");
        let fs = RealFileSystem;

        fs.ensure_parent(&path).unwrap();
        fs.write(&path, "[]").unwrap();

        assert!(fs.exists(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn given_existing_file_when_writing_then_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        let fs = RealFileSystem;

        fs.write(&path, "first").unwrap();
        fs.write(&path, "second").unwrap();

        assert_eq!(fs.read_to_string(&path).unwrap(), "second");
    }
}
