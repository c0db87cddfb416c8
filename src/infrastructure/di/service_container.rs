//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::CatalogService;
use crate::config::Settings;
use crate::domain::Actor;
use crate::infrastructure::json_catalog::JsonFileCatalog;
use crate::infrastructure::traits::{CatalogSource, FileSystem, PersistenceSink, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Catalog listing and editing
    pub catalog: CatalogService,
}

impl ServiceContainer {
    /// Create a new service container backed by the configured JSON file.
    pub fn new(settings: Settings) -> Self {
        Self::with_fs(settings, Arc::new(RealFileSystem))
    }

    /// JSON file backend over a custom filesystem (for testing).
    pub fn with_fs(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let store = Arc::new(JsonFileCatalog::new(settings.data_file.clone(), fs));
        Self::with_backend(settings, store.clone(), store)
    }

    /// Create a service container with a custom backend (for testing).
    pub fn with_backend(
        settings: Settings,
        source: Arc<dyn CatalogSource>,
        sink: Arc<dyn PersistenceSink>,
    ) -> Self {
        let settings = Arc::new(settings);
        let catalog = CatalogService::new(source, sink);

        Self { settings, catalog }
    }

    /// The configured acting user.
    pub fn actor(&self) -> Actor {
        Actor::new(self.settings.user_id)
    }
}
