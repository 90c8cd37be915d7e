use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::config::{CatalogConfig, ContentLocation, ProgressBackend};
use crate::content::{ContentLoader, ContentSource, FsContentSource, HttpContentSource};
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services for the configured content location and progress backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if `SQLite` storage initialization fails.
    pub async fn new(config: &CatalogConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let source: Arc<dyn ContentSource> = match &config.content {
            ContentLocation::Http(base) => Arc::new(HttpContentSource::new(base.clone())),
            ContentLocation::Directory(root) => Arc::new(FsContentSource::new(root.clone())),
        };
        let storage = match &config.progress {
            ProgressBackend::Memory => Storage::in_memory(),
            ProgressBackend::Sqlite(url) => Storage::sqlite(url).await?,
        };
        Ok(Self::from_parts(source, storage, clock))
    }

    /// Build services over the given content source with in-memory progress.
    #[must_use]
    pub fn in_memory(source: Arc<dyn ContentSource>, clock: Clock) -> Self {
        Self::from_parts(source, Storage::in_memory(), clock)
    }

    fn from_parts(source: Arc<dyn ContentSource>, storage: Storage, clock: Clock) -> Self {
        Self {
            clock,
            catalog: Arc::new(CatalogService::new(ContentLoader::new(source))),
            progress: Arc::new(ProgressService::new(Arc::clone(&storage.kv))),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
