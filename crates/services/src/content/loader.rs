use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use catalog_core::Catalog;
use catalog_core::catalog::referenced_lesson_ids;
use catalog_core::model::{Course, Lesson, LessonId};

use super::source::ContentSource;
use crate::error::ContentLoadError;

pub const MANIFEST_PATH: &str = "content/courses.json";

/// Relative path of a lesson document.
#[must_use]
pub fn lesson_path(id: &LessonId) -> String {
    format!("content/lessons/{id}.json")
}

/// The course manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub courses: Vec<Course>,
}

/// Loads the manifest and every referenced lesson into a `Catalog`.
#[derive(Clone)]
pub struct ContentLoader {
    source: Arc<dyn ContentSource>,
    manifest_path: String,
}

impl ContentLoader {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            manifest_path: MANIFEST_PATH.to_owned(),
        }
    }

    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<String>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Fetch the manifest, then every distinct referenced lesson concurrently.
    ///
    /// No partial catalog is ever returned.
    ///
    /// # Errors
    ///
    /// Returns the first `ContentLoadError` hit by the manifest or any lesson.
    pub async fn load(&self) -> Result<Catalog, ContentLoadError> {
        info!(manifest = %self.manifest_path, "loading catalog");
        let manifest: Manifest = fetch_json(self.source.as_ref(), &self.manifest_path).await?;

        let ids = referenced_lesson_ids(&manifest.courses);
        let lessons = self.load_lessons(ids).await?;

        info!(
            courses = manifest.courses.len(),
            lessons = lessons.len(),
            "catalog loaded"
        );
        Ok(Catalog::new(manifest.courses, lessons))
    }

    async fn load_lessons(&self, ids: Vec<LessonId>) -> Result<Vec<Lesson>, ContentLoadError> {
        let mut slots: Vec<Option<Lesson>> = Vec::with_capacity(ids.len());
        slots.resize_with(ids.len(), || None);

        let mut tasks = JoinSet::new();
        for (slot, id) in ids.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            tasks.spawn(async move {
                let path = lesson_path(&id);
                debug!(lesson = %id, "fetching lesson");
                let lesson = fetch_json::<Lesson>(source.as_ref(), &path).await;
                (slot, lesson)
            });
        }

        // Dropping the set on early return aborts the remaining fetches.
        while let Some(joined) = tasks.join_next().await {
            let (slot, lesson) = joined?;
            slots[slot] = Some(lesson?);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

async fn fetch_json<T: DeserializeOwned>(
    source: &dyn ContentSource,
    path: &str,
) -> Result<T, ContentLoadError> {
    let body = source.fetch(path).await.inspect_err(|err| {
        warn!(resource = path, error = %err, "content fetch failed");
    })?;
    serde_json::from_str(&body).map_err(|source| {
        warn!(resource = path, error = %source, "content decode failed");
        ContentLoadError::Decode {
            resource: path.to_owned(),
            source,
        }
    })
}
