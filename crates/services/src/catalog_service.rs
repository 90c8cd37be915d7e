use catalog_core::model::{CourseId, LessonId};
use catalog_core::pages::{CoursePage, LessonPage};
use catalog_core::{BrowseSession, Catalog, build_items};

use crate::content::ContentLoader;
use crate::error::CatalogError;

/// Loads the catalog and derives the per-page views from it.
///
/// Every call to `load` fetches fresh content; nothing is cached between calls.
#[derive(Clone)]
pub struct CatalogService {
    loader: ContentLoader,
}

impl CatalogService {
    #[must_use]
    pub fn new(loader: ContentLoader) -> Self {
        Self { loader }
    }

    /// Load the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if any document fails to load.
    pub async fn load(&self) -> Result<Catalog, CatalogError> {
        Ok(self.loader.load().await?)
    }

    /// Load the catalog and start a browse session over its items.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if any document fails to load.
    pub async fn browse(&self) -> Result<BrowseSession, CatalogError> {
        let catalog = self.load().await?;
        Ok(BrowseSession::new(build_items(&catalog)))
    }
}

/// Course page for `id`, falling back to the first course.
///
/// # Errors
///
/// Returns `CatalogError::EmptyCatalog` when there is no course at all.
pub fn course_page<'a>(
    catalog: &'a Catalog,
    id: Option<&CourseId>,
) -> Result<CoursePage<'a>, CatalogError> {
    CoursePage::build(catalog, id).ok_or(CatalogError::EmptyCatalog)
}

/// Lesson page for `id`, or the first lesson of the catalog.
///
/// # Errors
///
/// Returns `CatalogError::LessonNotFound` when the lesson or its course is missing.
pub fn lesson_page<'a>(
    catalog: &'a Catalog,
    id: Option<&LessonId>,
) -> Result<LessonPage<'a>, CatalogError> {
    Ok(LessonPage::build(catalog, id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{InMemoryContentSource, MANIFEST_PATH};
    use serde_json::json;
    use std::sync::Arc;

    fn service(manifest: serde_json::Value) -> CatalogService {
        let source = InMemoryContentSource::new()
            .with_json(MANIFEST_PATH, &manifest)
            .with_json(
                "content/lessons/l1.json",
                &json!({ "id": "l1", "title": "Knife Skills", "tags": ["knives"] }),
            );
        CatalogService::new(ContentLoader::new(Arc::new(source)))
    }

    #[tokio::test]
    async fn browse_session_starts_unfiltered() {
        let service = service(json!({ "courses": [{
            "id": "c1", "title": "Cooking 101", "difficulty": "Beginner",
            "category": "Cooking", "modules": [{ "title": "M", "lessons": ["l1"] }]
        }]}));
        let session = service.browse().await.unwrap();
        let results = session.run("");
        assert_eq!(results.len(), 2);
        assert_eq!(results.count_label(), "2 results");
    }

    #[tokio::test]
    async fn empty_catalog_has_no_course_page() {
        let service = service(json!({ "courses": [] }));
        let catalog = service.load().await.unwrap();
        assert!(matches!(
            course_page(&catalog, None),
            Err(CatalogError::EmptyCatalog)
        ));
        let err = lesson_page(&catalog, None).unwrap_err();
        assert_eq!(err.to_string(), "Lesson not found");
    }
}
