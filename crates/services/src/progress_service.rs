use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use catalog_core::ProgressPercent;
use catalog_core::items::lesson_url;
use catalog_core::model::LessonId;
use storage::repository::KeyValueStore;

use crate::error::ProgressError;

/// Key holding the JSON map of lesson id to percent read.
pub const LESSON_PROGRESS_KEY: &str = "lessonProgress";
/// Key holding the id of the lesson opened most recently.
pub const LAST_LESSON_KEY: &str = "lastLessonId";

pub type ProgressMap = BTreeMap<LessonId, ProgressPercent>;

/// Reading progress bookkeeping over a key-value store.
#[derive(Clone)]
pub struct ProgressService {
    kv: Arc<dyn KeyValueStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Store `percent` for `lesson` and remember it as the last lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the stored map is corrupt or the store fails.
    pub async fn record(
        &self,
        lesson: &LessonId,
        percent: ProgressPercent,
    ) -> Result<(), ProgressError> {
        let mut map = self.all().await?;
        map.insert(lesson.clone(), percent);
        let encoded = serde_json::to_string(&map).map_err(|source| ProgressError::Encode {
            key: LESSON_PROGRESS_KEY,
            source,
        })?;
        self.kv.set(LESSON_PROGRESS_KEY, &encoded).await?;
        self.kv.set(LAST_LESSON_KEY, lesson.as_str()).await?;
        debug!(lesson = %lesson, %percent, "progress recorded");
        Ok(())
    }

    /// Record progress from a scroll position.
    ///
    /// # Errors
    ///
    /// Same as [`ProgressService::record`].
    pub async fn record_scroll(
        &self,
        lesson: &LessonId,
        scroll_y: f64,
        document_height: f64,
        viewport_height: f64,
    ) -> Result<ProgressPercent, ProgressError> {
        let percent = ProgressPercent::from_scroll(scroll_y, document_height, viewport_height);
        self.record(lesson, percent).await?;
        Ok(percent)
    }

    /// Stored percent for `lesson`, `0%` when never recorded.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the stored map is corrupt or the store fails.
    pub async fn progress(&self, lesson: &LessonId) -> Result<ProgressPercent, ProgressError> {
        Ok(self.all().await?.get(lesson).copied().unwrap_or_default())
    }

    /// Every recorded percent.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the stored map is corrupt or the store fails.
    pub async fn all(&self) -> Result<ProgressMap, ProgressError> {
        match self.kv.get(LESSON_PROGRESS_KEY).await? {
            None => Ok(ProgressMap::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| ProgressError::Corrupt {
                key: LESSON_PROGRESS_KEY,
                source,
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the store fails.
    pub async fn last_lesson(&self) -> Result<Option<LessonId>, ProgressError> {
        let raw = self.kv.get(LAST_LESSON_KEY).await?;
        Ok(raw
            .filter(|value| !value.trim().is_empty())
            .map(LessonId::new))
    }

    /// Link for the "continue where you left off" action.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the store fails.
    pub async fn continue_target(&self) -> Result<Option<String>, ProgressError> {
        Ok(self
            .last_lesson()
            .await?
            .map(|id| lesson_url(id.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    fn service() -> (ProgressService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (ProgressService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn unrecorded_lesson_reads_zero() {
        let (service, _) = service();
        let value = service.progress(&LessonId::new("x")).await.unwrap();
        assert_eq!(value.value(), 0);
        assert_eq!(service.continue_target().await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_updates_map_and_last_lesson() {
        let (service, store) = service();
        service
            .record(&LessonId::new("a"), ProgressPercent::new(40))
            .await
            .unwrap();
        service
            .record(&LessonId::new("b"), ProgressPercent::new(100))
            .await
            .unwrap();

        let raw = store.get(LESSON_PROGRESS_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"a":40,"b":100}"#);
        assert_eq!(
            service.continue_target().await.unwrap().as_deref(),
            Some("lesson.html?id=b")
        );
        assert_eq!(service.progress(&LessonId::new("a")).await.unwrap().value(), 40);
    }

    #[tokio::test]
    async fn scroll_progress_is_clamped() {
        let (service, _) = service();
        let percent = service
            .record_scroll(&LessonId::new("a"), 5000.0, 2000.0, 1000.0)
            .await
            .unwrap();
        assert_eq!(percent.value(), 100);
    }

    #[tokio::test]
    async fn corrupt_map_is_reported() {
        let (service, store) = service();
        store.set(LESSON_PROGRESS_KEY, "not json").await.unwrap();
        let err = service.all().await.unwrap_err();
        assert!(matches!(err, ProgressError::Corrupt { key: LESSON_PROGRESS_KEY, .. }));
    }

    #[tokio::test]
    async fn record_over_corrupt_map_keeps_the_stored_value() {
        let (service, store) = service();
        store.set(LESSON_PROGRESS_KEY, "[1,2").await.unwrap();
        let err = service
            .record(&LessonId::new("a"), ProgressPercent::new(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::Corrupt { .. }));
        assert_eq!(
            store.get(LESSON_PROGRESS_KEY).await.unwrap().as_deref(),
            Some("[1,2")
        );
        assert_eq!(service.last_lesson().await.unwrap(), None);
    }

    #[test]
    fn encode_and_corrupt_errors_read_differently() {
        let source = || serde_json::from_str::<u8>("x").unwrap_err();
        let encode = ProgressError::Encode {
            key: LESSON_PROGRESS_KEY,
            source: source(),
        };
        let corrupt = ProgressError::Corrupt {
            key: LESSON_PROGRESS_KEY,
            source: source(),
        };
        assert!(encode.to_string().starts_with("failed to encode progress for lessonProgress"));
        assert!(corrupt.to_string().starts_with("stored value under lessonProgress"));
    }

    #[tokio::test]
    async fn blank_last_lesson_is_ignored() {
        let (service, store) = service();
        store.set(LAST_LESSON_KEY, " ").await.unwrap();
        assert_eq!(service.last_lesson().await.unwrap(), None);
    }
}
