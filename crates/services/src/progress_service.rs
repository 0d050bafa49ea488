use std::sync::Arc;

use quiz_core::catalog::Catalog;
use quiz_core::model::{LessonId, LevelId, LevelStatus, Percent};
use storage::keys::ProgressKey;
use storage::repository::{ProgressStore, WriteBatch};

use crate::error::ProgressServiceError;

/// Reads and updates learner progress on top of a `ProgressStore`.
///
/// Level 1 is always unlocked. Any later level is unlocked when its stored flag says so; with
/// no flag stored, it follows the completion of the level before it.
#[derive(Clone)]
pub struct ProgressService {
    catalog: Arc<Catalog>,
    store: Arc<dyn ProgressStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn ProgressStore>) -> Self {
        Self { catalog, store }
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn is_level_unlocked(&self, level: LevelId) -> Result<bool, ProgressServiceError> {
        if level.is_first() {
            return Ok(true);
        }
        let Some(previous) = level.previous() else {
            return Ok(false);
        };
        let previous_completed = self.is_level_completed(previous).await?;
        let unlocked = self
            .store
            .get_bool(ProgressKey::LevelUnlocked(level), previous_completed)
            .await?;
        Ok(unlocked)
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn is_level_completed(&self, level: LevelId) -> Result<bool, ProgressServiceError> {
        let completed = self
            .store
            .get_bool(ProgressKey::LevelCompleted(level), false)
            .await?;
        Ok(completed)
    }

    /// Stored level progress; 0% when nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn level_progress(&self, level: LevelId) -> Result<Percent, ProgressServiceError> {
        let raw = self
            .store
            .get_int(ProgressKey::LevelProgress(level), 0)
            .await?;
        Ok(Percent::clamped(raw))
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn is_lesson_completed(
        &self,
        level: LevelId,
        lesson: LessonId,
    ) -> Result<bool, ProgressServiceError> {
        let completed = self
            .store
            .get_bool(ProgressKey::LessonCompleted(level, lesson), false)
            .await?;
        Ok(completed)
    }

    /// Completed lessons of a catalog level, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn completed_lessons(
        &self,
        level: LevelId,
    ) -> Result<Vec<LessonId>, ProgressServiceError> {
        let Some(entry) = self.catalog.level(level) else {
            return Ok(Vec::new());
        };
        let mut completed = Vec::new();
        for lesson in entry.lessons() {
            if self.is_lesson_completed(level, lesson.id).await? {
                completed.push(lesson.id);
            }
        }
        Ok(completed)
    }

    /// Derived unlock/completion/progress state of a level.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn level_status(&self, level: LevelId) -> Result<LevelStatus, ProgressServiceError> {
        Ok(LevelStatus {
            unlocked: self.is_level_unlocked(level).await?,
            completed: self.is_level_completed(level).await?,
            progress: self.level_progress(level).await?,
        })
    }

    /// Record a completed lesson and recompute the level's progress.
    ///
    /// The lesson flag is written first. Progress is then the share of the level's catalog
    /// lessons that are completed (floor). At 100% the level is marked completed and the next
    /// level unlocked in the same write. For a level missing from the catalog only the lesson
    /// flag is stored.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read or written.
    pub async fn mark_lesson_completed(
        &self,
        level: LevelId,
        lesson: LessonId,
    ) -> Result<(), ProgressServiceError> {
        self.store
            .apply(WriteBatch::new().put_bool(ProgressKey::LessonCompleted(level, lesson), true))
            .await?;
        log::info!("lesson {level}.{lesson} completed");

        let Some(entry) = self.catalog.level(level) else {
            log::warn!("lesson {level}.{lesson} recorded for unknown level {level}");
            return Ok(());
        };

        let completed = self.completed_lessons(level).await?.len();
        let progress = Percent::from_ratio(completed, entry.lessons().len());

        let mut batch =
            WriteBatch::new().put_int(ProgressKey::LevelProgress(level), i64::from(progress.value()));
        if progress.is_full() {
            batch = batch
                .put_bool(ProgressKey::LevelCompleted(level), true)
                .put_bool(ProgressKey::LevelUnlocked(level.next()), true);
        }
        self.store.apply(batch).await?;

        if progress.is_full() {
            log::info!("level {level} completed, level {} unlocked", level.next());
        } else {
            log::debug!("level {level} progress is {progress}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    fn service() -> (ProgressService, Arc<InMemoryStore>) {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let store = Arc::new(InMemoryStore::new());
        (ProgressService::new(catalog, store.clone()), store)
    }

    #[tokio::test]
    async fn fresh_store_only_unlocks_level_one() {
        let (progress, _) = service();
        assert!(progress.is_level_unlocked(LevelId::new(1)).await.unwrap());
        for id in 2..=5 {
            assert!(!progress.is_level_unlocked(LevelId::new(id)).await.unwrap());
        }
        assert_eq!(
            progress.level_progress(LevelId::new(1)).await.unwrap(),
            Percent::ZERO
        );
    }

    #[tokio::test]
    async fn level_one_ignores_stored_flags() {
        let (progress, store) = service();
        store
            .apply(WriteBatch::new().put_bool(ProgressKey::LevelUnlocked(LevelId::new(1)), false))
            .await
            .unwrap();
        assert!(progress.is_level_unlocked(LevelId::new(1)).await.unwrap());
    }

    #[tokio::test]
    async fn unlock_defaults_to_previous_completion() {
        let (progress, store) = service();
        store
            .apply(WriteBatch::new().put_bool(ProgressKey::LevelCompleted(LevelId::new(3)), true))
            .await
            .unwrap();
        assert!(progress.is_level_unlocked(LevelId::new(4)).await.unwrap());
        assert!(!progress.is_level_unlocked(LevelId::new(3)).await.unwrap());
    }

    #[tokio::test]
    async fn partial_level_floors_progress() {
        let (progress, _) = service();
        let level = LevelId::new(3);
        progress
            .mark_lesson_completed(level, LessonId::new(1))
            .await
            .unwrap();

        let status = progress.level_status(level).await.unwrap();
        assert_eq!(status.progress.value(), 33);
        assert!(!status.completed);
        assert!(!progress.is_level_unlocked(LevelId::new(4)).await.unwrap());
    }

    #[tokio::test]
    async fn repeated_completion_does_not_inflate_progress() {
        let (progress, _) = service();
        let level = LevelId::new(2);
        for _ in 0..3 {
            progress
                .mark_lesson_completed(level, LessonId::new(1))
                .await
                .unwrap();
        }
        assert_eq!(progress.level_progress(level).await.unwrap().value(), 50);
    }

    #[tokio::test]
    async fn unknown_level_only_records_the_lesson() {
        let (progress, store) = service();
        let level = LevelId::new(9);
        progress
            .mark_lesson_completed(level, LessonId::new(1))
            .await
            .unwrap();

        assert!(progress.is_lesson_completed(level, LessonId::new(1)).await.unwrap());
        assert_eq!(store.get("level_9_progress").await.unwrap(), None);
        assert_eq!(store.get("level_10_unlocked").await.unwrap(), None);
    }

    #[tokio::test]
    async fn lessons_outside_the_catalog_do_not_count() {
        let (progress, _) = service();
        let level = LevelId::new(1);
        progress
            .mark_lesson_completed(level, LessonId::new(7))
            .await
            .unwrap();
        assert_eq!(progress.level_progress(level).await.unwrap(), Percent::ZERO);
        assert!(progress.completed_lessons(level).await.unwrap().is_empty());
    }
}
