use std::sync::Arc;

use quiz_core::catalog::Catalog;
use quiz_core::model::{Lesson, LessonId, Level, LevelId, OverallProgress};

use crate::error::ProgressServiceError;
use crate::progress_service::ProgressService;

/// Read-only view of the catalog decorated with the learner's progress.
#[derive(Clone)]
pub struct LevelService {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
}

impl LevelService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, progress: Arc<ProgressService>) -> Self {
        Self { catalog, progress }
    }

    /// Every level in ascending id order, with derived flags and completed lessons.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if progress cannot be read.
    pub async fn all_levels(&self) -> Result<Vec<Level>, ProgressServiceError> {
        let mut levels = Vec::with_capacity(self.catalog.len());
        for level in self.catalog.levels() {
            levels.push(self.snapshot(level).await?);
        }
        Ok(levels)
    }

    /// Returns `Ok(None)` when the level does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if progress cannot be read.
    pub async fn level_by_id(&self, id: LevelId) -> Result<Option<Level>, ProgressServiceError> {
        match self.catalog.level(id) {
            Some(level) => Ok(Some(self.snapshot(level).await?)),
            None => Ok(None),
        }
    }

    /// Returns `Ok(None)` when either id does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if progress cannot be read.
    pub async fn lesson_by_id(
        &self,
        level_id: LevelId,
        lesson_id: LessonId,
    ) -> Result<Option<Lesson>, ProgressServiceError> {
        let Some(lesson) = self.catalog.lesson(level_id, lesson_id) else {
            return Ok(None);
        };
        let completed = self
            .progress
            .is_lesson_completed(level_id, lesson_id)
            .await?;
        Ok(Some(lesson.clone().with_completed(completed)))
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if progress cannot be read.
    pub async fn overall_progress(&self) -> Result<OverallProgress, ProgressServiceError> {
        let levels = self.all_levels().await?;
        Ok(OverallProgress::from_levels(&levels))
    }

    async fn snapshot(&self, level: &Level) -> Result<Level, ProgressServiceError> {
        let status = self.progress.level_status(level.id()).await?;
        let completed = self.progress.completed_lessons(level.id()).await?;
        Ok(level.clone().with_status(status, &completed))
    }
}
