//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::catalog::CatalogError;
use quiz_core::model::{LessonId, LevelId};
use quiz_core::quiz::{QuizError, QuizResult};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService` and `LevelService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("level {0} not found")]
    LevelNotFound(LevelId),
    #[error("lesson {lesson} not found in level {level}")]
    LessonNotFound { level: LevelId, lesson: LessonId },
    #[error("level {0} is locked")]
    LevelLocked(LevelId),
    /// The attempt finished and passed but the completed lesson could not be stored.
    /// `result` can be handed back to `QuizService::record` once the store recovers.
    #[error("passed quiz {}.{} was not recorded", .result.level_id, .result.lesson_id)]
    NotRecorded {
        result: Box<QuizResult>,
        source: ProgressServiceError,
    },
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
