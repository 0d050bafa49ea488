use std::sync::Arc;

use quiz_core::catalog::Catalog;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::level_service::LevelService;
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;

/// Assembles app-facing services over one catalog and one store.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
    levels: Arc<LevelService>,
    quiz: Arc<QuizService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the embedded catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog is invalid or storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = Catalog::embedded()?;
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_parts(catalog, &storage, clock))
    }

    /// Build services over an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the embedded catalog is invalid.
    pub fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = Catalog::embedded()?;
        Ok(Self::from_parts(catalog, &Storage::in_memory(), clock))
    }

    #[must_use]
    pub fn from_parts(catalog: Catalog, storage: &Storage, clock: Clock) -> Self {
        let catalog = Arc::new(catalog);
        let progress = Arc::new(ProgressService::new(
            Arc::clone(&catalog),
            Arc::clone(&storage.progress),
        ));
        let levels = Arc::new(LevelService::new(
            Arc::clone(&catalog),
            Arc::clone(&progress),
        ));
        let quiz = Arc::new(QuizService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&progress),
        ));
        Self {
            catalog,
            progress,
            levels,
            quiz,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn levels(&self) -> Arc<LevelService> {
        Arc::clone(&self.levels)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }
}
