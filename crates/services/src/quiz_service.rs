use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::catalog::Catalog;
use quiz_core::evaluator::Answer;
use quiz_core::model::{LessonId, LevelId};
use quiz_core::quiz::{AnswerFeedback, QuizAttempt, QuizResult};

use crate::error::{ProgressServiceError, QuizSessionError};
use crate::progress_service::ProgressService;

/// Outcome of answering one question within an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswerResult {
    pub feedback: AnswerFeedback,
    /// Set once the last question has been answered.
    pub result: Option<QuizResult>,
}

/// Runs lesson quizzes and records passed lessons.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, progress: Arc<ProgressService>) -> Self {
        Self {
            clock,
            catalog,
            progress,
        }
    }

    /// Start an attempt over every question of a lesson.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::LevelNotFound` or `LessonNotFound` for unknown ids,
    /// `LevelLocked` when the level is not unlocked yet, and `Quiz(QuizError::Empty)` when the
    /// lesson has no questions.
    pub async fn start_quiz(
        &self,
        level_id: LevelId,
        lesson_id: LessonId,
    ) -> Result<QuizAttempt, QuizSessionError> {
        let level = self
            .catalog
            .level(level_id)
            .ok_or(QuizSessionError::LevelNotFound(level_id))?;
        let lesson = level
            .lesson(lesson_id)
            .ok_or(QuizSessionError::LessonNotFound {
                level: level_id,
                lesson: lesson_id,
            })?;
        if !self.progress.is_level_unlocked(level_id).await? {
            return Err(QuizSessionError::LevelLocked(level_id));
        }
        let attempt = QuizAttempt::new(lesson, self.clock.now())?;
        log::debug!(
            "quiz {level_id}.{lesson_id} started with {} questions",
            attempt.progress().total
        );
        Ok(attempt)
    }

    /// Score the current question. Answering the last one finishes the attempt, and a
    /// passing result marks the lesson completed.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Quiz(QuizError::Completed)` if the attempt is already over.
    /// Returns `QuizSessionError::NotRecorded` with the finished result if a passed lesson
    /// cannot be stored; pass that result to [`QuizService::record`] to retry.
    pub async fn answer_current(
        &self,
        attempt: &mut QuizAttempt,
        answer: &Answer,
    ) -> Result<QuizAnswerResult, QuizSessionError> {
        let feedback = attempt.answer_current(answer)?;
        if !attempt.is_complete() {
            return Ok(QuizAnswerResult {
                feedback,
                result: None,
            });
        }

        let result = attempt.finish(self.clock.now())?;
        log::info!(
            "quiz {}.{} finished: {}/{} ({}), {}",
            result.level_id,
            result.lesson_id,
            result.score,
            result.total,
            result.percentage,
            if result.passed { "passed" } else { "failed" }
        );
        if let Err(source) = self.store_result(&result).await {
            log::warn!(
                "quiz {}.{} passed but was not recorded: {source}",
                result.level_id,
                result.lesson_id
            );
            return Err(QuizSessionError::NotRecorded {
                result: Box::new(result),
                source,
            });
        }

        Ok(QuizAnswerResult {
            feedback,
            result: Some(result),
        })
    }

    /// Store a finished result: a passed one marks its lesson completed, a failed one is a
    /// no-op. Safe to repeat.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Progress` if the completed lesson cannot be stored.
    pub async fn record(&self, result: &QuizResult) -> Result<(), QuizSessionError> {
        self.store_result(result).await?;
        Ok(())
    }

    async fn store_result(&self, result: &QuizResult) -> Result<(), ProgressServiceError> {
        if result.passed {
            self.progress
                .mark_lesson_completed(result.level_id, result.lesson_id)
                .await?;
        }
        Ok(())
    }
}
