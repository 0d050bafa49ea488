use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use quiz_core::Catalog;
use quiz_core::evaluator::Answer;
use quiz_core::model::{LessonId, LevelId, Percent, QuestionId};
use quiz_core::quiz::QuizError;
use quiz_core::time::{fixed_clock, fixed_now};
use services::{AppServices, ProgressService, QuizService, QuizSessionError};
use storage::repository::{FlagValue, InMemoryStore, ProgressStore, StorageError, WriteBatch};

#[tokio::test]
async fn passing_attempt_completes_the_lesson() {
    let app = AppServices::in_memory(fixed_clock()).unwrap();
    let quiz = app.quiz();
    let level = LevelId::new(1);
    let lesson = LessonId::new(1);

    let mut attempt = quiz.start_quiz(level, lesson).await.unwrap();
    assert_eq!(
        attempt.current_question().map(|q| q.id),
        Some(QuestionId::new(1))
    );

    let first = quiz
        .answer_current(
            &mut attempt,
            &Answer::blanks(["name", " symbol", "totalSupply", "balanceOf"]),
        )
        .await
        .unwrap();
    assert!(first.feedback.correct);
    assert!(first.result.is_none());

    let last = quiz
        .answer_current(&mut attempt, &Answer::text("uint256"))
        .await
        .unwrap();
    let result = last.result.expect("attempt finished");
    assert_eq!(result.score, 2);
    assert_eq!(result.percentage, Percent::FULL);
    assert!(result.passed);
    assert_eq!(result.started_at, fixed_now());

    let stored = app
        .levels()
        .lesson_by_id(level, lesson)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_completed());
    assert_eq!(app.progress().level_progress(level).await.unwrap().value(), 50);
}

#[tokio::test]
async fn failing_attempt_leaves_progress_untouched() {
    let app = AppServices::in_memory(fixed_clock()).unwrap();
    let quiz = app.quiz();
    let level = LevelId::new(1);
    let lesson = LessonId::new(1);

    let mut attempt = quiz.start_quiz(level, lesson).await.unwrap();
    let first = quiz
        .answer_current(&mut attempt, &Answer::text("name, symbol, totalSupply, balanceOf"))
        .await
        .unwrap();
    assert!(!first.feedback.correct);
    assert!(first.feedback.blanks.is_empty());
    assert_eq!(first.feedback.correct_answer, "name,symbol,totalSupply,balanceOf");
    assert!(!first.feedback.explanation.is_empty());

    let last = quiz
        .answer_current(&mut attempt, &Answer::text("UINT256"))
        .await
        .unwrap();
    let result = last.result.unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.percentage.value(), 50);
    assert!(!result.passed);

    let progress = app.progress();
    assert!(!progress.is_lesson_completed(level, lesson).await.unwrap());
    assert_eq!(progress.level_progress(level).await.unwrap(), Percent::ZERO);

    let err = quiz
        .answer_current(&mut attempt, &Answer::text("anything"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizSessionError::Quiz(QuizError::Completed)));
}

#[tokio::test]
async fn wrong_blank_is_reported_per_blank() {
    let app = AppServices::in_memory(fixed_clock()).unwrap();
    let quiz = app.quiz();

    let mut attempt = quiz
        .start_quiz(LevelId::new(1), LessonId::new(2))
        .await
        .unwrap();
    let answered = quiz
        .answer_current(
            &mut attempt,
            &Answer::blanks(["msg.sender", "_value", "_value", "_from", "_value"]),
        )
        .await
        .unwrap();
    assert!(!answered.feedback.correct);
    let wrong: Vec<bool> = answered.feedback.blanks.iter().map(|b| b.correct).collect();
    assert_eq!(wrong, [true, true, true, false, true]);
    assert!(!answered.result.unwrap().passed);
}

#[tokio::test]
async fn start_quiz_rejects_unknown_and_locked_lessons() {
    let app = AppServices::in_memory(fixed_clock()).unwrap();
    let quiz = app.quiz();

    let err = quiz
        .start_quiz(LevelId::new(8), LessonId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizSessionError::LevelNotFound(id) if id == LevelId::new(8)));

    let err = quiz
        .start_quiz(LevelId::new(1), LessonId::new(5))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizSessionError::LessonNotFound { .. }));

    let err = quiz
        .start_quiz(LevelId::new(2), LessonId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizSessionError::LevelLocked(id) if id == LevelId::new(2)));
}

#[tokio::test]
async fn finish_time_comes_from_the_clock() {
    let mut clock = fixed_clock();
    clock.advance(Duration::minutes(5));
    let app = AppServices::in_memory(clock).unwrap();
    let quiz = app.quiz();

    let mut attempt = quiz
        .start_quiz(LevelId::new(1), LessonId::new(1))
        .await
        .unwrap();
    assert_eq!(attempt.started_at(), fixed_now() + Duration::minutes(5));
    quiz.answer_current(&mut attempt, &Answer::text("wrong"))
        .await
        .unwrap();
    let done = quiz
        .answer_current(&mut attempt, &Answer::text("wrong"))
        .await
        .unwrap();
    let result = done.result.unwrap();
    assert_eq!(result.finished_at, result.started_at);
    assert!(!result.passed);
}

struct UnreachableStore;

#[async_trait]
impl ProgressStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<FlagValue>, StorageError> {
        Err(StorageError::Connection("store offline".into()))
    }

    async fn apply(&self, _batch: WriteBatch) -> Result<(), StorageError> {
        Err(StorageError::Connection("store offline".into()))
    }
}

#[tokio::test]
async fn storage_failures_keep_the_finished_result() {
    let catalog = Arc::new(Catalog::embedded().unwrap());
    let progress = Arc::new(ProgressService::new(
        Arc::clone(&catalog),
        Arc::new(UnreachableStore),
    ));
    let quiz = QuizService::new(fixed_clock(), catalog, Arc::clone(&progress));

    // Level 1 needs no store read to be unlocked.
    let mut attempt = quiz
        .start_quiz(LevelId::new(1), LessonId::new(1))
        .await
        .unwrap();
    quiz.answer_current(
        &mut attempt,
        &Answer::text("name,symbol,totalSupply,balanceOf"),
    )
    .await
    .unwrap();
    let err = quiz
        .answer_current(&mut attempt, &Answer::text("uint256"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuizSessionError::NotRecorded { ref result, .. } if result.passed && result.score == 2
    ));

    assert!(
        quiz.start_quiz(LevelId::new(2), LessonId::new(1))
            .await
            .is_err()
    );
}

/// In-memory store whose next write fails while `failing` is set.
struct FlakyStore {
    inner: InMemoryStore,
    failing: AtomicBool,
}

#[async_trait]
impl ProgressStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<FlagValue>, StorageError> {
        self.inner.get(key).await
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        if self.failing.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Connection("write dropped".into()));
        }
        self.inner.apply(batch).await
    }
}

#[tokio::test]
async fn passed_result_survives_a_failed_write() {
    let catalog = Arc::new(Catalog::embedded().unwrap());
    let store = Arc::new(FlakyStore {
        inner: InMemoryStore::new(),
        failing: AtomicBool::new(false),
    });
    let progress = Arc::new(ProgressService::new(Arc::clone(&catalog), store.clone()));
    let quiz = QuizService::new(fixed_clock(), catalog, Arc::clone(&progress));
    let level = LevelId::new(1);
    let lesson = LessonId::new(1);

    let mut attempt = quiz.start_quiz(level, lesson).await.unwrap();
    quiz.answer_current(
        &mut attempt,
        &Answer::text("name,symbol,totalSupply,balanceOf"),
    )
    .await
    .unwrap();

    store.failing.store(true, Ordering::SeqCst);
    let err = quiz
        .answer_current(&mut attempt, &Answer::text("uint256"))
        .await
        .unwrap_err();
    let (result, source) = match err {
        QuizSessionError::NotRecorded { result, source } => (result, source),
        other => panic!("expected an unrecorded result, got {other:?}"),
    };
    assert!(result.passed);
    assert_eq!(result.score, 2);
    assert!(matches!(source, services::ProgressServiceError::Storage(_)));
    assert!(!progress.is_lesson_completed(level, lesson).await.unwrap());

    // The attempt itself is over; the result is what gets retried.
    assert!(attempt.is_complete());
    quiz.record(&result).await.unwrap();
    assert!(progress.is_lesson_completed(level, lesson).await.unwrap());
    assert_eq!(progress.level_progress(level).await.unwrap().value(), 50);

    quiz.record(&result).await.unwrap();
    assert_eq!(progress.level_progress(level).await.unwrap().value(), 50);
}

#[tokio::test]
async fn recording_a_failed_result_changes_nothing() {
    let app = AppServices::in_memory(fixed_clock()).unwrap();
    let quiz = app.quiz();
    let mut attempt = quiz
        .start_quiz(LevelId::new(5), LessonId::new(3))
        .await
        .unwrap();
    let done = quiz
        .answer_current(&mut attempt, &Answer::text("web3.js"))
        .await
        .unwrap();
    let result = done.result.unwrap();
    assert!(!result.passed);

    quiz.record(&result).await.unwrap();
    assert!(
        !app.progress()
            .is_lesson_completed(LevelId::new(5), LessonId::new(3))
            .await
            .unwrap()
    );
}
