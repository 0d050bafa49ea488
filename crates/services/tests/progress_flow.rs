use quiz_core::model::{LessonId, LevelId};
use quiz_core::time::fixed_clock;
use services::{AppServices, AppServicesError};
use storage::keys::ProgressKey;
use storage::repository::{Storage, WriteBatch};

fn level(id: u32) -> LevelId {
    LevelId::new(id)
}

#[tokio::test]
async fn completing_level_one_unlocks_level_two() {
    let app = AppServices::in_memory(fixed_clock()).unwrap();
    let levels = app.levels();
    let progress = app.progress();

    let before = levels.level_by_id(level(2)).await.unwrap().unwrap();
    assert!(!before.is_unlocked());

    progress
        .mark_lesson_completed(level(1), LessonId::new(1))
        .await
        .unwrap();
    assert_eq!(progress.level_progress(level(1)).await.unwrap().value(), 50);
    assert!(!progress.is_level_completed(level(1)).await.unwrap());

    progress
        .mark_lesson_completed(level(1), LessonId::new(2))
        .await
        .unwrap();
    assert_eq!(progress.level_progress(level(1)).await.unwrap().value(), 100);
    assert!(progress.is_level_completed(level(1)).await.unwrap());
    assert!(progress.is_level_unlocked(level(2)).await.unwrap());

    let after = levels.level_by_id(level(2)).await.unwrap().unwrap();
    assert!(after.is_unlocked());
    assert!(!after.is_completed());
}

#[tokio::test]
async fn explicit_lock_overrides_previous_completion() {
    let storage = Storage::in_memory();
    let app = AppServices::from_parts(
        quiz_core::Catalog::embedded().unwrap(),
        &storage,
        fixed_clock(),
    );
    let progress = app.progress();

    for lesson in 1..=2 {
        progress
            .mark_lesson_completed(level(1), LessonId::new(lesson))
            .await
            .unwrap();
    }
    storage
        .progress
        .apply(WriteBatch::new().put_bool(ProgressKey::LevelUnlocked(level(2)), false))
        .await
        .unwrap();

    assert!(progress.is_level_completed(level(1)).await.unwrap());
    assert!(!progress.is_level_unlocked(level(2)).await.unwrap());
}

#[tokio::test]
async fn completing_the_last_level_unlocks_a_level_beyond_the_catalog() {
    let storage = Storage::in_memory();
    let app = AppServices::from_parts(
        quiz_core::Catalog::embedded().unwrap(),
        &storage,
        fixed_clock(),
    );
    let progress = app.progress();
    for lesson in 1..=3 {
        progress
            .mark_lesson_completed(level(5), LessonId::new(lesson))
            .await
            .unwrap();
    }

    assert!(progress.is_level_completed(level(5)).await.unwrap());
    assert!(progress.is_level_unlocked(level(6)).await.unwrap());
    assert!(app.levels().level_by_id(level(6)).await.unwrap().is_none());
    assert_eq!(app.levels().all_levels().await.unwrap().len(), 5);
}

#[tokio::test]
async fn sqlite_backed_progress_matches_in_memory() {
    let app = AppServices::new_sqlite(
        "sqlite:file:memdb_services_progress?mode=memory&cache=shared",
        fixed_clock(),
    )
    .await
    .expect("sqlite services");
    let progress = app.progress();

    progress
        .mark_lesson_completed(level(3), LessonId::new(2))
        .await
        .unwrap();
    let status = progress.level_status(level(3)).await.unwrap();
    assert_eq!(status.progress.value(), 33);
    assert!(!status.completed);
    assert!(!status.unlocked);
    assert!(
        progress
            .is_lesson_completed(level(3), LessonId::new(2))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn unreachable_database_is_a_startup_error() {
    let missing = std::env::temp_dir()
        .join(format!("quiz_missing_{}", std::process::id()))
        .join("nested")
        .join("quiz.sqlite3");
    let url = format!("sqlite://{}", missing.display());

    let err = AppServices::new_sqlite(&url, fixed_clock())
        .await
        .err()
        .expect("missing database directory");
    assert!(matches!(err, AppServicesError::Sqlite(_)));
}
