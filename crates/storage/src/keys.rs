//! Names of the persisted progress entries.
//!
//! The string forms are the storage contract: `level_{id}_unlocked`, `level_{id}_completed`,
//! `level_{id}_progress` and `lesson_{level}_{lesson}_completed`.

use std::fmt;

use quiz_core::model::{LessonId, LevelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKey {
    LevelUnlocked(LevelId),
    LevelCompleted(LevelId),
    LevelProgress(LevelId),
    LessonCompleted(LevelId, LessonId),
}

impl ProgressKey {
    #[must_use]
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressKey::LevelUnlocked(level) => write!(f, "level_{level}_unlocked"),
            ProgressKey::LevelCompleted(level) => write!(f, "level_{level}_completed"),
            ProgressKey::LevelProgress(level) => write!(f, "level_{level}_progress"),
            ProgressKey::LessonCompleted(level, lesson) => {
                write!(f, "lesson_{level}_{lesson}_completed")
            }
        }
    }
}
