use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, LevelId};
use crate::model::lesson::Lesson;
use crate::model::progress::{LevelStatus, Percent};

/// Icon shown next to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelIcon {
    Token,
    Nft,
    Crowdfunding,
    Dao,
    Amm,
}

/// A thematic unit of lessons.
///
/// Catalog levels carry a default (locked, 0%) status. Snapshots handed out by the services
/// layer have the persisted status merged in through [`Level::with_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    title: String,
    description: String,
    icon: LevelIcon,
    lessons: Vec<Lesson>,
    status: LevelStatus,
}

impl Level {
    #[must_use]
    pub fn new(
        id: LevelId,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: LevelIcon,
        lessons: Vec<Lesson>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            icon,
            lessons,
            status: LevelStatus::default(),
        }
    }

    /// Returns a snapshot with the given status and per-lesson completion applied.
    #[must_use]
    pub fn with_status(mut self, status: LevelStatus, completed_lessons: &[LessonId]) -> Self {
        self.status = status;
        self.lessons = self
            .lessons
            .into_iter()
            .map(|lesson| {
                let done = completed_lessons.contains(&lesson.id);
                lesson.with_completed(done)
            })
            .collect();
        self
    }

    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> LevelIcon {
        self.icon
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    #[must_use]
    pub fn status(&self) -> LevelStatus {
        self.status
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.status.unlocked
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.completed
    }

    #[must_use]
    pub fn progress(&self) -> Percent {
        self.status.progress
    }
}
