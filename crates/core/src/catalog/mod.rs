//! The course content: five levels of smart-contract lessons and their quizzes.
//!
//! Content ships inside the binary as YAML and is validated when loaded. Loading has no side
//! effects and the resulting [`Catalog`] is never mutated.

use log::debug;
use thiserror::Error;

use crate::model::{Lesson, LessonId, Level, LevelId, QuestionId, QuizQuestion};

mod document;

use document::CatalogDocument;

const EMBEDDED_CATALOG: &str = include_str!("catalog.yaml");

/// Placeholder marking a gap in a fill-in-the-blank snippet.
pub const BLANK_MARKER: &str = "___";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog document is malformed: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("level ids must be dense and ordered: expected {expected}, found {found}")]
    LevelOrder { expected: LevelId, found: LevelId },

    #[error("level {0} has no lessons")]
    EmptyLevel(LevelId),

    #[error("level {level} repeats lesson id {lesson}")]
    DuplicateLesson { level: LevelId, lesson: LessonId },

    #[error("question id {0} is used more than once")]
    DuplicateQuestion(QuestionId),

    #[error("question {question}: {reason}")]
    InvalidQuestion {
        question: QuestionId,
        reason: QuestionDefect,
    },

    #[error("{context}: {field} cannot be empty")]
    EmptyField {
        context: String,
        field: &'static str,
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionDefect {
    #[error("multiple choice needs at least two options")]
    TooFewOptions,

    #[error("correct answer is not one of the options")]
    AnswerNotAnOption,

    #[error("fill in the blank needs at least one blank")]
    MissingBlanks,

    #[error("blank positions must run 1..N in order")]
    BlankOrder,

    #[error("snippet markers do not match the number of blanks")]
    MarkerCount,

    #[error("correct answer does not match the comma-joined blanks")]
    BlankAnswerMismatch,

    #[error("code completion needs a code snippet")]
    MissingSnippet,
}

/// Validated, immutable course content in level order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    levels: Vec<Level>,
}

impl Catalog {
    /// Load the content compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded document fails to parse or validate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_yaml(EMBEDDED_CATALOG)
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed YAML and the matching variant for the first
    /// structural defect.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_yaml::from_str(source)?;
        let levels = document.validate()?;
        debug!(
            "loaded catalog: {} levels, {} lessons",
            levels.len(),
            levels.iter().map(|level| level.lessons().len()).sum::<usize>()
        );
        Ok(Self { levels })
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|level| level.id() == id)
    }

    #[must_use]
    pub fn lesson(&self, level_id: LevelId, lesson_id: LessonId) -> Option<&Lesson> {
        self.level(level_id)?.lesson(lesson_id)
    }

    #[must_use]
    pub fn question(
        &self,
        level_id: LevelId,
        lesson_id: LessonId,
        question_id: QuestionId,
    ) -> Option<&QuizQuestion> {
        self.lesson(level_id, lesson_id)?.question(question_id)
    }
}
