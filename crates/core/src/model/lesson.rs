use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{LessonId, LevelId, QuestionId};
use crate::model::question::QuizQuestion;

/// Language of a lesson's code sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    #[default]
    Solidity,
    JavaScript,
    Jsx,
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CodeLanguage::Solidity => "solidity",
            CodeLanguage::JavaScript => "javascript",
            CodeLanguage::Jsx => "jsx",
        };
        f.write_str(label)
    }
}

/// A teaching unit: a code sample, its explanation and a short quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub level_id: LevelId,
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: CodeLanguage,
    pub explanation: String,
    pub questions: Vec<QuizQuestion>,
    pub(crate) completed: bool,
}

impl Lesson {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns this lesson with its completion flag replaced.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&QuizQuestion> {
        self.questions.iter().find(|question| question.id == id)
    }
}
