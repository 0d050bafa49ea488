use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{BlankId, LessonId, QuestionId};

/// Variant tag of a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    #[serde(rename = "fill_in_the_blank")]
    FillInBlank,
    CodeCompletion,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionType::MultipleChoice => "multiple choice",
            QuestionType::FillInBlank => "fill in the blank",
            QuestionType::CodeCompletion => "code completion",
        };
        f.write_str(label)
    }
}

/// One gap in a fill-in-the-blank snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankField {
    pub id: BlankId,
    pub placeholder: String,
    pub expected: String,
    /// 1-based index of the `___` marker this blank fills.
    pub position: u32,
}

/// Variant-specific payload of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    FillInBlank { blanks: Vec<BlankField> },
    CodeCompletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub lesson_id: LessonId,
    pub prompt: String,
    pub code_snippet: Option<String>,
    pub kind: QuestionKind,
    /// Expected answer. Multi-blank questions pack their values comma-separated in order.
    pub correct_answer: String,
    pub explanation: String,
}

impl QuizQuestion {
    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::FillInBlank { .. } => QuestionType::FillInBlank,
            QuestionKind::CodeCompletion => QuestionType::CodeCompletion,
        }
    }

    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => Some(options),
            _ => None,
        }
    }

    #[must_use]
    pub fn blanks(&self) -> Option<&[BlankField]> {
        match &self.kind {
            QuestionKind::FillInBlank { blanks } => Some(blanks),
            _ => None,
        }
    }
}
