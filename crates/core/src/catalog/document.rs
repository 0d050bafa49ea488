//! Serialized shape of the catalog and its conversion into domain values.

use std::collections::HashSet;

use serde::Deserialize;

use crate::model::{
    BlankField, BlankId, CodeLanguage, Lesson, LessonId, Level, LevelIcon, LevelId, QuestionId,
    QuestionKind, QuestionType, QuizQuestion,
};

use super::{BLANK_MARKER, CatalogError, QuestionDefect};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CatalogDocument {
    levels: Vec<LevelDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelDraft {
    id: LevelId,
    title: String,
    description: String,
    icon: LevelIcon,
    lessons: Vec<LessonDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LessonDraft {
    id: LessonId,
    title: String,
    description: String,
    #[serde(default)]
    language: CodeLanguage,
    code: String,
    explanation: String,
    #[serde(default)]
    questions: Vec<QuestionDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionDraft {
    id: QuestionId,
    #[serde(rename = "type")]
    question_type: QuestionType,
    question: String,
    #[serde(default)]
    code_snippet: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    correct_answer: String,
    explanation: String,
    #[serde(default)]
    blanks: Option<Vec<BlankDraft>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlankDraft {
    id: BlankId,
    placeholder: String,
    answer: String,
    position: u32,
}

impl CatalogDocument {
    /// Validate the document and build the ordered level list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for the first structural defect found.
    pub(crate) fn validate(self) -> Result<Vec<Level>, CatalogError> {
        let mut seen_questions = HashSet::new();
        let mut levels = Vec::with_capacity(self.levels.len());

        for (draft, position) in self.levels.into_iter().zip(1u32..) {
            let expected = LevelId::new(position);
            if draft.id != expected {
                return Err(CatalogError::LevelOrder {
                    expected,
                    found: draft.id,
                });
            }
            levels.push(draft.validate(&mut seen_questions)?);
        }

        Ok(levels)
    }
}

impl LevelDraft {
    fn validate(self, seen_questions: &mut HashSet<QuestionId>) -> Result<Level, CatalogError> {
        let context = format!("level {}", self.id);
        require_text(&context, "title", &self.title)?;

        if self.lessons.is_empty() {
            return Err(CatalogError::EmptyLevel(self.id));
        }

        let mut seen_lessons = HashSet::new();
        let mut lessons = Vec::with_capacity(self.lessons.len());
        for lesson in self.lessons {
            if !seen_lessons.insert(lesson.id) {
                return Err(CatalogError::DuplicateLesson {
                    level: self.id,
                    lesson: lesson.id,
                });
            }
            lessons.push(lesson.validate(self.id, seen_questions)?);
        }

        Ok(Level::new(
            self.id,
            self.title,
            self.description,
            self.icon,
            lessons,
        ))
    }
}

impl LessonDraft {
    fn validate(
        self,
        level_id: LevelId,
        seen_questions: &mut HashSet<QuestionId>,
    ) -> Result<Lesson, CatalogError> {
        let context = format!("lesson {level_id}.{}", self.id);
        require_text(&context, "title", &self.title)?;
        require_text(&context, "code", &self.code)?;

        let mut questions = Vec::with_capacity(self.questions.len());
        for question in self.questions {
            if !seen_questions.insert(question.id) {
                return Err(CatalogError::DuplicateQuestion(question.id));
            }
            questions.push(question.validate(self.id)?);
        }

        Ok(Lesson {
            id: self.id,
            level_id,
            title: self.title,
            description: self.description,
            code: self.code,
            language: self.language,
            explanation: self.explanation,
            questions,
            completed: false,
        })
    }
}

impl QuestionDraft {
    fn validate(self, lesson_id: LessonId) -> Result<QuizQuestion, CatalogError> {
        let context = format!("question {}", self.id);
        require_text(&context, "question", &self.question)?;
        require_text(&context, "correct_answer", &self.correct_answer)?;
        require_text(&context, "explanation", &self.explanation)?;

        let question_id = self.id;
        let defect = |reason| CatalogError::InvalidQuestion {
            question: question_id,
            reason,
        };

        let kind = match self.question_type {
            QuestionType::MultipleChoice => {
                let options = self.options.unwrap_or_default();
                if options.len() < 2 {
                    return Err(defect(QuestionDefect::TooFewOptions));
                }
                if !options.iter().any(|option| *option == self.correct_answer) {
                    return Err(defect(QuestionDefect::AnswerNotAnOption));
                }
                QuestionKind::MultipleChoice { options }
            }
            QuestionType::FillInBlank => {
                let blanks = self.blanks.unwrap_or_default();
                if blanks.is_empty() {
                    return Err(defect(QuestionDefect::MissingBlanks));
                }
                let in_order = blanks
                    .iter()
                    .zip(1u32..)
                    .all(|(blank, position)| blank.position == position);
                if !in_order {
                    return Err(defect(QuestionDefect::BlankOrder));
                }
                if let Some(snippet) = self.code_snippet.as_deref() {
                    if snippet.matches(BLANK_MARKER).count() != blanks.len() {
                        return Err(defect(QuestionDefect::MarkerCount));
                    }
                }
                let packed = blanks
                    .iter()
                    .map(|blank| blank.answer.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                if packed != self.correct_answer {
                    return Err(defect(QuestionDefect::BlankAnswerMismatch));
                }
                QuestionKind::FillInBlank {
                    blanks: blanks
                        .into_iter()
                        .map(|blank| BlankField {
                            id: blank.id,
                            placeholder: blank.placeholder,
                            expected: blank.answer,
                            position: blank.position,
                        })
                        .collect(),
                }
            }
            QuestionType::CodeCompletion => {
                let has_snippet = self
                    .code_snippet
                    .as_deref()
                    .is_some_and(|snippet| !snippet.trim().is_empty());
                if !has_snippet {
                    return Err(defect(QuestionDefect::MissingSnippet));
                }
                QuestionKind::CodeCompletion
            }
        };

        Ok(QuizQuestion {
            id: self.id,
            lesson_id,
            prompt: self.question,
            code_snippet: self.code_snippet,
            kind,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
        })
    }
}

fn require_text(context: &str, field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::EmptyField {
            context: context.to_owned(),
            field,
        });
    }
    Ok(())
}
