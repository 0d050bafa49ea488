use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::evaluator::{Answer, BlankVerdict, evaluate};
use crate::model::{Lesson, LessonId, LevelId, Percent, QuestionId, QuizQuestion};

/// Minimum score percentage that passes a lesson quiz.
pub const PASS_THRESHOLD: Percent = Percent::saturating(70);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available")]
    Empty,
    #[error("quiz already completed")]
    Completed,
    #[error("quiz still has unanswered questions")]
    Unfinished,
}

/// Feedback for one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub correct: bool,
    pub explanation: String,
    pub correct_answer: String,
    pub blanks: Vec<BlankVerdict>,
}

/// Aggregated view of attempt progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// Final score of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub level_id: LevelId,
    pub lesson_id: LessonId,
    pub score: usize,
    pub total: usize,
    pub percentage: Percent,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// One pass through the questions of a lesson.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    level_id: LevelId,
    lesson_id: LessonId,
    questions: Vec<QuizQuestion>,
    feedback: Vec<AnswerFeedback>,
    started_at: DateTime<Utc>,
}

impl QuizAttempt {
    /// Start an attempt over every question of `lesson`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if the lesson has no questions.
    pub fn new(lesson: &Lesson, started_at: DateTime<Utc>) -> Result<Self, QuizError> {
        if lesson.questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            level_id: lesson.level_id,
            lesson_id: lesson.id,
            questions: lesson.questions.clone(),
            feedback: Vec::with_capacity(lesson.questions.len()),
            started_at,
        })
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The question waiting for an answer, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.feedback.len())
    }

    #[must_use]
    pub fn feedback(&self) -> &[AnswerFeedback] {
        &self.feedback
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.feedback.iter().filter(|item| item.correct).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.feedback.len() >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        let total = self.questions.len();
        let answered = self.feedback.len();
        AttemptProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Score the current question and move to the next one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` once every question has been answered.
    pub fn answer_current(&mut self, answer: &Answer) -> Result<AnswerFeedback, QuizError> {
        let question = self.current_question().ok_or(QuizError::Completed)?;
        let evaluation = evaluate(question, answer);
        let feedback = AnswerFeedback {
            question_id: question.id,
            correct: evaluation.correct,
            explanation: question.explanation.clone(),
            correct_answer: question.correct_answer.clone(),
            blanks: evaluation.blanks,
        };
        self.feedback.push(feedback.clone());
        Ok(feedback)
    }

    /// Final result once every question is answered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Unfinished` while questions remain.
    pub fn finish(&self, finished_at: DateTime<Utc>) -> Result<QuizResult, QuizError> {
        if !self.is_complete() {
            return Err(QuizError::Unfinished);
        }
        let score = self.score();
        let total = self.questions.len();
        let percentage = Percent::from_ratio(score, total);
        Ok(QuizResult {
            level_id: self.level_id,
            lesson_id: self.lesson_id,
            score,
            total,
            percentage,
            passed: percentage >= PASS_THRESHOLD,
            started_at: self.started_at,
            finished_at,
        })
    }
}
