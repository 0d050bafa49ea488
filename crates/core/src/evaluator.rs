//! Answer checking.
//!
//! [`check_answer`] is the plain comparison: the submitted text must equal the stored answer,
//! ignoring letter case only. Fill-in-the-blank answers then have to be packed into one
//! comma-joined string in the stored order, with no extra spaces.
//!
//! [`evaluate`] accepts a structured [`Answer`]. Blank lists are compared one blank at a time,
//! trimmed and case-insensitive, and the result reports which blanks were wrong.

use crate::model::{BlankId, QuizQuestion};

/// A learner's submission for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A chosen option or typed text.
    Text(String),
    /// One value per blank, in blank order.
    Blanks(Vec<String>),
}

impl Answer {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn blanks<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Blanks(values.into_iter().map(Into::into).collect())
    }

    /// The answer as one string; blanks are joined with `,`.
    #[must_use]
    pub fn packed(&self) -> String {
        match self {
            Answer::Text(text) => text.clone(),
            Answer::Blanks(values) => values.join(","),
        }
    }
}

/// Result for a single blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankVerdict {
    pub blank: BlankId,
    pub given: Option<String>,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
    /// Per-blank results; empty unless blanks were compared one by one.
    pub blanks: Vec<BlankVerdict>,
}

/// Case-insensitive exact match against the stored correct answer.
#[must_use]
pub fn check_answer(question: &QuizQuestion, user_answer: &str) -> bool {
    eq_ignore_case(user_answer, &question.correct_answer)
}

/// Evaluate a structured answer.
#[must_use]
pub fn evaluate(question: &QuizQuestion, answer: &Answer) -> Evaluation {
    match (answer, question.blanks()) {
        (Answer::Blanks(values), Some(blanks)) => {
            let verdicts: Vec<BlankVerdict> = blanks
                .iter()
                .enumerate()
                .map(|(index, blank)| {
                    let given = values.get(index).map(|value| value.trim().to_owned());
                    let correct = given
                        .as_deref()
                        .is_some_and(|value| eq_ignore_case(value, blank.expected.trim()));
                    BlankVerdict {
                        blank: blank.id,
                        given,
                        correct,
                    }
                })
                .collect();
            let correct =
                values.len() == blanks.len() && verdicts.iter().all(|verdict| verdict.correct);
            Evaluation {
                correct,
                blanks: verdicts,
            }
        }
        (answer, _) => Evaluation {
            correct: check_answer(question, &answer.packed()),
            blanks: Vec::new(),
        },
    }
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
