#![forbid(unsafe_code)]

pub mod catalog;
pub mod evaluator;
pub mod model;
pub mod quiz;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use evaluator::{Answer, Evaluation, check_answer, evaluate};
pub use quiz::{AnswerFeedback, QuizAttempt, QuizError, QuizResult};
pub use time::Clock;
