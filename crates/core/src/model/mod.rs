mod ids;
mod lesson;
mod level;
mod progress;
mod question;

pub use ids::{BlankId, LessonId, LevelId, ParseIdError, QuestionId};

pub use lesson::{CodeLanguage, Lesson};
pub use level::{Level, LevelIcon};
pub use progress::{LevelStatus, OverallProgress, Percent};
pub use question::{BlankField, QuestionKind, QuestionType, QuizQuestion};
