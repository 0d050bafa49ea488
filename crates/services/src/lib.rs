#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod level_service;
pub mod progress_service;
pub mod quiz_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProgressServiceError, QuizSessionError};
pub use level_service::LevelService;
pub use progress_service::ProgressService;
pub use quiz_service::{QuizAnswerResult, QuizService};
