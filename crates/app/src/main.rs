use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use quiz_core::evaluator::{Answer, check_answer};
use quiz_core::model::{Lesson, LessonId, Level, LevelId, QuestionId, QuestionKind};
use services::{AppServices, Clock, QuizSessionError};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingCommand,
    UnknownCommand(String),
    UnknownArg(String),
    MissingArgument { name: &'static str },
    InvalidId { name: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    AnswerCount { expected: usize, found: usize },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingCommand => write!(f, "missing command"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::InvalidId { name, raw } => write!(f, "invalid <{name}> value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::AnswerCount { expected, found } => {
                write!(f, "expected {expected} answers, got {found}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_id<T: FromStr>(
    positional: &mut impl Iterator<Item = String>,
    name: &'static str,
) -> Result<T, ArgsError> {
    let raw = positional
        .next()
        .ok_or(ArgsError::MissingArgument { name })?;
    raw.parse().map_err(|_| ArgsError::InvalidId { name, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz levels");
    eprintln!("  quiz lessons   <level-id>");
    eprintln!("  quiz show      <level-id> <lesson-id>");
    eprintln!("  quiz check     <level-id> <lesson-id> <question-id> <answer>");
    eprintln!("  quiz complete  <level-id> <lesson-id>");
    eprintln!("  quiz attempt   <level-id> <lesson-id> <answer>...");
    eprintln!("  quiz progress");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   (default sqlite://quiz.sqlite3)");
    eprintln!();
    eprintln!("Fill-in-the-blank answers are comma-joined, in blank order.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Levels,
    Lessons(LevelId),
    Show(LevelId, LessonId),
    Check {
        level: LevelId,
        lesson: LessonId,
        question: QuestionId,
        answer: String,
    },
    Complete(LevelId, LessonId),
    Attempt {
        level: LevelId,
        lesson: LessonId,
        answers: Vec<String>,
    },
    Progress,
}

impl Command {
    fn parse(name: &str, positional: Vec<String>) -> Result<Self, ArgsError> {
        let mut rest = positional.into_iter();
        let command = match name {
            "levels" => Self::Levels,
            "lessons" => Self::Lessons(require_id(&mut rest, "level-id")?),
            "show" => Self::Show(
                require_id(&mut rest, "level-id")?,
                require_id(&mut rest, "lesson-id")?,
            ),
            "check" => Self::Check {
                level: require_id(&mut rest, "level-id")?,
                lesson: require_id(&mut rest, "lesson-id")?,
                question: require_id(&mut rest, "question-id")?,
                answer: rest
                    .next()
                    .ok_or(ArgsError::MissingArgument { name: "answer" })?,
            },
            "complete" => Self::Complete(
                require_id(&mut rest, "level-id")?,
                require_id(&mut rest, "lesson-id")?,
            ),
            "attempt" => {
                let level = require_id(&mut rest, "level-id")?;
                let lesson = require_id(&mut rest, "lesson-id")?;
                let answers: Vec<String> = rest.by_ref().collect();
                if answers.is_empty() {
                    return Err(ArgsError::MissingArgument { name: "answer" });
                }
                Self::Attempt {
                    level,
                    lesson,
                    answers,
                }
            }
            "progress" => Self::Progress,
            other => return Err(ArgsError::UnknownCommand(other.to_owned())),
        };

        if let Some(extra) = rest.next() {
            return Err(ArgsError::UnknownArg(extra));
        }
        Ok(command)
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url =
            env_db_url.map_or_else(|| "sqlite://quiz.sqlite3".into(), |raw| database_url(&raw));
        let mut name = None;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = database_url(&value);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if name.is_none() => name = Some(arg),
                _ => positional.push(arg),
            }
        }

        let name = name.ok_or(ArgsError::MissingCommand)?;
        let command = Command::parse(&name, positional)?;
        Ok(Self { db_url, command })
    }
}

const MEMORY_URL: &str = "sqlite::memory:";

/// Turns `--db` input into a sqlx URL. URL forms (`sqlite://`, `sqlite:file:`, the memory URL)
/// are kept as given; a bare or `sqlite:`-prefixed path becomes an absolute `sqlite://` URL.
fn database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw == MEMORY_URL || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw.to_owned();
    }

    let path = PathBuf::from(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    };
    format!("sqlite://{}", path.display())
}

/// The file behind a database URL; `None` when sqlx owns the target (memory and `file:` URLs).
fn database_file(db_url: &str) -> Result<Option<PathBuf>, ArgsError> {
    if db_url == MEMORY_URL || db_url.starts_with("sqlite:file:") {
        return Ok(None);
    }
    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_owned(),
    };
    let location = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = location.split_once('?').map_or(location, |(path, _)| path);
    if path.is_empty() {
        return Err(invalid());
    }
    Ok(Some(PathBuf::from(path)))
}

/// sqlx does not create missing files for `sqlite://` URLs, so the progress file and its
/// directory are created up front.
fn ensure_database_file(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(())
}

fn answer_for(lesson_question: Option<&QuestionKind>, raw: &str) -> Answer {
    match lesson_question {
        Some(QuestionKind::FillInBlank { .. }) => Answer::blanks(raw.split(',')),
        _ => Answer::text(raw),
    }
}

fn lock_label(level: &Level) -> &'static str {
    match (level.is_completed(), level.is_unlocked()) {
        (true, _) => "completed",
        (false, true) => "unlocked",
        (false, false) => "locked",
    }
}

fn print_lesson(lesson: &Lesson) {
    let mark = if lesson.is_completed() { "x" } else { " " };
    println!("[{mark}] {}.{} {}", lesson.level_id, lesson.id, lesson.title);
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1).peekable();
    if matches!(argv.peek().map(String::as_str), Some("--help" | "-h") | None) {
        print_usage();
        return Ok(());
    }

    let parsed = Args::parse(&mut argv, std::env::var("QUIZ_DB_URL").ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if let Some(path) = database_file(&parsed.db_url)? {
        ensure_database_file(&path)?;
    }
    log::debug!("using database {}", parsed.db_url);
    let app = AppServices::new_sqlite(&parsed.db_url, Clock::system()).await?;

    match parsed.command {
        Command::Levels => {
            for level in app.levels().all_levels().await? {
                println!(
                    "{:>2}. {:<28} {:>4}  {}",
                    level.id(),
                    level.title(),
                    level.progress().to_string(),
                    lock_label(&level)
                );
            }
        }
        Command::Lessons(level_id) => {
            let level = app
                .levels()
                .level_by_id(level_id)
                .await?
                .ok_or_else(|| format!("level {level_id} not found"))?;
            println!("{} ({}, {})", level.title(), level.progress(), lock_label(&level));
            for lesson in level.lessons() {
                print_lesson(lesson);
            }
        }
        Command::Show(level_id, lesson_id) => {
            let lesson = app
                .levels()
                .lesson_by_id(level_id, lesson_id)
                .await?
                .ok_or_else(|| format!("lesson {level_id}.{lesson_id} not found"))?;
            print_lesson(&lesson);
            println!("{}", lesson.description);
            println!();
            println!("```{}", lesson.language);
            println!("{}", lesson.code);
            println!("```");
            println!();
            println!("{}", lesson.explanation);
            for question in &lesson.questions {
                println!();
                println!("Q{} ({}): {}", question.id, question.question_type(), question.prompt);
                if let Some(snippet) = &question.code_snippet {
                    println!("{snippet}");
                }
                for option in question.options().unwrap_or_default() {
                    println!("  - {option}");
                }
            }
        }
        Command::Check {
            level,
            lesson,
            question,
            answer,
        } => {
            let catalog = app.catalog();
            let entry = catalog
                .question(level, lesson, question)
                .ok_or_else(|| format!("question {question} not found in lesson {level}.{lesson}"))?;
            if check_answer(entry, &answer) {
                println!("correct");
            } else {
                println!("incorrect, expected: {}", entry.correct_answer);
            }
            println!("{}", entry.explanation);
        }
        Command::Complete(level, lesson) => {
            let progress = app.progress();
            progress.mark_lesson_completed(level, lesson).await?;
            let status = progress.level_status(level).await?;
            println!("level {level}: {}", status.progress);
            if status.completed {
                println!("level {level} completed, level {} unlocked", level.next());
            }
        }
        Command::Attempt {
            level,
            lesson,
            answers,
        } => {
            let quiz = app.quiz();
            let mut attempt = quiz.start_quiz(level, lesson).await?;
            let expected = attempt.progress().total;
            if answers.len() != expected {
                return Err(ArgsError::AnswerCount {
                    expected,
                    found: answers.len(),
                }
                .into());
            }
            for raw in &answers {
                let kind = attempt.current_question().map(|question| &question.kind);
                let answer = answer_for(kind, raw);
                let result = match quiz.answer_current(&mut attempt, &answer).await {
                    Ok(outcome) => outcome.result,
                    Err(QuizSessionError::NotRecorded { result, source }) => {
                        log::warn!("retrying store of quiz result: {source}");
                        quiz.record(&result).await?;
                        Some(*result)
                    }
                    Err(err) => return Err(err.into()),
                };
                if let Some(feedback) = attempt.feedback().last() {
                    let verdict = if feedback.correct { "correct" } else { "incorrect" };
                    println!("Q{}: {verdict}", feedback.question_id);
                    if !feedback.correct {
                        println!("  expected: {}", feedback.correct_answer);
                    }
                }
                if let Some(result) = result {
                    println!(
                        "score {}/{} ({}): {}",
                        result.score,
                        result.total,
                        result.percentage,
                        if result.passed { "passed" } else { "failed" }
                    );
                }
            }
        }
        Command::Progress => {
            let overall = app.levels().overall_progress().await?;
            println!(
                "{} overall, {}/{} levels completed",
                overall.percent, overall.completed_levels, overall.total_levels
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        eprintln!("quiz: {err}");
        std::process::exit(2);
    }
}
