use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an id from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u32>().map(Self::new).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })
            }
        }
    };
}

content_id!(
    /// Identifier of a level. Levels are numbered densely from 1.
    LevelId
);
content_id!(
    /// Identifier of a lesson, unique within its level.
    LessonId
);
content_id!(
    /// Identifier of a quiz question, unique across the catalog.
    QuestionId
);
content_id!(
    /// Identifier of a blank inside a fill-in-the-blank question.
    BlankId
);

impl LevelId {
    /// The level every learner starts with.
    pub const FIRST: LevelId = LevelId(1);

    #[must_use]
    pub fn is_first(&self) -> bool {
        *self == Self::FIRST
    }

    /// The level that follows this one.
    #[must_use]
    pub fn next(&self) -> LevelId {
        LevelId(self.0.saturating_add(1))
    }

    /// The level before this one, or `None` for level 1 (and the invalid level 0).
    #[must_use]
    pub fn previous(&self) -> Option<LevelId> {
        match self.0 {
            0 | 1 => None,
            n => Some(LevelId(n - 1)),
        }
    }
}
