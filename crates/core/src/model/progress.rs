use std::fmt;

use super::level::Level;

/// A whole-number percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const FULL: Percent = Percent(100);

    /// Values above 100 saturate at 100.
    #[must_use]
    pub const fn saturating(value: u8) -> Self {
        if value > 100 { Self::FULL } else { Self(value) }
    }

    /// Floor of `part * 100 / total`. A zero `total` is 0%, and `part` is capped at `total`.
    #[must_use]
    pub fn from_ratio(part: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let scaled = part.min(total).saturating_mul(100) / total;
        u8::try_from(scaled).map_or(Self::FULL, Self)
    }

    /// Builds a percentage from a raw stored value, clamping it into range.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let bounded = value.clamp(0, 100);
        u8::try_from(bounded).map_or(Self::ZERO, Self)
    }

    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Derived per-level state merged into a `Level` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelStatus {
    pub unlocked: bool,
    pub completed: bool,
    pub progress: Percent,
}

/// Aggregate progress across every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallProgress {
    pub percent: Percent,
    pub completed_levels: usize,
    pub total_levels: usize,
}

impl OverallProgress {
    /// Mean of the level percentages (floor) and the number of completed levels.
    #[must_use]
    pub fn from_levels(levels: &[Level]) -> Self {
        let total_levels = levels.len();
        let completed_levels = levels.iter().filter(|level| level.is_completed()).count();
        let sum: usize = levels
            .iter()
            .map(|level| usize::from(level.progress().value()))
            .sum();
        let mean = sum.checked_div(total_levels).unwrap_or(0);
        Self {
            percent: Percent::clamped(i64::try_from(mean).unwrap_or(100)),
            completed_levels,
            total_levels,
        }
    }
}
