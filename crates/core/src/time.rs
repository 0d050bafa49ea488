//! Timestamps for quiz attempts.

use chrono::{DateTime, Duration, Utc};

/// Wall-clock time unless frozen at an instant; attempts read their start and finish from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    frozen: Option<DateTime<Utc>>,
}

impl Clock {
    #[must_use]
    pub const fn system() -> Self {
        Self { frozen: None }
    }

    #[must_use]
    pub const fn fixed(at: DateTime<Utc>) -> Self {
        Self { frozen: Some(at) }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.frozen.unwrap_or_else(Utc::now)
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.frozen.is_some()
    }

    /// Moves a frozen clock forward; the system clock is left alone.
    pub fn advance(&mut self, delta: Duration) {
        if let Some(at) = self.frozen.as_mut() {
            *at += delta;
        }
    }
}

/// 2024-03-01T09:00:00Z, the instant test clocks are frozen at.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::default() + Duration::seconds(1_709_283_600)
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
