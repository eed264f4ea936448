//! Soft deadline handed to agents.
//!
//! The deadline measures, it never preempts. Agents running a search are expected to poll
//! [`Deadline::remaining_ms`] and stop by themselves. The simulator only looks at it once the
//! decision returned, and an overrun is a diagnostic, never a failure.

use std::time::{Duration, Instant};

/// Budget of a single decision in the canonical configuration
pub const ACTION_BUDGET: Duration = Duration::from_millis(40);

/// Overrun tolerated before reporting that the agent is slowing the game down
pub const GRACE_TIME: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    budget: Duration,
    start: Instant,
}

impl Deadline {
    /// Start a deadline of `budget` now.
    pub fn new(budget: Duration) -> Self {
        Deadline {
            budget,
            start: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Remaining time in milliseconds. Negative once the budget is exceeded.
    pub fn remaining_ms(&self) -> i64 {
        self.budget.as_millis() as i64 - self.elapsed().as_millis() as i64
    }

    /// Remaining time, `None` once expired
    pub fn remaining(&self) -> Option<Duration> {
        self.budget.checked_sub(self.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }

    /// Time spent beyond the budget plus `grace`, if any.
    pub fn overrun(&self, grace: Duration) -> Option<Duration> {
        self.elapsed()
            .checked_sub(self.budget.saturating_add(grace))
            .filter(|d| !d.is_zero())
    }
}
