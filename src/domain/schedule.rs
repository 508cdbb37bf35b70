use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Ease factor a freshly added word starts with
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Interval a freshly added word starts with ("due tomorrow" once rated)
pub const DEFAULT_INTERVAL_DAYS: i64 = 1;

/// Repetition count a freshly added word starts with
pub const DEFAULT_REPETITIONS: i64 = 0;

/// Lowest ease factor any review may produce
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Scheduling fields of a word. The scheduler only ever reads and writes these four.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardScheduleState {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub next_review: DateTime<Utc>,
}

impl CardScheduleState {
  /// Defaults for a word added at `now`: due immediately.
  pub fn new(now: DateTime<Utc>) -> Self {
    Self {
      ease_factor: DEFAULT_EASE_FACTOR,
      interval_days: DEFAULT_INTERVAL_DAYS,
      repetitions: DEFAULT_REPETITIONS,
      next_review: now,
    }
  }

  /// Check the invariants a stored state must satisfy.
  ///
  /// A state coming back from storage that fails this check points at a
  /// persistence bug, so it is reported rather than clamped.
  pub fn validate(&self) -> Result<(), ScheduleError> {
    if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE_FACTOR {
      return Err(ScheduleError::InvalidState(format!(
        "ease factor {} is below {}",
        self.ease_factor, MIN_EASE_FACTOR
      )));
    }
    if self.interval_days < 0 {
      return Err(ScheduleError::InvalidState(format!(
        "interval {} days is negative",
        self.interval_days
      )));
    }
    if self.repetitions < 0 {
      return Err(ScheduleError::InvalidState(format!(
        "repetition count {} is negative",
        self.repetitions
      )));
    }
    if self.repetitions > 0 && self.interval_days == 0 {
      return Err(ScheduleError::InvalidState(format!(
        "interval is 0 days after {} repetitions",
        self.repetitions
      )));
    }
    Ok(())
  }
}
