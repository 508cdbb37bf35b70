//! Four-grade SM-2 variant.
//!
//! | Outcome | repetitions | interval                                   | ease          |
//! |---------|-------------|--------------------------------------------|---------------|
//! | Again   | reset to 0  | 1                                          | -0.2 (floor)  |
//! | Hard    | unchanged   | interval × 1.2, at least 1                 | -0.15 (floor) |
//! | Good    | +1          | 1, then 6, then interval × ease            | unchanged     |
//! | Easy    | +1          | 4, then interval × ease × 1.3              | +0.15         |
//!
//! Intervals truncate toward zero. The next review lands `interval` local
//! calendar days after the review.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::domain::{CardScheduleState, Outcome, MIN_EASE_FACTOR};
use crate::error::ScheduleError;

use super::calendar::add_calendar_days;

const AGAIN_EASE_PENALTY: f64 = 0.2;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;
const HARD_INTERVAL_FACTOR: f64 = 1.2;
const EASY_INTERVAL_FACTOR: f64 = 1.3;
const GOOD_FIRST_INTERVAL: i64 = 1;
const GOOD_SECOND_INTERVAL: i64 = 6;
const EASY_FIRST_INTERVAL: i64 = 4;

/// Compute the schedule that follows a review with `outcome` at `now`.
///
/// `state` is left untouched. Fails only when `state` breaks its invariants
/// or the next review date cannot be represented.
pub fn apply_review<Tz: TimeZone>(
  state: &CardScheduleState,
  outcome: Outcome,
  now: &DateTime<Tz>,
) -> Result<CardScheduleState, ScheduleError> {
  state.validate()?;

  let ease = state.ease_factor;
  let interval = state.interval_days as f64;
  let next_repetition = || {
    state
      .repetitions
      .checked_add(1)
      .ok_or_else(|| ScheduleError::InvalidState(format!("repetition count {} cannot grow", state.repetitions)))
  };

  let (ease_factor, interval_days, repetitions) = match outcome {
    Outcome::Again => (
      (ease - AGAIN_EASE_PENALTY).max(MIN_EASE_FACTOR),
      1,
      0,
    ),
    Outcome::Hard => (
      (ease - HARD_EASE_PENALTY).max(MIN_EASE_FACTOR),
      ((interval * HARD_INTERVAL_FACTOR) as i64).max(1),
      state.repetitions,
    ),
    Outcome::Good => {
      let next = match state.repetitions {
        0 => GOOD_FIRST_INTERVAL,
        1 => GOOD_SECOND_INTERVAL,
        _ => (interval * ease) as i64,
      };
      (ease, next, next_repetition()?)
    }
    Outcome::Easy => {
      let next = match state.repetitions {
        0 => EASY_FIRST_INTERVAL,
        _ => (interval * ease * EASY_INTERVAL_FACTOR) as i64,
      };
      (ease + EASY_EASE_BONUS, next, next_repetition()?)
    }
  };

  let next_review = add_calendar_days(now, interval_days)
    .ok_or(ScheduleError::DateOutOfRange)?
    .with_timezone(&Utc);

  Ok(CardScheduleState {
    ease_factor,
    interval_days,
    repetitions,
    next_review,
  })
}

/// Interval in days a review with `outcome` would produce
pub fn preview_interval<Tz: TimeZone>(
  state: &CardScheduleState,
  outcome: Outcome,
  now: &DateTime<Tz>,
) -> Result<i64, ScheduleError> {
  apply_review(state, outcome, now).map(|next| next.interval_days)
}

/// Previewed interval for every rating choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalPreview {
  pub again: i64,
  pub hard: i64,
  pub good: i64,
  pub easy: i64,
}

pub fn preview_all<Tz: TimeZone>(
  state: &CardScheduleState,
  now: &DateTime<Tz>,
) -> Result<IntervalPreview, ScheduleError> {
  Ok(IntervalPreview {
    again: preview_interval(state, Outcome::Again, now)?,
    hard: preview_interval(state, Outcome::Hard, now)?,
    good: preview_interval(state, Outcome::Good, now)?,
    easy: preview_interval(state, Outcome::Easy, now)?,
  })
}
