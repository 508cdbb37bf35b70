//! Injectable source of "now".
//!
//! Scheduling and due checks always take the current instant as an argument;
//! the service reads it from a `Clock` so tests can pin it.

use chrono::{DateTime, Days, Utc};
use chrono_tz::Tz;
use std::sync::Mutex;

pub trait Clock: Send + Sync {
  /// Current instant in the study time zone
  fn now(&self) -> DateTime<Tz>;
}

/// Wall clock in a configured time zone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
  tz: Tz,
}

impl SystemClock {
  pub fn new(tz: Tz) -> Self {
    Self { tz }
  }
}

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Tz> {
    Utc::now().with_timezone(&self.tz)
  }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
  now: Mutex<DateTime<Tz>>,
}

impl FixedClock {
  pub fn new(now: DateTime<Tz>) -> Self {
    Self {
      now: Mutex::new(now),
    }
  }

  pub fn set(&self, now: DateTime<Tz>) {
    *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
  }

  /// Jump forward by whole calendar days
  pub fn advance_days(&self, days: u64) {
    let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(later) = (*now).checked_add_days(Days::new(days)) {
      *now = later;
    }
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Tz> {
    *self.now.lock().unwrap_or_else(|e| e.into_inner())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use chrono_tz::Asia::Seoul;

  #[test]
  fn test_fixed_clock_holds_time() {
    let t = Seoul.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    let clock = FixedClock::new(t);
    assert_eq!(clock.now(), t);
    assert_eq!(clock.now(), t);
  }

  #[test]
  fn test_fixed_clock_advance_and_set() {
    let t = Seoul.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap();
    let clock = FixedClock::new(t);

    clock.advance_days(1);
    assert_eq!(clock.now(), Seoul.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap());

    clock.set(t);
    assert_eq!(clock.now(), t);
  }

  #[test]
  fn test_system_clock_uses_zone() {
    let clock = SystemClock::new(Seoul);
    let now = clock.now();
    assert_eq!(now.timezone(), Seoul);
    assert!((now.with_timezone(&Utc) - Utc::now()).num_seconds().abs() < 5);
  }
}
