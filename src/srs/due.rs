//! Due-set selection.
//!
//! A word is due once the local calendar day of its next review is today or
//! earlier. The hour does not matter: something scheduled for 23:00 today is
//! due at 08:00 today.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{CardScheduleState, Word};

use super::calendar::{calendar_day, calendar_day_in};

pub fn is_due<Tz: TimeZone>(state: &CardScheduleState, now: &DateTime<Tz>) -> bool {
  calendar_day_in(&state.next_review, &now.timezone()) <= calendar_day(now)
}

/// Keys of the due entries, oldest due date first.
///
/// Entries with equal due dates keep their input order, so unchanged input
/// always yields the same sequence.
pub fn due_cards<'a, K, I, Tz>(cards: I, now: &DateTime<Tz>) -> Vec<K>
where
  I: IntoIterator<Item = (K, &'a CardScheduleState)>,
  Tz: TimeZone,
{
  let mut due: Vec<(K, DateTime<Utc>)> = cards
    .into_iter()
    .filter(|(_, state)| is_due(state, now))
    .map(|(key, state)| (key, state.next_review))
    .collect();
  due.sort_by_key(|(_, next_review)| *next_review);
  due.into_iter().map(|(key, _)| key).collect()
}

/// Due words of a loaded collection
pub fn due_words<'a, Tz: TimeZone>(words: &'a [Word], now: &DateTime<Tz>) -> Vec<&'a Word> {
  due_cards(words.iter().map(|w| (w, &w.schedule)), now)
}

pub fn due_count<'a, I, Tz>(states: I, now: &DateTime<Tz>) -> usize
where
  I: IntoIterator<Item = &'a CardScheduleState>,
  Tz: TimeZone,
{
  states.into_iter().filter(|state| is_due(state, now)).count()
}

/// Earliest review among entries that are not due yet
pub fn next_due_instant<'a, I, Tz>(states: I, now: &DateTime<Tz>) -> Option<DateTime<Utc>>
where
  I: IntoIterator<Item = &'a CardScheduleState>,
  Tz: TimeZone,
{
  states
    .into_iter()
    .filter(|state| !is_due(state, now))
    .map(|state| state.next_review)
    .min()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::DEFAULT_EASE_FACTOR;
  use chrono::Duration;
  use chrono_tz::Asia::Seoul;
  use chrono_tz::Tz;

  fn at(day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Tz> {
    Seoul.with_ymd_and_hms(2025, 3, day, hour, min, sec).unwrap()
  }

  fn scheduled(next_review: DateTime<Tz>) -> CardScheduleState {
    CardScheduleState {
      ease_factor: DEFAULT_EASE_FACTOR,
      interval_days: 1,
      repetitions: 1,
      next_review: next_review.with_timezone(&Utc),
    }
  }

  #[test]
  fn test_start_of_today_is_due_all_day() {
    let state = scheduled(at(10, 0, 0, 0));
    for now in [at(10, 0, 0, 0), at(10, 12, 0, 0), at(10, 23, 59, 59)] {
      assert!(is_due(&state, &now), "expected due at {}", now);
    }
  }

  #[test]
  fn test_start_of_tomorrow_is_not_due_today() {
    let state = scheduled(at(11, 0, 0, 0));
    for now in [at(10, 0, 0, 0), at(10, 12, 0, 0), at(10, 23, 59, 59)] {
      assert!(!is_due(&state, &now), "expected not due at {}", now);
    }
    assert!(is_due(&state, &at(11, 0, 0, 0)));
  }

  #[test]
  fn test_later_today_is_due_now() {
    let state = scheduled(at(10, 23, 0, 0));
    assert!(is_due(&state, &at(10, 8, 0, 0)));
  }

  #[test]
  fn test_past_days_are_due() {
    let state = scheduled(at(1, 15, 0, 0));
    assert!(is_due(&state, &at(10, 9, 0, 0)));
  }

  #[test]
  fn test_day_boundary_follows_now_zone() {
    // 16:00 UTC on the 9th is 01:00 on the 10th in Seoul
    let state = CardScheduleState {
      next_review: Utc.with_ymd_and_hms(2025, 3, 9, 16, 0, 0).unwrap(),
      ..scheduled(at(1, 0, 0, 0))
    };
    let utc_evening = Utc.with_ymd_and_hms(2025, 3, 9, 20, 0, 0).unwrap();
    assert!(is_due(&state, &utc_evening));
    assert!(!is_due(&state, &at(9, 23, 0, 0)));
  }

  #[test]
  fn test_due_cards_filters_and_orders() {
    let states = vec![
      ("later-today", scheduled(at(10, 20, 0, 0))),
      ("tomorrow", scheduled(at(11, 9, 0, 0))),
      ("oldest", scheduled(at(2, 9, 0, 0))),
      ("yesterday", scheduled(at(9, 9, 0, 0))),
    ];
    let due = due_cards(states.iter().map(|(k, s)| (*k, s)), &at(10, 9, 0, 0));
    assert_eq!(due, vec!["oldest", "yesterday", "later-today"]);
  }

  #[test]
  fn test_due_cards_ties_keep_input_order() {
    let same = scheduled(at(9, 9, 0, 0));
    let states = vec![(3, same), (1, same), (2, same)];
    let due = due_cards(states.iter().map(|(k, s)| (*k, s)), &at(10, 9, 0, 0));
    assert_eq!(due, vec![3, 1, 2]);
  }

  #[test]
  fn test_due_cards_is_deterministic() {
    let states: Vec<(i64, CardScheduleState)> = (0..20)
      .map(|i| (i, scheduled(at(1 + (i as u32 % 5), 9, 0, 0))))
      .collect();
    let now = at(10, 9, 0, 0);
    let first = due_cards(states.iter().map(|(k, s)| (*k, s)), &now);
    let second = due_cards(states.iter().map(|(k, s)| (*k, s)), &now);
    assert_eq!(first.len(), 20);
    assert_eq!(first, second);
  }

  #[test]
  fn test_due_cards_empty() {
    let states: Vec<(i64, CardScheduleState)> = vec![];
    let due = due_cards(states.iter().map(|(k, s)| (*k, s)), &at(10, 9, 0, 0));
    assert!(due.is_empty());
  }

  #[test]
  fn test_due_words() {
    let now = at(10, 9, 0, 0);
    let mut due = Word::new("물".into(), "water".into(), "ko".into(), Utc::now());
    due.id = 1;
    due.schedule = scheduled(at(9, 9, 0, 0));
    let mut future = due.clone();
    future.id = 2;
    future.schedule = scheduled(at(12, 9, 0, 0));

    let words = vec![future, due];
    let ids: Vec<i64> = due_words(&words, &now).iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![1]);
  }

  #[test]
  fn test_due_count_and_next_due() {
    let now = at(10, 9, 0, 0);
    let states = vec![
      scheduled(at(9, 9, 0, 0)),
      scheduled(at(14, 9, 0, 0)),
      scheduled(at(12, 9, 0, 0)),
      scheduled(at(10, 22, 0, 0)),
    ];
    assert_eq!(due_count(&states, &now), 2);
    assert_eq!(
      next_due_instant(&states, &now),
      Some(at(12, 9, 0, 0).with_timezone(&Utc))
    );
  }

  #[test]
  fn test_next_due_none_when_everything_due() {
    let now = at(10, 9, 0, 0);
    let states = vec![scheduled(now - Duration::days(3))];
    assert_eq!(next_due_instant(&states, &now), None);
  }
}
