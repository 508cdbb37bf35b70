//! Review-session cursor.
//!
//! The due sequence is recomputed after every rating, so the cursor never
//! holds a live list. It only remembers which keys were already rated in the
//! current pass and always points at the first due key not among them.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::hash::Hash;

/// Position of a reviewer within one pass over the due words
#[derive(Debug, Clone)]
pub struct ReviewSession<K = i64> {
  rated: HashSet<K>,
  /// Study day the pass belongs to
  day: Option<NaiveDate>,
}

impl<K> Default for ReviewSession<K> {
  fn default() -> Self {
    Self {
      rated: HashSet::new(),
      day: None,
    }
  }
}

/// Counts shown as "Card N of M"
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SessionProgress {
  pub rated: usize,
  pub remaining: usize,
}

impl SessionProgress {
  /// 1-based position of the current card, if any remain
  pub fn position(&self) -> Option<usize> {
    (self.remaining > 0).then_some(self.rated + 1)
  }
}

impl<K: Eq + Hash> ReviewSession<K> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Current card: the first key of `due` not rated in this pass.
  ///
  /// `None` means the pass is finished.
  pub fn current<'a>(&self, due: &'a [K]) -> Option<&'a K> {
    due.iter().find(|key| !self.rated.contains(*key))
  }

  /// Record that `key` was rated. Returns false if it was already rated in this pass.
  pub fn commit(&mut self, key: K) -> bool {
    self.rated.insert(key)
  }

  pub fn progress(&self, due: &[K]) -> SessionProgress {
    SessionProgress {
      rated: self.rated.len(),
      remaining: due.iter().filter(|key| !self.rated.contains(*key)).count(),
    }
  }

  pub fn is_finished(&self, due: &[K]) -> bool {
    self.current(due).is_none()
  }

  /// Begin a new pass
  pub fn restart(&mut self) {
    self.rated.clear();
  }

  /// Start a fresh pass when `today` differs from the pass's day.
  ///
  /// Returns true if the pass was restarted.
  pub fn roll_over(&mut self, today: NaiveDate) -> bool {
    match self.day {
      Some(day) if day == today => false,
      Some(_) => {
        self.restart();
        self.day = Some(today);
        true
      }
      None => {
        self.day = Some(today);
        false
      }
    }
  }
}
