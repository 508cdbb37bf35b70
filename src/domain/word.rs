use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schedule::CardScheduleState;

/// Language code assumed when none is given
pub const DEFAULT_LANGUAGE: &str = "ko";

/// A word/translation pair with its review schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
  pub id: i64,
  pub front_text: String,
  /// Translation shown on the back of the card
  pub back_text: String,
  /// Language code of `front_text` (e.g. "ko", "ja", "zh")
  pub language: String,
  pub created_at: DateTime<Utc>,
  #[serde(flatten)]
  pub schedule: CardScheduleState,
}

/// Input for adding a word
#[derive(Debug, Clone, Deserialize)]
pub struct NewWord {
  pub front_text: String,
  pub back_text: String,
  #[serde(default)]
  pub language: Option<String>,
}

impl NewWord {
  /// Trim both sides and settle the language code.
  ///
  /// Returns a message describing the first problem when a side is blank.
  pub fn normalized(&self) -> Result<(String, String, String), String> {
    let front = self.front_text.trim();
    let back = self.back_text.trim();
    if front.is_empty() {
      return Err("front text must not be empty".to_string());
    }
    if back.is_empty() {
      return Err("back text must not be empty".to_string());
    }
    let language = self
      .language
      .as_deref()
      .map(str::trim)
      .filter(|l| !l.is_empty())
      .unwrap_or(DEFAULT_LANGUAGE)
      .to_ascii_lowercase();
    Ok((front.to_string(), back.to_string(), language))
  }
}

impl Word {
  pub fn new(
    front_text: String,
    back_text: String,
    language: String,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: 0,
      front_text,
      back_text,
      language,
      created_at,
      schedule: CardScheduleState::new(created_at),
    }
  }
}
