use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Self-rated recall quality for one review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Again,
  Hard,
  Good,
  Easy,
}

impl Outcome {
  /// All outcomes in button order
  pub const ALL: [Outcome; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Again => "Again",
      Self::Hard => "Hard",
      Self::Good => "Good",
      Self::Easy => "Easy",
    }
  }

  /// Parse a rating code, case-insensitive
  pub fn parse(s: &str) -> Result<Self, ScheduleError> {
    match s.trim().to_ascii_lowercase().as_str() {
      "again" => Ok(Self::Again),
      "hard" => Ok(Self::Hard),
      "good" => Ok(Self::Good),
      "easy" => Ok(Self::Easy),
      _ => Err(ScheduleError::UnknownOutcome(s.to_string())),
    }
  }
}

impl std::str::FromStr for Outcome {
  type Err = ScheduleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}
