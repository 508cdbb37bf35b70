pub mod outcome;
pub mod schedule;
pub mod word;

pub use outcome::Outcome;
pub use schedule::{
  CardScheduleState, DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL_DAYS, DEFAULT_REPETITIONS,
  MIN_EASE_FACTOR,
};
pub use word::{NewWord, Word, DEFAULT_LANGUAGE};
