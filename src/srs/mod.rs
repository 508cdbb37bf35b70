pub mod calendar;
pub mod due;
pub mod session;
pub mod sm2;

pub use due::{due_cards, due_count, due_words, is_due, next_due_instant};
pub use session::{ReviewSession, SessionProgress};
pub use sm2::{apply_review, preview_all, preview_interval, IntervalPreview};
