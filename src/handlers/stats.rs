use axum::extract::State;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::db;
use crate::error::{AppResult, ScheduleError};
use crate::srs::{self, calendar};
use crate::state::AppState;

use super::ApiResponse;

#[derive(Debug, Serialize)]
pub struct StatsView {
  pub total_words: i64,
  pub due_today: usize,
  /// Reviews logged since local midnight
  pub reviews_today: i64,
  /// Earliest review not yet due
  pub next_review: Option<DateTime<Utc>>,
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
  let now = state.clock.now();
  let midnight = calendar::start_of_day(&now).ok_or(ScheduleError::DateOutOfRange)?;

  let conn = db::try_lock(&state.db)?;
  let schedules = db::all_schedules(&conn)?;

  let view = StatsView {
    total_words: db::count_words(&conn)?,
    due_today: srs::due_count(schedules.iter().map(|(_, s)| s), &now),
    reviews_today: db::count_reviews_since(&conn, midnight.with_timezone(&Utc))?,
    next_review: srs::next_due_instant(schedules.iter().map(|(_, s)| s), &now),
  };
  Ok(ApiResponse::ok(view))
}
