//! Test utilities: in-memory state with a pinned clock.

use axum::body::to_bytes;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Asia::Seoul;
use chrono_tz::Tz;
use serde_json::Value;
use std::sync::Arc;

use crate::clock::{Clock, FixedClock};
use crate::db::{self, DbPool};
use crate::domain::Word;
use crate::state::AppState;

/// Application state backed by an in-memory database and a `FixedClock`.
pub struct TestEnv {
  pub state: AppState,
  pub clock: Arc<FixedClock>,
}

impl TestEnv {
  /// Clock starts at 2025-03-10 09:00 Seoul time
  pub fn new() -> Self {
    Self::at(Seoul.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap())
  }

  pub fn at(now: DateTime<Tz>) -> Self {
    let pool = db::init_memory_db().expect("in-memory database");
    let clock = Arc::new(FixedClock::new(now));
    let state = AppState::new(pool, clock.clone());
    Self { state, clock }
  }

  pub fn db(&self) -> &DbPool {
    &self.state.db
  }

  /// Insert a word created "now", optionally due `due_offset_days` from today
  pub fn add_word(&self, front: &str, back: &str, due_offset_days: i64) -> i64 {
    let now = self.clock.now();
    let mut word = Word::new(front.into(), back.into(), "ko".into(), now.with_timezone(&Utc));
    word.schedule.next_review = (now + Duration::days(due_offset_days)).with_timezone(&Utc);
    let conn = db::try_lock(self.db()).expect("db lock");
    db::insert_word(&conn, &word).expect("insert word")
  }
}

/// Status and parsed JSON body of a handler response
pub async fn read_json(resp: impl IntoResponse) -> (axum::http::StatusCode, Value) {
  let resp: Response = resp.into_response();
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
  let value = serde_json::from_slice(&bytes).expect("json body");
  (status, value)
}
