//! Review session handlers.
//!
//! The due sequence is rebuilt from the database on every request; the
//! session only tracks which words were rated in the current pass.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::db;
use crate::domain::{Outcome, Word};
use crate::error::{AppError, AppResult};
use crate::srs::{self, IntervalPreview, ReviewSession, SessionProgress};
use crate::state::AppState;

use super::ApiResponse;

/// Card on screen plus the interval each rating would give it
#[derive(Debug, Serialize)]
pub struct StudyCard {
  pub word: Word,
  pub previews: IntervalPreview,
}

#[derive(Debug, Serialize)]
pub struct StudyView {
  /// Words due right now, rated or not
  pub due_count: usize,
  pub progress: SessionProgress,
  /// 1-based "card N of M" position
  pub position: Option<usize>,
  /// `None` once every due word was rated
  pub card: Option<StudyCard>,
  /// Earliest upcoming review, reported when nothing is left
  pub next_review: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  pub word_id: i64,
  pub outcome: String,
}

fn build_view(conn: &Connection, session: &ReviewSession<i64>, now: &DateTime<Tz>) -> AppResult<StudyView> {
  let words = db::all_words(conn)?;
  let due: Vec<i64> = srs::due_words(&words, now).iter().map(|w| w.id).collect();
  let progress = session.progress(&due);

  let card = match session.current(&due) {
    Some(id) => {
      let word = words
        .iter()
        .find(|w| w.id == *id)
        .cloned()
        .ok_or(AppError::WordNotFound(*id))?;
      let previews = srs::preview_all(&word.schedule, now)?;
      Some(StudyCard { word, previews })
    }
    None => None,
  };

  let next_review = if session.is_finished(&due) {
    srs::next_due_instant(words.iter().map(|w| &w.schedule), now)
  } else {
    None
  };

  Ok(StudyView {
    due_count: due.len(),
    progress,
    position: progress.position(),
    card,
    next_review,
  })
}

/// GET /study
pub async fn study(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
  let now = state.clock.now();
  let conn = db::try_lock(&state.db)?;
  let mut session = state.session();
  if session.roll_over(now.date_naive()) {
    tracing::info!("New study day {}, starting a fresh pass", now.date_naive());
  }
  let view = build_view(&conn, &session, &now)?;
  Ok(ApiResponse::ok(view))
}

/// POST /study/review
pub async fn submit_review(
  State(state): State<AppState>,
  Json(req): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
  let outcome = Outcome::parse(&req.outcome)?;
  let now = state.clock.now();
  let conn = db::try_lock(&state.db)?;
  let mut session = state.session();
  session.roll_over(now.date_naive());

  let words = db::all_words(&conn)?;
  let word = words
    .iter()
    .find(|w| w.id == req.word_id)
    .ok_or(AppError::WordNotFound(req.word_id))?;

  let due: Vec<i64> = srs::due_words(&words, &now).iter().map(|w| w.id).collect();
  if session.current(&due) != Some(&word.id) {
    return Err(AppError::NotCurrentCard(word.id));
  }

  let next = srs::apply_review(&word.schedule, outcome, &now)?;
  let reviewed_at = now.with_timezone(&Utc).trunc_subsecs(6);
  if !db::record_review(&conn, word.id, outcome, &next, reviewed_at)? {
    return Err(AppError::WordNotFound(word.id));
  }
  session.commit(word.id);

  tracing::debug!(
    "Reviewed word {} as {}: interval {} -> {} days, ease {:.2}",
    word.id,
    outcome.label(),
    word.schedule.interval_days,
    next.interval_days,
    next.ease_factor
  );

  let view = build_view(&conn, &session, &now)?;
  Ok(ApiResponse::ok(view))
}

/// POST /study/restart
pub async fn restart(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
  let now = state.clock.now();
  let conn = db::try_lock(&state.db)?;
  let mut session = state.session();
  session.restart();
  tracing::info!("Review session restarted");
  let view = build_view(&conn, &session, &now)?;
  Ok(ApiResponse::ok(view))
}
