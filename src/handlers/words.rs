//! Word list management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SubsecRound, Utc};

use crate::clock::Clock;
use crate::db::{self, WordQuery};
use crate::domain::{NewWord, Word};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::ApiResponse;

/// GET /words
pub async fn list_words(
  State(state): State<AppState>,
  Query(query): Query<WordQuery>,
) -> AppResult<impl IntoResponse> {
  let conn = db::try_lock(&state.db)?;
  let words = db::list_words(&conn, &query)?;
  Ok(ApiResponse::ok(words))
}

/// GET /words/{id}
pub async fn get_word(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
  let conn = db::try_lock(&state.db)?;
  let word = db::get_word(&conn, id)?.ok_or(AppError::WordNotFound(id))?;
  Ok(ApiResponse::ok(word))
}

/// POST /words
pub async fn add_word(
  State(state): State<AppState>,
  Json(input): Json<NewWord>,
) -> AppResult<impl IntoResponse> {
  let (front_text, back_text, language) = input.normalized().map_err(AppError::Validation)?;
  // Stored timestamps carry microseconds
  let now = state.clock.now().with_timezone(&Utc).trunc_subsecs(6);

  let mut word = Word::new(front_text, back_text, language, now);
  let conn = db::try_lock(&state.db)?;
  word.id = db::insert_word(&conn, &word)?;

  tracing::info!("Added word {} ({}): {}", word.id, word.language, word.front_text);
  Ok((StatusCode::CREATED, ApiResponse::ok(word)))
}

/// DELETE /words/{id}
pub async fn delete_word(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
  let conn = db::try_lock(&state.db)?;
  if !db::delete_word(&conn, id)? {
    return Err(AppError::WordNotFound(id));
  }
  tracing::info!("Deleted word {}", id);
  Ok(ApiResponse::ok("deleted"))
}
