//! Error types for the scheduler core and the service around it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::handlers::ApiResponse;

/// Contract violations detected by the scheduler.
///
/// The scheduler never fails on a well-formed state; every variant here means
/// a caller handed it something it must not.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
  #[error("invalid schedule state: {0}")]
  InvalidState(String),

  #[error("unknown review outcome: {0:?}")]
  UnknownOutcome(String),

  #[error("next review date is out of range")]
  DateOutOfRange,
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Schedule(#[from] ScheduleError),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("database unavailable")]
  DbLock,

  #[error("word not found: {0}")]
  WordNotFound(i64),

  #[error("{0}")]
  Validation(String),

  #[error("word {0} is not the current card of this review session")]
  NotCurrentCard(i64),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Schedule(ScheduleError::UnknownOutcome(_)) => StatusCode::BAD_REQUEST,
      Self::Schedule(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::DbLock => StatusCode::SERVICE_UNAVAILABLE,
      Self::WordNotFound(_) => StatusCode::NOT_FOUND,
      Self::Validation(_) => StatusCode::BAD_REQUEST,
      Self::NotCurrentCard(_) => StatusCode::CONFLICT,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("request failed: {}", self);
    } else {
      tracing::debug!("request rejected: {}", self);
    }
    (status, ApiResponse::<()>::err(self.to_string())).into_response()
  }
}
