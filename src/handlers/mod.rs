//! JSON API handlers.
//!
//! Every response uses the `{success, data, error}` envelope.

pub mod stats;
pub mod study;
pub mod words;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Response wrapper for consistent API format.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
  pub fn ok(data: T) -> Json<Self> {
    Json(Self {
      success: true,
      data: Some(data),
      error: None,
    })
  }

  pub fn err(message: String) -> Json<Self> {
    Json(Self {
      success: false,
      data: None,
      error: Some(message),
    })
  }
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/words", get(words::list_words).post(words::add_word))
    .route("/words/{id}", get(words::get_word).delete(words::delete_word))
    .route("/study", get(study::study))
    .route("/study/review", post(study::submit_review))
    .route("/study/restart", post(study::restart))
    .route("/stats", get(stats::stats))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub use stats::stats;
pub use study::{restart, study, submit_review};
pub use words::{add_word, delete_word, get_word, list_words};
