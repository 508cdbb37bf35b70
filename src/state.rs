//! Application state shared by all handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::Clock;
use crate::db::DbPool;
use crate::srs::ReviewSession;

/// The single active review pass (one reviewer at a time)
pub type SharedSession = Arc<Mutex<ReviewSession<i64>>>;

#[derive(Clone)]
pub struct AppState {
  pub db: DbPool,
  pub clock: Arc<dyn Clock>,
  pub session: SharedSession,
}

impl AppState {
  pub fn new(db: DbPool, clock: Arc<dyn Clock>) -> Self {
    Self {
      db,
      clock,
      session: Arc::new(Mutex::new(ReviewSession::new())),
    }
  }

  /// Lock the review session, recovering it if a previous holder panicked
  pub fn session(&self) -> MutexGuard<'_, ReviewSession<i64>> {
    self.session.lock().unwrap_or_else(|e| e.into_inner())
  }
}
