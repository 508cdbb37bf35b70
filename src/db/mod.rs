pub mod reviews;
pub mod schema;
pub mod words;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AppError;

pub use reviews::*;
pub use schema::run_migrations;
pub use words::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        self.log_warn(context).unwrap_or_default()
    }
}

/// Acquire the database lock, failing instead of panicking if it is poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock().map_err(|_: PoisonError<_>| {
        tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
        AppError::DbLock
    })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).log_warn("Could not create database directory");
    }

    // Back up before migrations touch an existing file
    if path.exists() {
        std::fs::copy(path, path.with_extension("db.backup")).log_warn("Could not create database backup");
    }

    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Fresh in-memory database with the full schema
pub fn init_memory_db() -> Result<DbPool> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_db_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/vocab.db");
        let pool = init_db(&path).unwrap();

        assert!(path.exists());
        let conn = try_lock(&pool).unwrap();
        assert_eq!(count_words(&conn).unwrap(), 0);
    }

    #[test]
    fn test_init_db_backs_up_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vocab.db");
        drop(init_db(&path).unwrap());
        drop(init_db(&path).unwrap());

        assert!(temp.path().join("vocab.db.backup").exists());
    }

    #[test]
    fn test_log_warn_default() {
        let failed: std::result::Result<i64, String> = Err("boom".into());
        assert_eq!(failed.log_warn_default("context"), 0);

        let ok: std::result::Result<i64, String> = Ok(4);
        assert_eq!(ok.log_warn("context"), Some(4));
    }

    #[test]
    fn test_try_lock_poisoned() {
        let pool = init_memory_db().unwrap();
        let cloned = pool.clone();
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(try_lock(&pool), Err(AppError::DbLock)));
    }
}
