use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use super::words::format_instant;

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Complete schema for new databases; migrations below upgrade older files
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS words (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      front_text TEXT NOT NULL,
      back_text TEXT NOT NULL,
      language TEXT NOT NULL DEFAULT 'ko',
      created_at TEXT NOT NULL,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 1,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS review_logs (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      word_id INTEGER NOT NULL,
      outcome TEXT NOT NULL,
      interval_days INTEGER NOT NULL,
      reviewed_at TEXT NOT NULL,
      FOREIGN KEY (word_id) REFERENCES words(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_words_next_review ON words(next_review);
    CREATE INDEX IF NOT EXISTS idx_review_logs_word_id ON review_logs(word_id);
    CREATE INDEX IF NOT EXISTS idx_review_logs_reviewed_at ON review_logs(reviewed_at);
    "#,
  )?;

  // Migration: words created before multi-language support are Korean
  add_column_if_missing(conn, "words", "language", "TEXT NOT NULL DEFAULT 'ko'")?;

  // Migration: timestamps are compared as text, so rewrite any other RFC 3339 form
  normalize_timestamps(conn, "words", "created_at")?;
  normalize_timestamps(conn, "words", "next_review")?;
  normalize_timestamps(conn, "review_logs", "reviewed_at")?;

  Ok(())
}

/// Rewrite parseable timestamps that are not in `format_instant` form.
///
/// Unparseable values are left alone; reading them fails loudly later.
fn normalize_timestamps(conn: &Connection, table: &str, column: &str) -> Result<()> {
  let mut stmt = conn.prepare(&format!("SELECT id, {} FROM {}", column, table))?;
  let stale: Vec<(i64, String)> = stmt
    .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
    .collect::<Result<Vec<_>>>()?
    .into_iter()
    .filter_map(|(id, value)| {
      let parsed = DateTime::parse_from_rfc3339(&value).ok()?.with_timezone(&Utc);
      let canonical = format_instant(&parsed);
      (canonical != value).then_some((id, canonical))
    })
    .collect();

  if !stale.is_empty() {
    tracing::info!("Migrating {}: normalizing {} {} values", table, stale.len(), column);
  }
  for (id, canonical) in stale {
    conn.execute(
      &format!("UPDATE {} SET {} = ?1 WHERE id = ?2", table, column),
      params![canonical, id],
    )?;
  }
  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    tracing::info!("Migrating {}: adding column {}", table, column);
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
    assert!(column_exists(&conn, "words", "language"));
    assert!(column_exists(&conn, "review_logs", "outcome"));
  }

  #[test]
  fn test_language_column_added_to_old_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn
      .execute_batch(
        r#"
        CREATE TABLE words (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          front_text TEXT NOT NULL,
          back_text TEXT NOT NULL,
          created_at TEXT NOT NULL,
          ease_factor REAL NOT NULL DEFAULT 2.5,
          interval_days INTEGER NOT NULL DEFAULT 1,
          repetitions INTEGER NOT NULL DEFAULT 0,
          next_review TEXT NOT NULL
        );
        INSERT INTO words (front_text, back_text, created_at, next_review)
        VALUES ('안녕', 'hello', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z');
        "#,
      )
      .unwrap();

    run_migrations(&conn).unwrap();

    let language: String = conn
      .query_row("SELECT language FROM words WHERE front_text = '안녕'", [], |row| row.get(0))
      .unwrap();
    assert_eq!(language, "ko");

    let next_review: String = conn
      .query_row("SELECT next_review FROM words WHERE front_text = '안녕'", [], |row| row.get(0))
      .unwrap();
    assert_eq!(next_review, "2025-01-01T00:00:00.000000Z");
  }

  #[test]
  fn test_mixed_timestamp_forms_sort_chronologically_after_migration() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
      .execute_batch(
        r#"
        INSERT INTO words (front_text, back_text, created_at, next_review)
        VALUES ('늦은', 'late', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00.500000Z');
        INSERT INTO words (front_text, back_text, created_at, next_review)
        VALUES ('이른', 'early', '2025-01-01T00:00:00Z', '2025-01-01T09:00:00+09:00');
        INSERT INTO review_logs (word_id, outcome, interval_days, reviewed_at)
        VALUES (1, 'good', 1, '2025-01-01T20:00:00-05:00');
        "#,
      )
      .unwrap();

    run_migrations(&conn).unwrap();

    let query = crate::db::WordQuery {
      sort: crate::db::WordSort::NextReview,
      ..Default::default()
    };
    let fronts: Vec<String> = crate::db::list_words(&conn, &query)
      .unwrap()
      .into_iter()
      .map(|w| w.front_text)
      .collect();
    assert_eq!(fronts, vec!["이른", "늦은"]);

    let since = DateTime::parse_from_rfc3339("2025-01-02T00:00:00Z").unwrap().with_timezone(&Utc);
    assert_eq!(crate::db::count_reviews_since(&conn, since).unwrap(), 1);
  }
}
