//! Review history

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use serde::Serialize;

use crate::domain::{CardScheduleState, Outcome};

use super::words::{format_instant, parse_instant, update_schedule};

#[derive(Debug, Clone, Serialize)]
pub struct ReviewLog {
    pub id: i64,
    pub word_id: i64,
    pub outcome: Outcome,
    /// Interval the review produced
    pub interval_days: i64,
    pub reviewed_at: DateTime<Utc>,
}

pub fn insert_review_log(
    conn: &Connection,
    word_id: i64,
    outcome: Outcome,
    interval_days: i64,
    reviewed_at: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO review_logs (word_id, outcome, interval_days, reviewed_at) VALUES (?1, ?2, ?3, ?4)",
        params![word_id, outcome.as_str(), interval_days, format_instant(&reviewed_at)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Persist a review: new schedule plus a log row, atomically.
///
/// Returns false (and writes nothing) if the word no longer exists.
pub fn record_review(
    conn: &Connection,
    word_id: i64,
    outcome: Outcome,
    schedule: &CardScheduleState,
    reviewed_at: DateTime<Utc>,
) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    if !update_schedule(&tx, word_id, schedule)? {
        return Ok(false);
    }
    insert_review_log(&tx, word_id, outcome, schedule.interval_days, reviewed_at)?;
    tx.commit()?;
    Ok(true)
}

pub fn get_review_logs(conn: &Connection, word_id: i64) -> Result<Vec<ReviewLog>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, word_id, outcome, interval_days, reviewed_at
    FROM review_logs
    WHERE word_id = ?1
    ORDER BY reviewed_at ASC, id ASC
    "#,
    )?;

    let logs = stmt
        .query_map(params![word_id], |row| {
            let outcome: String = row.get(2)?;
            let reviewed_at: String = row.get(4)?;
            Ok(ReviewLog {
                id: row.get(0)?,
                word_id: row.get(1)?,
                outcome: Outcome::parse(&outcome).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
                })?,
                interval_days: row.get(3)?,
                reviewed_at: parse_instant(4, &reviewed_at)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(logs)
}

/// Number of reviews at or after `since`
pub fn count_reviews_since(conn: &Connection, since: DateTime<Utc>) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM review_logs WHERE reviewed_at >= ?1",
        params![format_instant(&since)],
        |row| row.get(0),
    )
}
