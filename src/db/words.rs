//! Word CRUD and list queries

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::domain::{CardScheduleState, Word};

const WORD_COLUMNS: &str = "id, front_text, back_text, language, created_at, ease_factor, \
                            interval_days, repetitions, next_review";

/// Ordering of the word list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordSort {
    /// Newest first
    #[default]
    DateAdded,
    /// Soonest review first
    NextReview,
    /// Front text, case-insensitive
    Alphabetical,
}

/// Filters and ordering for `list_words`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordQuery {
    #[serde(default)]
    pub sort: WordSort,
    /// Substring matched against front and back text, case-insensitive
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Storage form of every timestamp: UTC, microseconds, `Z` suffix.
///
/// Queries sort and filter these columns as text, which only orders
/// chronologically while all rows share this exact form.
pub(crate) fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_instant(idx: usize, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn insert_word(conn: &Connection, word: &Word) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO words (front_text, back_text, language, created_at, ease_factor,
                       interval_days, repetitions, next_review)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#,
        params![
            word.front_text,
            word.back_text,
            word.language,
            format_instant(&word.created_at),
            word.schedule.ease_factor,
            word.schedule.interval_days,
            word.schedule.repetitions,
            format_instant(&word.schedule.next_review),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_word(conn: &Connection, id: i64) -> Result<Option<Word>> {
    conn.query_row(
        &format!("SELECT {} FROM words WHERE id = ?1", WORD_COLUMNS),
        params![id],
        row_to_word,
    )
    .optional()
}

/// Every word in insertion order
pub fn all_words(conn: &Connection) -> Result<Vec<Word>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM words ORDER BY id ASC", WORD_COLUMNS))?;
    let words = stmt
        .query_map([], row_to_word)?
        .collect::<Result<Vec<_>>>()?;
    Ok(words)
}

/// Scheduling fields of every word, keyed by id, in insertion order
pub fn all_schedules(conn: &Connection) -> Result<Vec<(i64, CardScheduleState)>> {
    Ok(all_words(conn)?
        .into_iter()
        .map(|word| (word.id, word.schedule))
        .collect())
}

pub fn list_words(conn: &Connection, query: &WordQuery) -> Result<Vec<Word>> {
    let language = query
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_ascii_lowercase);

    let order_by = match query.sort {
        WordSort::DateAdded => "created_at DESC, id DESC",
        WordSort::NextReview => "next_review ASC, id ASC",
        WordSort::Alphabetical => "id ASC",
    };

    let mut words = match language {
        Some(language) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM words WHERE language = ?1 ORDER BY {}",
                WORD_COLUMNS, order_by
            ))?;
            let rows = stmt
                .query_map(params![language], row_to_word)?
                .collect::<Result<Vec<_>>>()?;
            rows
        }
        None => {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM words ORDER BY {}", WORD_COLUMNS, order_by))?;
            let rows = stmt.query_map([], row_to_word)?.collect::<Result<Vec<_>>>()?;
            rows
        }
    };

    if let Some(needle) = query.q.as_deref().map(fold_case).filter(|q| !q.is_empty()) {
        words.retain(|w| fold_case(&w.front_text).contains(&needle) || fold_case(&w.back_text).contains(&needle));
    }

    if query.sort == WordSort::Alphabetical {
        // Stable: equal keys stay in insertion order
        words.sort_by_cached_key(|w| fold_case(&w.front_text));
    }

    Ok(words)
}

/// Comparison key: NFKC-normalized, lowercased, trimmed
fn fold_case(text: &str) -> String {
    text.trim().nfkc().collect::<String>().to_lowercase()
}

/// Write back the scheduling fields after a review
pub fn update_schedule(conn: &Connection, id: i64, schedule: &CardScheduleState) -> Result<bool> {
    let updated = conn.execute(
        r#"
    UPDATE words
    SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review = ?4
    WHERE id = ?5
    "#,
        params![
            schedule.ease_factor,
            schedule.interval_days,
            schedule.repetitions,
            format_instant(&schedule.next_review),
            id,
        ],
    )?;
    Ok(updated > 0)
}

/// Delete a word and its review history
pub fn delete_word(conn: &Connection, id: i64) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM review_logs WHERE word_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM words WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(deleted > 0)
}

pub fn count_words(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))
}

pub(crate) fn row_to_word(row: &rusqlite::Row) -> Result<Word> {
    let created_at: String = row.get(4)?;
    let next_review: String = row.get(8)?;

    Ok(Word {
        id: row.get(0)?,
        front_text: row.get(1)?,
        back_text: row.get(2)?,
        language: row.get(3)?,
        created_at: parse_instant(4, &created_at)?,
        schedule: CardScheduleState {
            ease_factor: row.get(5)?,
            interval_days: row.get(6)?,
            repetitions: row.get(7)?,
            next_review: parse_instant(8, &next_review)?,
        },
    })
}
