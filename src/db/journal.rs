use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::journal::JournalEntry;

pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    content: &str,
    recorded_at: DateTime<Utc>,
) -> AppResult<JournalEntry> {
    let entry = sqlx::query_as::<_, JournalEntry>(
        r#"
        INSERT INTO journal_entries (user_id, content, recorded_at)
        VALUES (?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(content)
    .bind(recorded_at)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> AppResult<Vec<JournalEntry>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM journal_entries
        WHERE user_id = ?
        ORDER BY recorded_at DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn latest_for_user(pool: &SqlitePool, user_id: i64) -> AppResult<Option<JournalEntry>> {
    let entry = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT * FROM journal_entries
        WHERE user_id = ?
        ORDER BY recorded_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}
