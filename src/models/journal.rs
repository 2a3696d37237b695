use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Journal entries are immutable once written; there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJournalRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct JournalListQuery {
    pub limit: Option<i64>,
}

/// Shape of GET /api/journal/latest: an empty content with no timestamp
/// when the account has never written an entry.
#[derive(Debug, Serialize)]
pub struct LatestJournalResponse {
    pub content: String,
    pub recorded_at: Option<DateTime<Utc>>,
}
