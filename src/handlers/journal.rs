use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::db::journal;
use crate::error::{AppError, AppResult};
use crate::models::journal::{
    CreateJournalRequest, JournalEntry, JournalListQuery, LatestJournalResponse,
};
use crate::AppState;

const DEFAULT_LIST_LIMIT: i64 = 10;
const MAX_LIST_LIMIT: i64 = 100;

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateJournalRequest>,
) -> AppResult<Json<JournalEntry>> {
    let content = body.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Journal entry cannot be empty".into()));
    }

    let entry = journal::insert(&state.db, auth_user.id, content, Utc::now()).await?;
    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<JournalListQuery>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let entries = journal::list_for_user(&state.db, auth_user.id, limit).await?;
    Ok(Json(entries))
}

pub async fn latest_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<LatestJournalResponse>> {
    let latest = journal::latest_for_user(&state.db, auth_user.id).await?;

    let response = match latest {
        Some(entry) => LatestJournalResponse {
            content: entry.content,
            recorded_at: Some(entry.recorded_at),
        },
        None => LatestJournalResponse {
            content: String::new(),
            recorded_at: None,
        },
    };

    Ok(Json(response))
}
