use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::db::moods;
use crate::error::{AppError, AppResult};
use crate::models::mood::{
    clamp_level, LogMoodRequest, MoodListQuery, MoodView, UpdateMoodRequest,
};
use crate::services::stats;
use crate::AppState;

const DEFAULT_LIST_LIMIT: i64 = 10;
const MAX_LIST_LIMIT: i64 = 100;

/// Response for POST /api/moods: the stored entry plus the refreshed
/// ledger-wide counters.
#[derive(Debug, Serialize)]
pub struct LogMoodResponse {
    pub entry: MoodView,
    pub total_entries: u32,
    pub average_level: f64,
}

pub async fn log_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<LogMoodRequest>,
) -> AppResult<Json<LogMoodResponse>> {
    let level = clamp_level(body.level);
    let note = body.note.as_deref().unwrap_or("").trim().to_string();

    let entry = moods::insert(&state.db, auth_user.id, level, &note, Utc::now()).await?;

    let levels = moods::levels_for_user(&state.db, auth_user.id).await?;
    let agg = stats::aggregate(&levels);

    Ok(Json(LogMoodResponse {
        entry: entry.into(),
        total_entries: agg.total_entries,
        average_level: agg.average_level,
    }))
}

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MoodListQuery>,
) -> AppResult<Json<Vec<MoodView>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let entries = moods::list_for_user(&state.db, auth_user.id, limit).await?;
    Ok(Json(entries.into_iter().map(MoodView::from).collect()))
}

pub async fn today_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Option<MoodView>>> {
    let today = Utc::now().date_naive();
    let entry = moods::latest_on_date(&state.db, auth_user.id, today).await?;
    Ok(Json(entry.map(MoodView::from)))
}

pub async fn update_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<i64>,
    Json(body): Json<UpdateMoodRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let level = clamp_level(body.level);
    let note = body.note.as_deref().unwrap_or("").trim().to_string();

    let updated = moods::update(&state.db, mood_id, auth_user.id, level, &note).await?;
    if !updated {
        return Err(AppError::NotFound("Mood entry not found".into()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Mood updated successfully" }),
    ))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = moods::delete(&state.db, mood_id, auth_user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Mood entry not found".into()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
