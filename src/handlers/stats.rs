use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::db::moods;
use crate::error::AppResult;
use crate::services::stats::{aggregate, current_streak, recommendations, StreakPolicy};
use crate::AppState;

/// Derived statistics are recomputed from the ledger on every request;
/// nothing here is persisted.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_entries: u32,
    pub average_level: f64,
    pub min_level: i32,
    pub max_level: i32,
    pub current_streak_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct StreakQuery {
    pub policy: Option<StreakPolicy>,
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub streak: u32,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<&'static str>,
}

pub async fn get_statistics(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<StatsResponse>> {
    let levels = moods::levels_for_user(&state.db, auth_user.id).await?;
    let agg = aggregate(&levels);

    let dates = moods::dates_desc(&state.db, auth_user.id).await?;
    let today = Utc::now().date_naive();
    let streak = current_streak(today, &dates, StreakPolicy::default());

    Ok(Json(StatsResponse {
        total_entries: agg.total_entries,
        average_level: agg.average_level,
        min_level: agg.min_level,
        max_level: agg.max_level,
        current_streak_days: streak,
    }))
}

pub async fn get_streak(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<StreakQuery>,
) -> AppResult<Json<StreakResponse>> {
    let policy = query.policy.unwrap_or_default();

    let dates = moods::dates_desc(&state.db, auth_user.id).await?;
    let today = Utc::now().date_naive();
    let streak = current_streak(today, &dates, policy);

    Ok(Json(StreakResponse { streak }))
}

pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<RecommendationsResponse>> {
    let today = Utc::now().date_naive();
    let today_mood = moods::latest_on_date(&state.db, auth_user.id, today).await?;

    Ok(Json(RecommendationsResponse {
        recommendations: recommendations(today_mood.map(|m| m.level)),
    }))
}
