use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub level: i32,
    pub note: String,
    pub recorded_at: DateTime<Utc>,
}

/// Out-of-range levels are clamped on construction, never rejected and
/// never stored out of range. The schema CHECK is only a backstop.
pub fn clamp_level(level: i32) -> i32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Human label for a (clamped) mood level.
pub fn level_description(level: i32) -> &'static str {
    match level {
        1 => "Terrible",
        2 => "Very Bad",
        3 => "Bad",
        4 => "Poor",
        5 => "Okay",
        6 => "Fair",
        7 => "Good",
        8 => "Very Good",
        9 => "Great",
        10 => "Excellent",
        _ => "Unknown",
    }
}

/// A mood entry as returned by the API, with its level label attached.
#[derive(Debug, Serialize)]
pub struct MoodView {
    #[serde(flatten)]
    pub entry: MoodEntry,
    pub description: &'static str,
}

impl From<MoodEntry> for MoodView {
    fn from(entry: MoodEntry) -> Self {
        let description = level_description(entry.level);
        Self { entry, description }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogMoodRequest {
    pub level: i32,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMoodRequest {
    pub level: i32,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoodListQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_level(0), 1);
        assert_eq!(clamp_level(-5), 1);
        assert_eq!(clamp_level(11), 10);
        assert_eq!(clamp_level(100), 10);
        assert_eq!(clamp_level(1), 1);
        assert_eq!(clamp_level(7), 7);
        assert_eq!(clamp_level(10), 10);
    }

    #[test]
    fn descriptions_cover_scale() {
        assert_eq!(level_description(1), "Terrible");
        assert_eq!(level_description(5), "Okay");
        assert_eq!(level_description(10), "Excellent");
        assert_eq!(level_description(0), "Unknown");
    }
}
