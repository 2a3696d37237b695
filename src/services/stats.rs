//! Statistics over the mood ledger: aggregates, day streaks, and
//! tiered recommendations. Everything here is a pure function over
//! inputs the caller fetched; nothing touches storage and nothing is
//! cached between calls.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodAggregate {
    pub total_entries: u32,
    /// Arithmetic mean rounded to one decimal; 0.0 for an empty ledger
    /// so consumers never see NaN.
    pub average_level: f64,
    pub min_level: i32,
    pub max_level: i32,
}

pub fn aggregate(levels: &[i32]) -> MoodAggregate {
    if levels.is_empty() {
        return MoodAggregate {
            total_entries: 0,
            average_level: 0.0,
            min_level: 0,
            max_level: 0,
        };
    }

    let sum: i64 = levels.iter().map(|&l| l as i64).sum();
    let average = sum as f64 / levels.len() as f64;

    MoodAggregate {
        total_entries: levels.len() as u32,
        average_level: (average * 10.0).round() / 10.0,
        min_level: levels.iter().copied().min().unwrap_or(0),
        max_level: levels.iter().copied().max().unwrap_or(0),
    }
}

/// Where the backward walk of the streak is allowed to start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakPolicy {
    /// The streak must include today; no entry today means streak 0.
    #[default]
    Anchored,
    /// An unbroken run is still alive if its newest day is yesterday;
    /// today's entry has simply not been made yet.
    Grace,
}

/// Count consecutive calendar days with at least one entry, walking
/// backward from the anchor day. `dates_desc` must be deduplicated and
/// sorted newest-first; the first gap ends the scan.
pub fn current_streak(today: NaiveDate, dates_desc: &[NaiveDate], policy: StreakPolicy) -> u32 {
    let Some(&newest) = dates_desc.first() else {
        return 0;
    };

    let anchor = match policy {
        StreakPolicy::Anchored => today,
        StreakPolicy::Grace => {
            if newest == today - Duration::days(1) {
                newest
            } else {
                today
            }
        }
    };

    let mut streak = 0u32;
    for (i, &date) in dates_desc.iter().enumerate() {
        if date == anchor - Duration::days(i as i64) {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

const LOW_MOOD_TIER: [&str; 3] = [
    "Consider reaching out to a trusted friend or family member",
    "Try some deep breathing exercises or meditation",
    "Take a short walk outside if possible",
];

const MID_MOOD_TIER: [&str; 3] = [
    "Try journaling about your feelings",
    "Listen to some uplifting music",
    "Practice gratitude by listing three things you're thankful for",
];

const HIGH_MOOD_TIER: [&str; 3] = [
    "Great mood! Consider sharing your positivity with others",
    "This is a good time to tackle challenging tasks",
    "Reflect on what's contributing to your good mood",
];

const GENERAL_TIER: [&str; 3] = [
    "Remember to practice self-care",
    "Stay connected with loved ones",
    "Maintain a regular sleep schedule",
];

/// Pick the recommendation tier for today's mood level. Mid-range
/// levels (6-7) and days with no entry fall through to the general
/// tier, so the result is never empty.
pub fn recommendations(today_level: Option<i32>) -> Vec<&'static str> {
    let tier = match today_level {
        Some(level) if level <= 3 => &LOW_MOOD_TIER,
        Some(level) if level <= 5 => &MID_MOOD_TIER,
        Some(level) if level >= 8 => &HIGH_MOOD_TIER,
        _ => &GENERAL_TIER,
    };

    tier.to_vec()
}
