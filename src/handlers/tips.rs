use axum::{extract::State, Json};
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::AppState;

const FALLBACK_TIPS: [&str; 5] = [
    "Take a deep breath. You've survived 100% of your worst days.",
    "Write down 3 things you're grateful for.",
    "Go for a short walk to refresh your mind.",
    "Disconnect for 30 minutes and do something offline.",
    "Talk to a friend or loved one today.",
];

#[derive(Debug, Serialize)]
pub struct TipResponse {
    pub tip: String,
    pub source: &'static str, // "quote-api" or "fallback"
}

/// Quote of the day from the external API, with a built-in fallback
/// list when the call fails or times out.
pub async fn daily_tip(State(state): State<AppState>) -> Json<TipResponse> {
    match fetch_quote(&state.config.tip_api_url).await {
        Ok(tip) => Json(TipResponse {
            tip,
            source: "quote-api",
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Quote API unavailable, using fallback tip");
            let tip = FALLBACK_TIPS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(FALLBACK_TIPS[0]);
            Json(TipResponse {
                tip: tip.to_string(),
                source: "fallback",
            })
        }
    }
}

async fn fetch_quote(url: &str) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    let body: serde_json::Value = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let quote = body
        .get(0)
        .and_then(|v| v.get("q"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Unexpected quote payload"))?;
    let author = body
        .get(0)
        .and_then(|v| v.get("a"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown");

    Ok(format!("{} — {}", quote, author))
}
