//! AI match-day commentary.
//!
//! Formats a day's results and the current ranking into an announcer
//! prompt and sends it to a pluggable chat backend (local Ollama by
//! default). Purely a flavor feature: nothing downstream depends on it.

pub mod backend;

pub use backend::{CommentaryBackend, OllamaBackend};

use thiserror::Error;

use crate::calculate::rounded_percent;
use crate::models::PlayerStats;

/// Errors from the commentary pipeline.
#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("commentary backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("commentary backend returned an unusable response: {0}")]
    BadResponse(String),

    #[error("nothing to commentate: {0}")]
    NoMaterial(String),
}

/// One finished match, resolved to display names for the prompt.
#[derive(Debug, Clone)]
pub struct ResultLine {
    pub winner: String,
    pub winner_level: u8,
    pub loser: String,
    pub loser_level: u8,
    pub winner_sets: u32,
    pub loser_sets: u32,
}

const SYSTEM_PROMPT: &str = "You are an enthusiastic, professional table-tennis \
announcer for a small club league. Summarise the day in at most three short \
sentences: call out the highlight match, any upset, and a player of the day. \
Keep it light and a little humorous. Refer to players by name only.";

/// Build the user prompt for one match day.
pub fn daily_prompt(results: &[ResultLine], standings: &[PlayerStats]) -> String {
    let mut prompt = String::from("Today's results:\n");
    for r in results {
        prompt.push_str(&format!(
            "- {} (div {}) beat {} (div {}) {}-{}\n",
            r.winner, r.winner_level, r.loser, r.loser_level, r.winner_sets, r.loser_sets
        ));
    }

    prompt.push_str("\nCurrent ranking:\n");
    for (i, s) in standings.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} ({}% win rate, {}W {}L)\n",
            i + 1,
            s.name,
            rounded_percent(s.win_rate),
            s.wins,
            s.losses
        ));
    }

    prompt
}

/// Generate commentary for a day's results via the given backend.
pub async fn generate_commentary(
    backend: &dyn CommentaryBackend,
    results: &[ResultLine],
    standings: &[PlayerStats],
) -> Result<String, CommentaryError> {
    if results.is_empty() {
        return Err(CommentaryError::NoMaterial(
            "no matches were played on that day".to_string(),
        ));
    }

    let prompt = daily_prompt(results, standings);
    let text = backend.complete(SYSTEM_PROMPT, &prompt).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(CommentaryError::BadResponse("empty completion".to_string()));
    }
    Ok(text.to_string())
}
