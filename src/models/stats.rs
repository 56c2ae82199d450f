//! Derived statistics models.
//!
//! These are pure projections of the match log at read time. They are never
//! persisted; every view recomputes them from the stored matches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Outcome of a single match from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Win => write!(f, "W"),
            MatchOutcome::Loss => write!(f, "L"),
        }
    }
}

/// Aggregate statistics for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub name: String,
    pub level: u8,

    pub wins: u32,
    pub losses: u32,

    /// Win percentage, 0-100. Defined as 0 for a player with no matches.
    pub win_rate: f64,

    pub sets_won: u32,
    pub sets_lost: u32,

    /// Signed run of results ending at the most recent match: positive is a
    /// win streak, negative a loss streak, 0 means no matches.
    pub current_streak: i64,

    /// Most recent results, newest first, capped at five.
    pub recent_form: Vec<MatchOutcome>,

    /// Longest run of consecutive wins anywhere in the player's history.
    pub max_win_streak: u32,

    /// Longest run of consecutive losses anywhere in the player's history.
    pub max_lose_streak: u32,
}

impl PlayerStats {
    /// All-zero stats for a player who has not played yet.
    pub fn empty(player_id: PlayerId, name: String, level: u8) -> Self {
        Self {
            player_id,
            name,
            level,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            sets_won: 0,
            sets_lost: 0,
            current_streak: 0,
            recent_form: Vec::new(),
            max_win_streak: 0,
            max_lose_streak: 0,
        }
    }

    pub fn total_matches(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn set_diff(&self) -> i64 {
        self.sets_won as i64 - self.sets_lost as i64
    }
}

/// One entry in the recent attendance window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    pub date: NaiveDate,
    pub attended: bool,
}

/// Attendance summary for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub player_id: PlayerId,
    pub name: String,
    pub level: u8,

    /// Match days this player appeared on, over the full history.
    pub attendance_count: u32,

    /// Distinct days on which any club match was played.
    pub total_match_days: u32,

    /// Attendance percentage, 0-100. 0 when the club has no match days.
    pub attendance_rate: f64,

    /// Per-day attendance over the most recent match days, newest first.
    pub recent: Vec<AttendanceDay>,
}

/// Record against one specific opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    pub opponent_id: PlayerId,
    pub opponent_name: String,
    pub opponent_level: u8,

    pub wins: u32,
    pub losses: u32,

    /// Win percentage against this opponent, 0 when the pair never met.
    pub win_rate: f64,
}
