//! Match result model.
//!
//! A match is immutable history once recorded. The winner is always the
//! side with more sets: callers submit an order-agnostic `MatchSubmission`
//! and `normalize()` relabels the sides exactly once, at the boundary.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EntityId, MatchId, PlayerId};

/// Errors produced while normalizing a submitted result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("a match needs two distinct players")]
    SamePlayer,

    #[error("set counts are equal; a match has no draws")]
    DrawnScore,
}

/// A recorded match between two club members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier, a hash of (club-local day, unordered player pair)
    pub id: MatchId,

    /// When the match was played
    pub match_date: DateTime<Utc>,

    /// The player who took more sets
    pub winner_id: PlayerId,

    /// The player who took fewer sets
    pub loser_id: PlayerId,

    /// Sets captured by the winner
    pub winner_sets: u32,

    /// Sets captured by the loser
    pub loser_sets: u32,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Build a record from an already-normalized result.
    ///
    /// The id hashes the club-local calendar day and the unordered player
    /// pair, so two results for the same pair on the same day collide.
    pub fn new(normalized: NormalizedResult, match_date: DateTime<Utc>, tz: Tz) -> Self {
        let id = match_key(match_date, normalized.winner_id, normalized.loser_id, tz);
        Self {
            id,
            match_date,
            winner_id: normalized.winner_id,
            loser_id: normalized.loser_id,
            winner_sets: normalized.winner_sets,
            loser_sets: normalized.loser_sets,
            created_at: Utc::now(),
        }
    }

    /// The calendar day this match belongs to, in the club's timezone.
    pub fn local_day(&self, tz: Tz) -> NaiveDate {
        local_day(self.match_date, tz)
    }

    /// Whether the given player took part in this match.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.winner_id == player || self.loser_id == player
    }

    /// Whether the given player won this match.
    pub fn won_by(&self, player: PlayerId) -> bool {
        self.winner_id == player
    }

    /// Sets this player personally captured (either side).
    pub fn sets_for(&self, player: PlayerId) -> u32 {
        if self.winner_id == player {
            self.winner_sets
        } else {
            self.loser_sets
        }
    }

    /// Sets captured by this player's opponent.
    pub fn sets_against(&self, player: PlayerId) -> u32 {
        if self.winner_id == player {
            self.loser_sets
        } else {
            self.winner_sets
        }
    }
}

/// An order-agnostic result as entered by an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSubmission {
    pub match_date: DateTime<Utc>,
    pub player_a: PlayerId,
    pub sets_a: u32,
    pub player_b: PlayerId,
    pub sets_b: u32,
}

/// A submission with winner and loser resolved by score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedResult {
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub winner_sets: u32,
    pub loser_sets: u32,
}

impl MatchSubmission {
    /// Resolve which side won. The higher-scoring side is the winner no
    /// matter which order the players were entered in; equal scores are
    /// rejected rather than stored.
    pub fn normalize(&self) -> Result<NormalizedResult, SubmissionError> {
        if self.player_a == self.player_b {
            return Err(SubmissionError::SamePlayer);
        }
        match self.sets_a.cmp(&self.sets_b) {
            std::cmp::Ordering::Greater => Ok(NormalizedResult {
                winner_id: self.player_a,
                loser_id: self.player_b,
                winner_sets: self.sets_a,
                loser_sets: self.sets_b,
            }),
            std::cmp::Ordering::Less => Ok(NormalizedResult {
                winner_id: self.player_b,
                loser_id: self.player_a,
                winner_sets: self.sets_b,
                loser_sets: self.sets_a,
            }),
            std::cmp::Ordering::Equal => Err(SubmissionError::DrawnScore),
        }
    }
}

/// The calendar day of a timestamp in the club's timezone.
pub fn local_day(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// The deterministic id for a match: club-local day plus the unordered
/// player pair.
pub fn match_key(match_date: DateTime<Utc>, a: PlayerId, b: PlayerId, tz: Tz) -> MatchId {
    let day = local_day(match_date, tz).to_string();
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    EntityId::generate(&[&day, &lo.to_string(), &hi.to_string()])
}
