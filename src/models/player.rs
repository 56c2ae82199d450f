//! Roster entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Valid range for a player's division level.
pub const LEVEL_MIN: u8 = 1;
pub const LEVEL_MAX: u8 = 9;

/// A registered club member.
///
/// `level` is the club's ladder division (1 to 9, lower is stronger). It is
/// used purely for display banding and never enters ranking computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Division level, 1-9
    pub level: u8,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new Player with a fresh random id.
    pub fn new(name: String, level: u8) -> Self {
        Self {
            id: PlayerId::random(),
            name,
            level,
            created_at: Utc::now(),
        }
    }
}

/// Check that a division level is within the club's 1-9 ladder.
pub fn level_in_range(level: u8) -> bool {
    (LEVEL_MIN..=LEVEL_MAX).contains(&level)
}
