//! Route handlers.

pub mod analysis;
pub mod attendance;
pub mod head_to_head;
pub mod matches;
pub mod players;
pub mod pool;
pub mod standings;

use serde::Serialize;

use crate::models::{Player, PlayerId};

use super::ApiError;

/// Compact player reference embedded in responses.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    pub level: u8,
}

impl PlayerRef {
    pub fn of(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            level: player.level,
        }
    }

    /// Resolve a reference from the roster. A dangling id (possible only if
    /// a record escaped cascade deletion) degrades to a placeholder instead
    /// of failing the whole view.
    pub fn lookup(players: &[Player], id: PlayerId) -> Self {
        players
            .iter()
            .find(|p| p.id == id)
            .map(Self::of)
            .unwrap_or(Self {
                id,
                name: "(removed)".to_string(),
                level: 0,
            })
    }
}

/// Parse a player id from a path or body string.
pub fn parse_player_id(raw: &str) -> Result<PlayerId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid player id: {}", raw)))
}
