//! Typed repository over the JSONL store.
//!
//! `ClubStore` is the only component that touches the files. Validation
//! happens here, before anything is persisted: handlers and the CLI get a
//! clean `StoreError` taxonomy (validation vs. not-found vs. storage) and
//! never relabel winners or check duplicates themselves.

use chrono::NaiveDate;
use chrono_tz::Tz;
use thiserror::Error;
use tracing::info;

use crate::models::{
    level_in_range, MatchId, MatchRecord, MatchSubmission, Player, PlayerId, SubmissionError,
};

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or semantically invalid input, rejected before persistence.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced player or match does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The underlying file store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SubmissionError> for StoreError {
    fn from(e: SubmissionError) -> Self {
        StoreError::Validation(e.to_string())
    }
}

/// Filter for match listings. Date bounds are inclusive club-local days.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub player: Option<PlayerId>,
}

impl MatchFilter {
    /// No restriction: the full match log.
    pub fn all() -> Self {
        Self::default()
    }

    /// Every match played on one club-local day.
    pub fn on_day(day: NaiveDate) -> Self {
        Self {
            from: Some(day),
            to: Some(day),
            player: None,
        }
    }

    fn accepts(&self, record: &MatchRecord, tz: Tz) -> bool {
        let day = record.local_day(tz);
        if let Some(from) = self.from {
            if day < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if day > to {
                return false;
            }
        }
        if let Some(player) = self.player {
            if !record.involves(player) {
                return false;
            }
        }
        true
    }
}

/// The club's record repository: roster plus match log.
#[derive(Debug, Clone)]
pub struct ClubStore {
    storage: StorageConfig,
    tz: Tz,
}

impl ClubStore {
    pub fn new(storage: StorageConfig, tz: Tz) -> Self {
        Self { storage, tz }
    }

    /// The club's local timezone, used for calendar-day bucketing.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    fn read_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(JsonlReader::new(self.storage.players_path()).read_all()?)
    }

    fn write_players(&self, players: &[Player]) -> Result<(), StoreError> {
        JsonlWriter::new(self.storage.players_path()).write_all(players)?;
        Ok(())
    }

    fn read_matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(JsonlReader::new(self.storage.matches_path()).read_all()?)
    }

    fn write_matches(&self, matches: &[MatchRecord]) -> Result<(), StoreError> {
        JsonlWriter::new(self.storage.matches_path()).write_all(matches)?;
        Ok(())
    }

    // ── Roster ──────────────────────────────────────────────────

    /// List the roster, division level ascending then name.
    pub fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut players = self.read_players()?;
        players.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        Ok(players)
    }

    pub fn get_player(&self, id: PlayerId) -> Result<Player, StoreError> {
        self.read_players()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("player {}", id)))
    }

    pub fn add_player(&mut self, name: &str, level: u8) -> Result<Player, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("player name is required".into()));
        }
        if !level_in_range(level) {
            return Err(StoreError::Validation(format!(
                "level must be between 1 and 9, got {}",
                level
            )));
        }

        let player = Player::new(name.to_string(), level);
        JsonlWriter::new(self.storage.players_path()).append(&player)?;
        info!("Registered player {} (level {})", player.name, player.level);
        Ok(player)
    }

    pub fn update_player(
        &mut self,
        id: PlayerId,
        name: &str,
        level: u8,
    ) -> Result<Player, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("player name is required".into()));
        }
        if !level_in_range(level) {
            return Err(StoreError::Validation(format!(
                "level must be between 1 and 9, got {}",
                level
            )));
        }

        let mut players = self.read_players()?;
        let player = players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("player {}", id)))?;
        player.name = name.to_string();
        player.level = level;
        let updated = player.clone();
        self.write_players(&players)?;
        Ok(updated)
    }

    /// Remove a player and every match they appear in (hard delete).
    /// Returns the number of matches removed by the cascade.
    pub fn delete_player(&mut self, id: PlayerId) -> Result<usize, StoreError> {
        let mut players = self.read_players()?;
        let before = players.len();
        players.retain(|p| p.id != id);
        if players.len() == before {
            return Err(StoreError::NotFound(format!("player {}", id)));
        }

        let mut matches = self.read_matches()?;
        let match_count = matches.len();
        matches.retain(|m| !m.involves(id));
        let removed = match_count - matches.len();

        self.write_matches(&matches)?;
        self.write_players(&players)?;
        info!("Deleted player {} and {} of their matches", id, removed);
        Ok(removed)
    }

    // ── Match log ───────────────────────────────────────────────

    /// List matches, newest first, optionally restricted by day range and
    /// participant.
    pub fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, StoreError> {
        let mut matches: Vec<MatchRecord> = self
            .read_matches()?
            .into_iter()
            .filter(|m| filter.accepts(m, self.tz))
            .collect();
        matches.sort_by(|a, b| {
            b.match_date
                .cmp(&a.match_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(matches)
    }

    pub fn get_match(&self, id: &MatchId) -> Result<MatchRecord, StoreError> {
        self.read_matches()?
            .into_iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("match {}", id)))
    }

    /// Validate, normalize and record a submitted result.
    ///
    /// The same unordered pair can only appear once per club-local day; a
    /// rematch on the same day is rejected regardless of scores. Because the
    /// match id hashes (day, pair), the check is an id collision.
    pub fn insert_match(&mut self, submission: &MatchSubmission) -> Result<MatchRecord, StoreError> {
        let normalized = submission.normalize()?;
        self.get_player(normalized.winner_id)?;
        self.get_player(normalized.loser_id)?;

        let record = MatchRecord::new(normalized, submission.match_date, self.tz);

        let matches = self.read_matches()?;
        if matches.iter().any(|m| m.id == record.id) {
            return Err(StoreError::Validation(format!(
                "a result for this pair is already recorded on {}",
                record.local_day(self.tz)
            )));
        }

        JsonlWriter::new(self.storage.matches_path()).append(&record)?;
        info!(
            "Recorded match {}: {} beat {} {}-{}",
            record.id, record.winner_id, record.loser_id, record.winner_sets, record.loser_sets
        );
        Ok(record)
    }

    /// Replace an existing match with a re-normalized submission.
    /// Moving it onto a day where the pair already has a result is rejected.
    pub fn update_match(
        &mut self,
        id: &MatchId,
        submission: &MatchSubmission,
    ) -> Result<MatchRecord, StoreError> {
        let normalized = submission.normalize()?;
        self.get_player(normalized.winner_id)?;
        self.get_player(normalized.loser_id)?;

        let mut matches = self.read_matches()?;
        let position = matches
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("match {}", id)))?;

        let mut record = MatchRecord::new(normalized, submission.match_date, self.tz);
        record.created_at = matches[position].created_at;

        if matches
            .iter()
            .enumerate()
            .any(|(i, m)| i != position && m.id == record.id)
        {
            return Err(StoreError::Validation(format!(
                "a result for this pair is already recorded on {}",
                record.local_day(self.tz)
            )));
        }

        matches[position] = record.clone();
        self.write_matches(&matches)?;
        Ok(record)
    }

    pub fn delete_match(&mut self, id: &MatchId) -> Result<(), StoreError> {
        let mut matches = self.read_matches()?;
        let before = matches.len();
        matches.retain(|m| &m.id != id);
        if matches.len() == before {
            return Err(StoreError::NotFound(format!("match {}", id)));
        }
        self.write_matches(&matches)?;
        info!("Deleted match {}", id);
        Ok(())
    }

    /// Distinct club-local days with at least one match, newest first.
    pub fn distinct_match_days(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let mut days: Vec<NaiveDate> = self
            .read_matches()?
            .iter()
            .map(|m| m.local_day(self.tz))
            .collect();
        days.sort_unstable();
        days.dedup();
        days.reverse();
        Ok(days)
    }
}
