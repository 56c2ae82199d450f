//! Filesystem storage.
//!
//! The club's data lives in two JSONL files under the data directory:
//! - `players.jsonl` — the roster
//! - `matches.jsonl` — the match log, the single source of truth for every
//!   derived statistic

use std::path::PathBuf;
use thiserror::Error;

mod jsonl;
mod store;

pub use jsonl::{JsonlReader, JsonlWriter};
pub use store::{ClubStore, MatchFilter, StoreError};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join("players.jsonl")
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.players_path(), PathBuf::from("/data/players.jsonl"));
        assert_eq!(config.matches_path(), PathBuf::from("/data/matches.jsonl"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
