use std::sync::Arc;

use tokio::sync::RwLock;

use crate::commentary::CommentaryBackend;
use crate::config::ClubConfig;
use crate::storage::ClubStore;

/// Shared application state.
///
/// The store sits behind an RwLock so that writes are serialized: the
/// same-day duplicate check and the insert happen under one write guard,
/// which keeps near-simultaneous submissions from both succeeding.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<ClubStore>>,
    pub club: Arc<ClubConfig>,
    pub commentary: Arc<dyn CommentaryBackend>,
}

impl AppState {
    pub fn new(store: ClubStore, club: ClubConfig, commentary: Arc<dyn CommentaryBackend>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            club: Arc::new(club),
            commentary,
        }
    }
}
