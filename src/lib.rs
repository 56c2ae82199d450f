//! # Topspin
//!
//! A table-tennis club tracker: match log, rankings, streaks, head-to-head
//! and attendance for a small league run by trusted admins.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, derived stats)
//! - **storage**: JSONL store and the typed club repository
//! - **calculate**: Pure statistics, ranking and scheduling engine
//! - **api**: REST API endpoints
//! - **commentary**: AI match-day commentary backends
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod commentary;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
