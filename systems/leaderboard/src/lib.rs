#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Leaderboard cache, submission validation and formatting.
//!
//! The remote leaderboard sits behind [`LeaderboardBackend`].
//! [`InMemoryBackend`] reproduces the service's ranking, limits and failure
//! codes so the rest of the game can be exercised without a network.

use serde::{Deserialize, Serialize};
use triathlon_core::STAGE_COUNT;
use triathlon_system_scoring::FinalScore;

mod backend;
mod error;
mod format;
mod store;

pub use backend::{
    validate_submission, InMemoryBackend, LeaderboardBackend, LeaderboardRecord, Submission,
    DEFAULT_FETCH_LIMIT, MAX_FETCH_LIMIT,
};
pub use error::LeaderboardError;
pub use format::{format_compact, format_entry_line, is_valid_initials, sanitize_initials};
pub use store::{LeaderboardStore, LOCAL_CACHE_LIMIT};

/// One finished run as shown on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Three uppercase letters.
    pub player: String,
    /// Final score.
    pub total: u64,
    /// Banked score of each stage.
    pub splits: [u64; STAGE_COUNT],
}

impl LeaderboardEntry {
    /// Builds an entry from a final score breakdown, sanitizing the initials.
    #[must_use]
    pub fn from_final_score(player: &str, score: &FinalScore) -> Self {
        Self {
            player: sanitize_initials(player),
            total: score.total,
            splits: score.stage_scores,
        }
    }
}
