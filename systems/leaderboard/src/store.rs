use serde_json::json;
use tracing::{debug, warn};

use crate::backend::{LeaderboardBackend, LeaderboardRecord};
use crate::error::LeaderboardError;
use crate::format::{is_valid_initials, sanitize_initials};
use crate::LeaderboardEntry;

/// Entries kept in the local cache.
pub const LOCAL_CACHE_LIMIT: usize = 20;

/// Local leaderboard cache in front of a remote backend.
#[derive(Debug)]
pub struct LeaderboardStore<B> {
    backend: B,
    entries: Vec<LeaderboardEntry>,
    hydrated: bool,
}

impl<B: LeaderboardBackend> LeaderboardStore<B> {
    /// Creates an empty, unhydrated cache.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            entries: Vec::new(),
            hydrated: false,
        }
    }

    /// Cached entries, best first.
    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Whether the cache was filled from the backend at least once.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Backend behind the cache.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Replaces the cache with the backend's top rows. A failed fetch leaves
    /// the cache untouched.
    pub fn hydrate(&mut self) -> Result<(), LeaderboardError> {
        let limit = i64::try_from(LOCAL_CACHE_LIMIT).unwrap_or(i64::MAX);
        match self.backend.fetch(Some(limit)) {
            Ok(records) => {
                self.entries = records.iter().map(entry_from_record).collect();
                self.rank();
                self.hydrated = true;
                debug!(entries = self.entries.len(), "leaderboard hydrated");
                Ok(())
            }
            Err(error) => {
                warn!(%error, status = error.status_code(), "leaderboard fetch failed");
                Err(error)
            }
        }
    }

    /// Caches `entry` locally, then submits it to the backend.
    ///
    /// Initials that do not sanitize to three letters are rejected before
    /// anything is cached. Otherwise the local cache keeps the entry even when
    /// the remote write fails, so an offline run still shows up on this device.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Result<LeaderboardRecord, LeaderboardError> {
        let entry = LeaderboardEntry {
            player: sanitize_initials(&entry.player),
            ..entry
        };
        if !is_valid_initials(&entry.player) {
            debug!(player = %entry.player, "initials rejected before caching");
            return Err(LeaderboardError::Validation(
                "initials must be exactly three letters".to_owned(),
            ));
        }
        let body = json!({
            "initials": entry.player,
            "total": entry.total,
            "stage1": entry.splits[0],
            "stage2": entry.splits[1],
            "stage3": entry.splits[2],
        });

        self.entries.push(entry);
        self.rank();

        self.backend.submit(&body).map_err(|error| {
            warn!(%error, status = error.status_code(), "leaderboard submit failed");
            error
        })
    }

    fn rank(&mut self) {
        self.entries.sort_by(|a, b| b.total.cmp(&a.total));
        self.entries.truncate(LOCAL_CACHE_LIMIT);
    }
}

fn entry_from_record(record: &LeaderboardRecord) -> LeaderboardEntry {
    LeaderboardEntry {
        player: record.initials.clone(),
        total: record.total,
        splits: [record.stage1, record.stage2, record.stage3],
    }
}
