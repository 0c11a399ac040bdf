use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::LeaderboardError;
use crate::format::{is_valid_initials, letters_upper};

/// Rows returned when the request names no limit.
pub const DEFAULT_FETCH_LIMIT: u32 = 200;
/// Largest limit honoured by the service.
pub const MAX_FETCH_LIMIT: u32 = 500;

/// Validated submission body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Normalized initials.
    pub initials: String,
    /// Final score.
    pub total: u64,
    /// Rhythm Serpent score.
    pub stage1: u64,
    /// Moshpit score.
    pub stage2: u64,
    /// Amp Invaders score.
    pub stage3: u64,
}

/// Stored leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    /// Normalized initials.
    pub initials: String,
    /// Final score.
    pub total: u64,
    /// Rhythm Serpent score.
    pub stage1: u64,
    /// Moshpit score.
    pub stage2: u64,
    /// Amp Invaders score.
    pub stage3: u64,
    /// Insertion order; earlier rows win ties.
    pub created_at: u64,
}

/// Remote leaderboard operations.
pub trait LeaderboardBackend {
    /// Ranked rows, best first. `None` requests the default limit.
    fn fetch(&self, limit: Option<i64>) -> Result<Vec<LeaderboardRecord>, LeaderboardError>;

    /// Validates and stores a submission body, returning the inserted row.
    fn submit(&mut self, body: &Value) -> Result<LeaderboardRecord, LeaderboardError>;
}

fn non_negative_integer(body: &Value, field: &str) -> Result<u64, LeaderboardError> {
    let value = body.get(field).ok_or_else(|| {
        LeaderboardError::Validation(format!("{field} is required"))
    })?;
    if let Some(number) = value.as_u64() {
        return Ok(number);
    }
    match value.as_f64() {
        Some(number) if number.is_finite() && number >= 0.0 && number.fract() == 0.0 && number <= u64::MAX as f64 => {
            Ok(number as u64)
        }
        _ => Err(LeaderboardError::Validation(format!(
            "{field} must be a non-negative integer"
        ))),
    }
}

/// Checks a submission body.
///
/// `initials` is uppercased and stripped of non-letters before it must match
/// exactly three letters; the four score fields must be non-negative integers.
pub fn validate_submission(body: &Value) -> Result<Submission, LeaderboardError> {
    if !body.is_object() {
        return Err(LeaderboardError::Validation("body must be an object".to_owned()));
    }

    let raw_initials = body
        .get("initials")
        .and_then(Value::as_str)
        .ok_or_else(|| LeaderboardError::Validation("initials is required".to_owned()))?;
    let initials = letters_upper(raw_initials);
    if !is_valid_initials(&initials) {
        return Err(LeaderboardError::Validation(
            "initials must be three letters".to_owned(),
        ));
    }

    Ok(Submission {
        initials,
        total: non_negative_integer(body, "total")?,
        stage1: non_negative_integer(body, "stage1")?,
        stage2: non_negative_integer(body, "stage2")?,
        stage3: non_negative_integer(body, "stage3")?,
    })
}

/// Clamps a requested row count to `[1, MAX_FETCH_LIMIT]`.
fn clamp_limit(limit: Option<i64>) -> usize {
    let limit = limit.unwrap_or(i64::from(DEFAULT_FETCH_LIMIT));
    let clamped = limit.clamp(1, i64::from(MAX_FETCH_LIMIT));
    usize::try_from(clamped).unwrap_or(1)
}

/// In-process leaderboard with the same ranking and failure modes as the
/// hosted service.
#[derive(Clone, Debug)]
pub struct InMemoryBackend {
    records: Vec<LeaderboardRecord>,
    next_created_at: u64,
    available: bool,
    writes_fail: bool,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_created_at: 1,
            available: true,
            writes_fail: false,
        }
    }
}

impl InMemoryBackend {
    /// Creates an empty, reachable backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the storage going away or coming back.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Makes every subsequent write fail.
    pub fn set_writes_fail(&mut self, writes_fail: bool) {
        self.writes_fail = writes_fail;
    }

    /// Stored rows in insertion order.
    #[must_use]
    pub fn records(&self) -> &[LeaderboardRecord] {
        &self.records
    }
}

impl LeaderboardBackend for InMemoryBackend {
    fn fetch(&self, limit: Option<i64>) -> Result<Vec<LeaderboardRecord>, LeaderboardError> {
        if !self.available {
            return Err(LeaderboardError::Unavailable);
        }

        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        ranked.truncate(clamp_limit(limit));
        Ok(ranked)
    }

    fn submit(&mut self, body: &Value) -> Result<LeaderboardRecord, LeaderboardError> {
        if !self.available {
            return Err(LeaderboardError::Unavailable);
        }
        let submission = validate_submission(body)?;
        if self.writes_fail {
            return Err(LeaderboardError::Storage("insert rejected".to_owned()));
        }

        let record = LeaderboardRecord {
            initials: submission.initials,
            total: submission.total,
            stage1: submission.stage1,
            stage2: submission.stage2,
            stage3: submission.stage3,
            created_at: self.next_created_at,
        };
        self.next_created_at += 1;
        debug!(initials = %record.initials, total = record.total, "leaderboard row stored");
        self.records.push(record.clone());
        Ok(record)
    }
}
