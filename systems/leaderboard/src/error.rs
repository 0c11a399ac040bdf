use thiserror::Error;

/// Failures surfaced by the leaderboard service.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LeaderboardError {
    /// The request body was rejected.
    #[error("invalid submission: {0}")]
    Validation(String),

    /// The backing storage is not reachable.
    #[error("leaderboard storage unavailable")]
    Unavailable,

    /// Reading or writing the storage failed.
    #[error("leaderboard storage failure: {0}")]
    Storage(String),
}

impl LeaderboardError {
    /// HTTP status code the service answers with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unavailable => 503,
            Self::Storage(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_http_status_codes() {
        assert_eq!(LeaderboardError::Validation("initials".into()).status_code(), 400);
        assert_eq!(LeaderboardError::Unavailable.status_code(), 503);
        assert_eq!(LeaderboardError::Storage("disk full".into()).status_code(), 500);
    }

    #[test]
    fn messages_carry_the_reason() {
        let error = LeaderboardError::Validation("total must be a non-negative integer".into());
        assert_eq!(
            error.to_string(),
            "invalid submission: total must be a non-negative integer"
        );
    }
}
