use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_RUN_MINUTES: f64 = 10.0;
const MIN_RUN_MINUTES: f64 = 1.0;
const MAX_RUN_MINUTES: f64 = 60.0;

/// Selects which Rhythm Serpent music director drives the stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakeAudioMode {
    /// Stateless energy-to-phase mapping without the drop cycle.
    Legacy,
    /// Hysteretic director with the one-shot drop.
    #[default]
    V2,
}

impl SnakeAudioMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "v2" => Some(Self::V2),
            _ => None,
        }
    }
}

/// Errors raised while reading run configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `runMinutes` was not a finite positive number.
    #[error("runMinutes must be a positive number, got '{0}'")]
    InvalidRunMinutes(String),
    /// `snakeAudioMode` named an unknown director.
    #[error("snakeAudioMode must be 'legacy' or 'v2', got '{0}'")]
    InvalidSnakeAudioMode(String),
}

/// Run-level settings supplied by the host page or the command line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunConfig {
    /// Total run length in minutes.
    pub run_minutes: f64,
    /// Music director used by Rhythm Serpent.
    pub snake_audio_mode: SnakeAudioMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_minutes: DEFAULT_RUN_MINUTES,
            snake_audio_mode: SnakeAudioMode::default(),
        }
    }
}

impl RunConfig {
    /// Parses `runMinutes` and `snakeAudioMode` from a URL query string.
    ///
    /// A leading `?` is accepted and unknown keys are ignored. Run length is
    /// clamped to the supported range.
    pub fn from_query(query: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let query = query.trim().trim_start_matches('?');

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "runMinutes" => {
                    let minutes = value
                        .parse::<f64>()
                        .ok()
                        .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
                        .ok_or_else(|| ConfigError::InvalidRunMinutes(value.to_owned()))?;
                    config.run_minutes = minutes;
                }
                "snakeAudioMode" => {
                    config.snake_audio_mode = SnakeAudioMode::parse(value)
                        .ok_or_else(|| ConfigError::InvalidSnakeAudioMode(value.to_owned()))?;
                }
                _ => {}
            }
        }

        Ok(config.clamped())
    }

    /// Returns a copy with the run length forced into the supported range.
    #[must_use]
    pub fn clamped(self) -> Self {
        let run_minutes = if self.run_minutes.is_finite() {
            self.run_minutes.clamp(MIN_RUN_MINUTES, MAX_RUN_MINUTES)
        } else {
            DEFAULT_RUN_MINUTES
        };
        Self {
            run_minutes,
            ..self
        }
    }

    /// Total run length.
    #[must_use]
    pub fn run_duration(&self) -> Duration {
        Duration::from_secs_f64(self.clamped().run_minutes * 60.0)
    }
}
