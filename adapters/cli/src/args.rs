use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use triathlon_core::{RunConfig, SnakeAudioMode};

/// Command-line flags.
#[derive(Debug, Parser)]
#[command(name = "triathlon", about = "Plays a seeded Arcade Triathlon run headlessly")]
pub(crate) struct Cli {
    /// Run clock length in minutes, clamped to 1-60.
    #[arg(long)]
    pub(crate) run_minutes: Option<f64>,

    /// Rhythm Serpent music director.
    #[arg(long, value_enum)]
    pub(crate) snake_audio_mode: Option<AudioModeArg>,

    /// Host page query string, e.g. `?runMinutes=5&snakeAudioMode=legacy`.
    #[arg(long)]
    pub(crate) query: Option<String>,

    /// TOML file overriding director tuning.
    #[arg(long)]
    pub(crate) tuning: Option<PathBuf>,

    /// Seed for the synthetic player.
    #[arg(long, default_value_t = 7)]
    pub(crate) seed: u64,

    /// Initials submitted to the leaderboard.
    #[arg(long, default_value = "CPU")]
    pub(crate) initials: String,
}

/// Flag spelling of [`SnakeAudioMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum AudioModeArg {
    /// Energy maps straight to a phase.
    Legacy,
    /// Hysteretic director with the drop cycle.
    V2,
}

impl From<AudioModeArg> for SnakeAudioMode {
    fn from(mode: AudioModeArg) -> Self {
        match mode {
            AudioModeArg::Legacy => SnakeAudioMode::Legacy,
            AudioModeArg::V2 => SnakeAudioMode::V2,
        }
    }
}

impl Cli {
    /// Resolves the run config: query string first, explicit flags on top.
    pub(crate) fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.query {
            Some(query) => RunConfig::from_query(query)
                .with_context(|| format!("invalid query string `{query}`"))?,
            None => RunConfig::default(),
        };
        if let Some(minutes) = self.run_minutes {
            config.run_minutes = minutes;
        }
        if let Some(mode) = self.snake_audio_mode {
            config.snake_audio_mode = mode.into();
        }
        Ok(config.clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_query_string() {
        let cli = Cli::parse_from([
            "triathlon",
            "--query",
            "?runMinutes=5&snakeAudioMode=legacy",
            "--snake-audio-mode",
            "v2",
        ]);
        let config = cli.run_config().expect("config");
        assert_eq!(config.run_minutes, 5.0);
        assert_eq!(config.snake_audio_mode, SnakeAudioMode::V2);
    }

    #[test]
    fn run_minutes_flag_is_clamped() {
        let cli = Cli::parse_from(["triathlon", "--run-minutes", "0.25"]);
        assert_eq!(cli.run_config().expect("config").run_minutes, 1.0);
    }

    #[test]
    fn malformed_query_is_reported() {
        let cli = Cli::parse_from(["triathlon", "--query", "runMinutes=soon"]);
        let error = cli.run_config().expect_err("must fail");
        assert!(error.to_string().contains("runMinutes=soon"));
    }
}
