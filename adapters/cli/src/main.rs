#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless driver that plays a seeded Arcade Triathlon run end to end.

mod args;
mod simulation;
mod tuning;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use triathlon_system_leaderboard::{
    format_entry_line, InMemoryBackend, LeaderboardEntry, LeaderboardStore,
};

use crate::args::Cli;
use crate::simulation::Simulation;
use crate::tuning::Tuning;

/// Entry point for the Arcade Triathlon command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("triathlon=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.run_config()?;
    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    info!(
        run_minutes = config.run_minutes,
        mode = ?config.snake_audio_mode,
        seed = cli.seed,
        "starting run"
    );

    let mut simulation = Simulation::new(config, tuning, cli.seed);
    let report = simulation.run();
    println!("{}", report.banner);
    for line in report.stage_lines() {
        println!("{line}");
    }
    println!("{}", report.score_line());
    info!(
        completed = report.completed,
        boss_defeated = report.boss_defeated,
        events = report.events,
        "run summary"
    );

    let mut board = LeaderboardStore::new(InMemoryBackend::new());
    let _ = board
        .submit(LeaderboardEntry::from_final_score(&cli.initials, &report.final_score))
        .context("failed to submit the run to the leaderboard")?;
    for (index, entry) in board.entries().iter().enumerate() {
        println!("{}", format_entry_line(index + 1, entry));
    }

    Ok(())
}
