#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Zone and pacing systems for the Moshpit stage.
//!
//! The maze is split into zones of collectible tiles. Completing a zone pays a
//! bonus that decays with every repeat completion, after which the zone
//! refills on a timer. Completions drive how many moshers chase the player,
//! how fast everybody moves, and how loud the reactive soundtrack gets.

mod music;
mod pacing;
mod zone;

pub use music::{
    compute_active_layers, compute_music_intensity, MilestoneTracker, MusicConfig,
    MILESTONE_PERCENTS,
};
pub use pacing::{
    active_mosher_count, guard_release_delay_ms, guard_step_ms, player_step_ms, PacingConfig,
};
pub use zone::{
    compute_zone_completion_bonus, ZoneConfig, ZoneSnapshot, ZoneStatus, ZoneTracker,
    ZONE_BONUS_DECAY, ZONE_BONUS_FLOOR,
};
