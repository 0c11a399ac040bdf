use serde::{Deserialize, Serialize};

/// Speed and release tuning for the chase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Player step interval on level 1 with no completions.
    pub player_base_step_ms: f64,
    /// Player step reduction per level after the first.
    pub player_step_per_level_ms: f64,
    /// Player step reduction per zone completion.
    pub player_step_per_completion_ms: f64,
    /// Fastest player step interval.
    pub player_min_step_ms: f64,
    /// Guard step interval on level 1 with no completions.
    pub guard_base_step_ms: f64,
    /// Guard step reduction per level after the first.
    pub guard_step_per_level_ms: f64,
    /// Guard step reduction per zone completion.
    pub guard_step_per_completion_ms: f64,
    /// Fastest guard step interval.
    pub guard_min_step_ms: f64,
    /// Slowdown added to guard steps while frightened.
    pub fright_penalty_ms: f64,
    /// Cap on simultaneously active moshers.
    pub max_active_moshers: u32,
    /// Delay between guard releases on level 1 with no completions.
    pub release_base_delay_ms: f64,
    /// Release delay reduction per level after the first.
    pub release_per_level_ms: f64,
    /// Release delay reduction per zone completion.
    pub release_per_completion_ms: f64,
    /// Shortest delay between guard releases.
    pub release_min_delay_ms: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            player_base_step_ms: 140.0,
            player_step_per_level_ms: 6.0,
            player_step_per_completion_ms: 3.0,
            player_min_step_ms: 92.0,
            guard_base_step_ms: 170.0,
            guard_step_per_level_ms: 8.0,
            guard_step_per_completion_ms: 4.0,
            guard_min_step_ms: 104.0,
            fright_penalty_ms: 90.0,
            max_active_moshers: 3,
            release_base_delay_ms: 5_000.0,
            release_per_level_ms: 400.0,
            release_per_completion_ms: 350.0,
            release_min_delay_ms: 1_200.0,
        }
    }
}

fn ramp(base: f64, per_level: f64, per_completion: f64, min: f64, level: u32, completions: u32) -> f64 {
    let levels = f64::from(level.max(1) - 1);
    (base - per_level * levels - per_completion * f64::from(completions)).max(min)
}

/// Moshers chasing the player: one, two from the second completion, three
/// from the fourth, never more than the configured cap.
#[must_use]
pub fn active_mosher_count(total_completions: u32, config: &PacingConfig) -> u32 {
    let count = match total_completions {
        0..=1 => 1,
        2..=3 => 2,
        _ => 3,
    };
    count.min(config.max_active_moshers)
}

/// Time between player steps.
#[must_use]
pub fn player_step_ms(level: u32, completions: u32, config: &PacingConfig) -> f64 {
    ramp(
        config.player_base_step_ms,
        config.player_step_per_level_ms,
        config.player_step_per_completion_ms,
        config.player_min_step_ms,
        level,
        completions,
    )
}

/// Time between guard steps. Frightened guards are slowed after the floor
/// is applied.
#[must_use]
pub fn guard_step_ms(level: u32, completions: u32, frightened: bool, config: &PacingConfig) -> f64 {
    let step = ramp(
        config.guard_base_step_ms,
        config.guard_step_per_level_ms,
        config.guard_step_per_completion_ms,
        config.guard_min_step_ms,
        level,
        completions,
    );
    if frightened {
        step + config.fright_penalty_ms
    } else {
        step
    }
}

/// Stage time at which guard `guard_index` leaves the pen. The first guard
/// starts loose.
#[must_use]
pub fn guard_release_delay_ms(guard_index: u32, level: u32, completions: u32, config: &PacingConfig) -> f64 {
    let spacing = ramp(
        config.release_base_delay_ms,
        config.release_per_level_ms,
        config.release_per_completion_ms,
        config.release_min_delay_ms,
        level,
        completions,
    );
    spacing * f64::from(guard_index)
}
