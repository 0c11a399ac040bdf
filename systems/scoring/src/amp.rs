//! Amp Invaders tuning curves.

use serde::{Deserialize, Serialize};
use triathlon_core::BossPhase;

/// Flat bonus for defeating the boss.
pub const BOSS_DEFEAT_BONUS: u32 = 700;

/// Enemy archetypes in an Amp Invaders formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    /// Front-row grunt.
    Basic,
    /// Takes extra hits.
    Armored,
    /// Back-row elite.
    Elite,
}

impl EnemyType {
    const fn base_score(self) -> f64 {
        match self {
            Self::Basic => 8.0,
            Self::Armored => 19.0,
            Self::Elite => 42.0,
        }
    }
}

/// Score multiplier for the given wave.
#[must_use]
pub fn amp_wave_multiplier(wave: u32) -> f64 {
    match wave {
        0 | 1 => 1.0,
        2 => 1.1,
        3 => 1.23,
        _ => 1.38,
    }
}

/// Points for destroying one enemy.
#[must_use]
pub fn compute_enemy_defeat_score(enemy: EnemyType, wave: u32) -> u32 {
    (enemy.base_score() * amp_wave_multiplier(wave)).round() as u32
}

/// Bonus for clearing a wave.
#[must_use]
pub fn compute_wave_clear_bonus(wave: u32) -> u32 {
    68 + wave.saturating_mul(14)
}

/// Bonus for reaching the boss.
#[must_use]
pub fn compute_boss_entry_bonus(wave: u32) -> u32 {
    198 + wave.saturating_mul(24)
}

/// Bonus for pushing the boss into a new phase.
#[must_use]
pub fn compute_boss_phase_break_bonus(phase: BossPhase) -> u32 {
    match phase {
        BossPhase::One => 0,
        BossPhase::Two => 150,
        BossPhase::Three => 225,
    }
}
