#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave and boss systems for the Amp Invaders stage.
//!
//! Every director here is a plain state machine driven by the caller's frame
//! loop. Inputs are value types, outputs are value types or [`Event`]s pushed
//! into a caller-owned buffer, and identical inputs always produce identical
//! outputs.
//!
//! [`Event`]: triathlon_core::Event

use serde::{Deserialize, Serialize};

mod autofire;
mod boss;
mod bounds;
mod collision;
mod fire;
mod planner;
mod specials;
mod spread;
mod wave;

pub use autofire::{step_auto_fire, AutoFireStep};
pub use boss::{
    phase_for_hp, AttackSelection, BossConfig, BossDirector, BossState, PhaseTiming,
};
pub use bounds::{compute_enemy_drop_delta, enemy_invasion_floor_y, INVASION_FLOOR_OFFSET};
pub use collision::{
    resolve_enemy_bullet, shield_column_for_x, CollisionConfig, CollisionOutcome, Shield,
    SHIELD_COUNT,
};
pub use fire::{EnemyFireDirector, FireDirectorConfig, FireInput, FirePlan, FIRE_CYCLE_PERIOD};
pub use planner::{plan_boss_projectiles, PlanInput, ProjectileKind, ProjectileSpec};
pub use specials::{
    SpecialEntity, SpecialKindConfig, SpecialMotion, SpecialsConfig, SpecialsDirector,
    SpecialsInput,
};
pub use spread::{next_spread_tier, reset_spread_tier, spread_offsets, SpreadConfig, MAX_SPREAD_TIER};
pub use wave::{genre_for_wave, WaveDirectorState, WaveDirectorV2, WaveSpec, WaveTable, GENRE_PATH};

/// Size of the playfield in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldBounds {
    /// Playfield width.
    pub width: f32,
    /// Playfield height.
    pub height: f32,
}

impl Default for PlayfieldBounds {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 720.0,
        }
    }
}

/// Picks an item by index, wrapping in both directions.
///
/// Returns `None` only for an empty slice.
#[must_use]
pub fn pick_by_index<T: Copy>(items: &[T], index: i64) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let len = i64::try_from(items.len()).ok()?;
    let wrapped = usize::try_from(index.rem_euclid(len)).ok()?;
    items.get(wrapped).copied()
}

#[cfg(test)]
mod tests {
    use super::pick_by_index;

    #[test]
    fn pick_by_index_wraps_negative_and_large_indices() {
        let items = [10, 20, 30];
        assert_eq!(pick_by_index(&items, 0), Some(10));
        assert_eq!(pick_by_index(&items, 4), Some(20));
        assert_eq!(pick_by_index(&items, -1), Some(30));
        assert_eq!(pick_by_index::<u8>(&[], 3), None);
    }
}
