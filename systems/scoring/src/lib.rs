#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring primitives that turn raw stage results into run totals.
//!
//! Nothing in this crate holds state. Inputs that are negative or not finite
//! are clamped to zero so callers never observe a negative score.

use serde::{Deserialize, Serialize};
use triathlon_core::STAGE_COUNT;

mod amp;
mod gates;
mod snake;

pub use amp::{
    amp_wave_multiplier, compute_boss_entry_bonus, compute_boss_phase_break_bonus,
    compute_enemy_defeat_score, compute_wave_clear_bonus, EnemyType, BOSS_DEFEAT_BONUS,
};
pub use gates::{
    compute_stage_options, is_commit_unlock_eligible, StageOptions, StageOptionsInput, StageRule,
    COMMIT_UNLOCK_MS,
};
pub use snake::{compute_snake_food_score, compute_snake_sustain_bonus, snake_combo_multiplier};

/// Points credited for every whole second left on the run clock.
pub const TIME_BONUS_PER_SECOND: u64 = 2;
/// Flat bonus for finishing everything with time to spare.
pub const HIGH_SKILL_BONUS: u64 = 1_000;
/// Run time that must remain, strictly exceeded, for the high-skill bonus.
pub const HIGH_SKILL_MIN_MS_LEFT: f64 = 120_000.0;

/// Rounds a raw stage score and floors it at zero.
#[must_use]
pub fn compute_stage_score(raw: f64) -> u64 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().max(0.0) as u64
}

/// Converts the remaining run time into bonus points.
#[must_use]
pub fn compute_time_left_bonus(run_ms_left: f64) -> u64 {
    if !run_ms_left.is_finite() || run_ms_left <= 0.0 {
        return 0;
    }
    (run_ms_left / 1_000.0).floor() as u64 * TIME_BONUS_PER_SECOND
}

/// Awards [`HIGH_SKILL_BONUS`] when the whole run was cleared quickly.
#[must_use]
pub fn compute_high_skill_bonus(
    completed_all_stages: bool,
    boss_defeated: bool,
    run_ms_left: f64,
) -> u64 {
    if completed_all_stages && boss_defeated && run_ms_left > HIGH_SKILL_MIN_MS_LEFT {
        HIGH_SKILL_BONUS
    } else {
        0
    }
}

/// Everything needed to compute the end-of-run score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalScoreInput {
    /// Scores banked for each stage.
    pub stage_scores: [f64; STAGE_COUNT],
    /// Run clock remaining when the run finished, in milliseconds.
    pub run_ms_left: f64,
    /// Whether the final stage was banked.
    pub completed_all_stages: bool,
    /// Whether the Amp Invaders boss was defeated.
    pub boss_defeated: bool,
}

/// Breakdown shown on the results screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    /// Per-stage scores after rounding and flooring.
    pub stage_scores: [u64; STAGE_COUNT],
    /// Sum of the per-stage scores.
    pub stage_total: u64,
    /// Bonus from remaining run time.
    pub time_bonus: u64,
    /// Flat high-skill bonus, zero when not earned.
    pub high_skill_bonus: u64,
    /// Grand total.
    pub total: u64,
}

/// Sums stage scores and bonuses into the final breakdown.
#[must_use]
pub fn compute_final_score(input: &FinalScoreInput) -> FinalScore {
    let stage_scores = input.stage_scores.map(compute_stage_score);
    let stage_total = stage_scores.iter().sum::<u64>();
    let time_bonus = compute_time_left_bonus(input.run_ms_left);
    let high_skill_bonus = compute_high_skill_bonus(
        input.completed_all_stages,
        input.boss_defeated,
        input.run_ms_left,
    );

    FinalScore {
        stage_scores,
        stage_total,
        time_bonus,
        high_skill_bonus,
        total: stage_total + time_bonus + high_skill_bonus,
    }
}
