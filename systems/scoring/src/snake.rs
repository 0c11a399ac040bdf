//! Rhythm Serpent tuning curves.

const FOOD_BASE: f64 = 22.0;
const FOOD_PER_COMBO: f64 = 1.6;
const LENGTH_STEP: f64 = 0.05;
const LENGTH_CAP: f64 = 0.84;

const SUSTAIN_BASE: f64 = 21.0;
const SUSTAIN_PER_SEGMENT: f64 = 1.65;
const SUSTAIN_PER_COMBO: f64 = 1.35;
const SUSTAIN_MIN: f64 = 16.0;
const SUSTAIN_MAX: f64 = 84.0;

/// Multiplier applied to food points for the current combo tier.
#[must_use]
pub fn snake_combo_multiplier(combo: u32) -> f64 {
    match combo {
        8.. => 2.2,
        5..=7 => 1.8,
        3..=4 => 1.35,
        _ => 1.0,
    }
}

/// Points for eating one food item.
///
/// `extra_segments` counts body segments beyond the starting length.
#[must_use]
pub fn compute_snake_food_score(combo: u32, extra_segments: u32) -> u32 {
    let base = FOOD_BASE + f64::from(combo) * FOOD_PER_COMBO;
    let length = 1.0 + LENGTH_CAP.min(f64::from(extra_segments) * LENGTH_STEP);
    let score = (base * snake_combo_multiplier(combo) * length).round();
    score.max(1.0) as u32
}

/// Periodic bonus for keeping a long snake alive.
#[must_use]
pub fn compute_snake_sustain_bonus(combo: u32, extra_segments: u32) -> u32 {
    let raw = SUSTAIN_BASE
        + f64::from(extra_segments) * SUSTAIN_PER_SEGMENT
        + f64::from(combo) * SUSTAIN_PER_COMBO;
    raw.clamp(SUSTAIN_MIN, SUSTAIN_MAX).round() as u32
}
