/// Distance between the bottom of the playfield and the invasion floor.
pub const INVASION_FLOOR_OFFSET: f32 = 148.0;

/// Lowest y the enemy formation may reach.
///
/// Returns `0.0` for a non-finite height.
#[must_use]
pub fn enemy_invasion_floor_y(height: f32) -> f32 {
    if !height.is_finite() {
        return 0.0;
    }
    (height - INVASION_FLOOR_OFFSET).max(0.0)
}

/// Clamps a formation drop so the lowest enemy never crosses `floor_y`.
///
/// The result lies in `[0, floor_y - current_max_y]`, and is `0.0` whenever
/// any argument is not finite.
#[must_use]
pub fn compute_enemy_drop_delta(current_max_y: f32, intended_drop: f32, floor_y: f32) -> f32 {
    if !current_max_y.is_finite() || !intended_drop.is_finite() || !floor_y.is_finite() {
        return 0.0;
    }
    let headroom = (floor_y - current_max_y).max(0.0);
    intended_drop.clamp(0.0, headroom)
}
