use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::PlayfieldBounds;

/// Number of shields guarding the player.
pub const SHIELD_COUNT: usize = 3;

/// One destructible shield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    /// Remaining durability; zero means destroyed.
    pub durability: u32,
}

/// Hitbox tuning for enemy bullets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Distance from the bottom edge to the shield row centre.
    pub shield_offset_from_bottom: f32,
    /// Half width and half height of a shield hitbox.
    pub shield_half_extents: Vec2,
    /// Half width and half height of the player hitbox.
    pub player_half_extents: Vec2,
    /// Durability removed per bullet.
    pub shield_damage: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            shield_offset_from_bottom: 120.0,
            shield_half_extents: Vec2::new(44.0, 16.0),
            player_half_extents: Vec2::new(20.0, 14.0),
            shield_damage: 12,
        }
    }
}

/// What an enemy bullet hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Absorbed by a shield.
    Shield {
        /// Index of the shield that absorbed the bullet.
        index: usize,
        /// Durability left on that shield.
        remaining: u32,
    },
    /// Hit the player.
    Player,
    /// Passed through; the bullet stays alive.
    Miss,
}

/// Column of the shield that covers `x`, using equal-width columns.
#[must_use]
pub fn shield_column_for_x(x: f32, width: f32) -> usize {
    if !x.is_finite() || !width.is_finite() || width <= 0.0 {
        return 0;
    }
    let column = (x / width * SHIELD_COUNT as f32).floor();
    column.clamp(0.0, (SHIELD_COUNT - 1) as f32) as usize
}

fn shield_center(index: usize, bounds: PlayfieldBounds, config: &CollisionConfig) -> Vec2 {
    let column_width = bounds.width / SHIELD_COUNT as f32;
    Vec2::new(
        column_width * (index as f32 + 0.5),
        bounds.height - config.shield_offset_from_bottom,
    )
}

fn inside(point: Vec2, center: Vec2, half_extents: Vec2) -> bool {
    let delta = (point - center).abs();
    delta.x <= half_extents.x && delta.y <= half_extents.y
}

/// Resolves one enemy bullet against the shields and the player.
///
/// Shields are checked first; a destroyed shield lets the bullet through.
pub fn resolve_enemy_bullet(
    bullet: Vec2,
    shields: &mut [Shield; SHIELD_COUNT],
    player: Vec2,
    bounds: PlayfieldBounds,
    config: &CollisionConfig,
) -> CollisionOutcome {
    if !bullet.is_finite() {
        return CollisionOutcome::Miss;
    }

    let index = shield_column_for_x(bullet.x, bounds.width);
    let shield = &mut shields[index];
    if shield.durability > 0
        && inside(bullet, shield_center(index, bounds, config), config.shield_half_extents)
    {
        shield.durability = shield.durability.saturating_sub(config.shield_damage);
        return CollisionOutcome::Shield {
            index,
            remaining: shield.durability,
        };
    }

    if inside(bullet, player, config.player_half_extents) {
        return CollisionOutcome::Player;
    }

    CollisionOutcome::Miss
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intact_shields(durability: u32) -> [Shield; SHIELD_COUNT] {
        [Shield { durability }; SHIELD_COUNT]
    }

    #[test]
    fn columns_split_the_playfield_evenly() {
        assert_eq!(shield_column_for_x(0.0, 480.0), 0);
        assert_eq!(shield_column_for_x(159.9, 480.0), 0);
        assert_eq!(shield_column_for_x(160.0, 480.0), 1);
        assert_eq!(shield_column_for_x(479.0, 480.0), 2);
        assert_eq!(shield_column_for_x(900.0, 480.0), 2);
        assert_eq!(shield_column_for_x(-20.0, 480.0), 0);
    }

    #[test]
    fn shield_absorbs_bullets_until_destroyed() {
        let bounds = PlayfieldBounds::default();
        let config = CollisionConfig::default();
        let mut shields = intact_shields(20);
        let bullet = Vec2::new(240.0, 600.0);
        let player = Vec2::new(240.0, 680.0);

        assert_eq!(
            resolve_enemy_bullet(bullet, &mut shields, player, bounds, &config),
            CollisionOutcome::Shield { index: 1, remaining: 8 }
        );
        assert_eq!(
            resolve_enemy_bullet(bullet, &mut shields, player, bounds, &config),
            CollisionOutcome::Shield { index: 1, remaining: 0 }
        );
        assert_eq!(
            resolve_enemy_bullet(bullet, &mut shields, player, bounds, &config),
            CollisionOutcome::Miss
        );
        assert_eq!(shields[0].durability, 20);
    }

    #[test]
    fn player_is_hit_below_the_shields() {
        let bounds = PlayfieldBounds::default();
        let config = CollisionConfig::default();
        let mut shields = intact_shields(60);
        let player = Vec2::new(100.0, 680.0);

        assert_eq!(
            resolve_enemy_bullet(Vec2::new(110.0, 690.0), &mut shields, player, bounds, &config),
            CollisionOutcome::Player
        );
        assert_eq!(
            resolve_enemy_bullet(Vec2::new(130.0, 690.0), &mut shields, player, bounds, &config),
            CollisionOutcome::Miss
        );
        assert_eq!(shields, intact_shields(60));
    }
}
