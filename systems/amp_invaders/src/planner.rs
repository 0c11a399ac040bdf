use glam::Vec2;
use triathlon_core::{AttackPattern, BossPhase};

use crate::PlayfieldBounds;

const MUZZLE_OFFSET: Vec2 = Vec2::new(0.0, 24.0);
const LASER_MUZZLE_OFFSET: f32 = 32.0;
const LASER_MIN_SPACING: f32 = 28.0;
const LASER_EDGE_PADDING: f32 = 16.0;
const LASER_SPEED: f32 = 520.0;
const PLAYER_LANE_WIDTH: f32 = 56.0;
const LASER_OFFSETS_EARLY: [f32; 2] = [-140.0, 140.0];
const LASER_OFFSETS_ENRAGED: [f32; 4] = [-200.0, -90.0, 90.0, 200.0];
const SEEKER_ANGLES_EARLY: [f32; 3] = [-0.5, 0.0, 0.5];
const SEEKER_ANGLES_ENRAGED: [f32; 4] = [-0.6, -0.2, 0.2, 0.6];
const VOLLEY_ANGLE_STEP: f32 = 0.14;

/// Visual and behavioural class of a boss projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Slow round bullet.
    Orb,
    /// Fast aimed bullet.
    Bolt,
    /// Vertical beam segment.
    Laser,
    /// Homing missile.
    Seeker,
}

/// Projectile the game loop should spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpec {
    /// Spawn position.
    pub position: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Damage dealt on hit.
    pub damage: u32,
    /// Projectile class.
    pub kind: ProjectileKind,
}

/// Inputs of [`plan_boss_projectiles`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanInput {
    /// Attack being fired.
    pub pattern: AttackPattern,
    /// Boss phase at the time of firing.
    pub phase: BossPhase,
    /// Boss position.
    pub boss: Vec2,
    /// Player position.
    pub player: Vec2,
    /// Playfield size.
    pub bounds: PlayfieldBounds,
}

/// Expands an attack into the projectiles it spawns.
#[must_use]
pub fn plan_boss_projectiles(input: &PlanInput) -> Vec<ProjectileSpec> {
    let step = f32::from(input.phase.number() - 1);
    match input.pattern {
        AttackPattern::Sweep => plan_sweep(input, step),
        AttackPattern::Volley => plan_volley(input, step),
        AttackPattern::EnrageBurst => plan_enrage_burst(input, step),
        AttackPattern::VerticalLaser => plan_vertical_laser(input),
        AttackPattern::SeekerSwarm => plan_seeker_swarm(input, step),
    }
}

fn plan_sweep(input: &PlanInput, step: f32) -> Vec<ProjectileSpec> {
    let count = 5 + 2 * step as usize;
    let width = 260.0 + 80.0 * step;
    let speed_y = 220.0 + 20.0 * step;
    let origin = input.boss + MUZZLE_OFFSET;

    (0..count)
        .map(|index| {
            let t = index as f32 / (count - 1) as f32;
            ProjectileSpec {
                position: origin,
                velocity: Vec2::new(-width / 2.0 + width * t, speed_y),
                damage: 1,
                kind: ProjectileKind::Orb,
            }
        })
        .collect()
}

fn plan_volley(input: &PlanInput, step: f32) -> Vec<ProjectileSpec> {
    let count = 3 + step as usize;
    let speed = 280.0 + 30.0 * step;
    let origin = input.boss + MUZZLE_OFFSET;
    let aim = aim_direction(origin, input.player);
    let center = (count - 1) as f32 / 2.0;

    (0..count)
        .map(|index| ProjectileSpec {
            position: origin,
            velocity: rotate(aim, (index as f32 - center) * VOLLEY_ANGLE_STEP) * speed,
            damage: 1,
            kind: ProjectileKind::Bolt,
        })
        .collect()
}

fn plan_enrage_burst(input: &PlanInput, step: f32) -> Vec<ProjectileSpec> {
    let count = 10 + 2 * step as usize;
    let speed = 230.0 + 20.0 * step;
    let origin = input.boss + MUZZLE_OFFSET;

    (0..count)
        .map(|index| {
            let angle = std::f32::consts::FRAC_PI_2
                + std::f32::consts::TAU * index as f32 / count as f32;
            ProjectileSpec {
                position: origin,
                velocity: Vec2::from_angle(angle) * speed,
                damage: 1,
                kind: ProjectileKind::Orb,
            }
        })
        .collect()
}

fn plan_vertical_laser(input: &PlanInput) -> Vec<ProjectileSpec> {
    let offsets: &[f32] = if input.phase >= BossPhase::Three {
        &LASER_OFFSETS_ENRAGED
    } else {
        &LASER_OFFSETS_EARLY
    };

    let min_x = LASER_EDGE_PADDING;
    let max_x = (input.bounds.width - LASER_EDGE_PADDING).max(min_x);
    let player_lane = ((input.player.x / PLAYER_LANE_WIDTH).floor() + 0.5) * PLAYER_LANE_WIDTH;

    let mut columns: Vec<f32> = offsets
        .iter()
        .map(|offset| input.boss.x + offset)
        .chain(std::iter::once(player_lane))
        .filter(|x| x.is_finite())
        .map(|x| x.clamp(min_x, max_x))
        .collect();
    columns.sort_by(f32::total_cmp);

    let mut kept: Vec<f32> = Vec::with_capacity(columns.len());
    for x in columns {
        if kept.last().map_or(true, |last| x - last >= LASER_MIN_SPACING) {
            kept.push(x);
        }
    }

    let y = input.boss.y + LASER_MUZZLE_OFFSET;
    kept.into_iter()
        .map(|x| ProjectileSpec {
            position: Vec2::new(x, y),
            velocity: Vec2::new(0.0, LASER_SPEED),
            damage: 2,
            kind: ProjectileKind::Laser,
        })
        .collect()
}

fn plan_seeker_swarm(input: &PlanInput, step: f32) -> Vec<ProjectileSpec> {
    let angles: &[f32] = if input.phase >= BossPhase::Three {
        &SEEKER_ANGLES_ENRAGED
    } else {
        &SEEKER_ANGLES_EARLY
    };
    let speed = 170.0 + 20.0 * step;
    let origin = input.boss + MUZZLE_OFFSET;
    let aim = aim_direction(origin, input.player);

    angles
        .iter()
        .map(|angle| ProjectileSpec {
            position: origin,
            velocity: rotate(aim, *angle) * speed,
            damage: 1,
            kind: ProjectileKind::Seeker,
        })
        .collect()
}

fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(Vec2::Y)
}

fn rotate(direction: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pattern: AttackPattern, phase: BossPhase) -> PlanInput {
        PlanInput {
            pattern,
            phase,
            boss: Vec2::new(240.0, 120.0),
            player: Vec2::new(240.0, 640.0),
            bounds: PlayfieldBounds::default(),
        }
    }

    #[test]
    fn sweep_widens_with_phase() {
        let early = plan_boss_projectiles(&input(AttackPattern::Sweep, BossPhase::One));
        let late = plan_boss_projectiles(&input(AttackPattern::Sweep, BossPhase::Three));
        assert_eq!(early.len(), 5);
        assert_eq!(late.len(), 9);
        assert_eq!(early[0].velocity.x, -130.0);
        assert_eq!(early[4].velocity.x, 130.0);
        assert_eq!(late[8].velocity.x, 210.0);
    }

    #[test]
    fn volley_is_aimed_at_the_player() {
        let shots = plan_boss_projectiles(&input(AttackPattern::Volley, BossPhase::One));
        assert_eq!(shots.len(), 3);
        let middle = shots[1].velocity;
        assert!(middle.x.abs() < 1e-3);
        assert!(middle.y > 0.0);
        assert!(shots.iter().all(|shot| shot.kind == ProjectileKind::Bolt));
    }

    #[test]
    fn enrage_burst_forms_a_full_ring() {
        let ring = plan_boss_projectiles(&input(AttackPattern::EnrageBurst, BossPhase::Three));
        assert_eq!(ring.len(), 14);
        let sum = ring.iter().fold(Vec2::ZERO, |acc, shot| acc + shot.velocity);
        assert!(sum.length() < 1e-2);
    }

    #[test]
    fn laser_columns_are_spaced_and_include_player_lane() {
        let mut plan = input(AttackPattern::VerticalLaser, BossPhase::Two);
        plan.player.x = 250.0;
        let columns: Vec<f32> = plan_boss_projectiles(&plan)
            .iter()
            .map(|shot| shot.position.x)
            .collect();
        assert_eq!(columns, vec![100.0, 252.0, 380.0]);
    }

    #[test]
    fn laser_columns_deduplicate_close_positions() {
        let mut plan = input(AttackPattern::VerticalLaser, BossPhase::Three);
        plan.player.x = 320.0;
        let columns: Vec<f32> = plan_boss_projectiles(&plan)
            .iter()
            .map(|shot| shot.position.x)
            .collect();
        assert_eq!(columns, vec![40.0, 150.0, 308.0, 440.0]);
        for pair in columns.windows(2) {
            assert!(pair[1] - pair[0] >= LASER_MIN_SPACING);
        }
    }

    #[test]
    fn seeker_count_depends_on_phase() {
        let early = plan_boss_projectiles(&input(AttackPattern::SeekerSwarm, BossPhase::Two));
        let late = plan_boss_projectiles(&input(AttackPattern::SeekerSwarm, BossPhase::Three));
        assert_eq!(early.len(), 3);
        assert_eq!(late.len(), 4);
        assert!(late.iter().all(|shot| shot.kind == ProjectileKind::Seeker));
    }
}
