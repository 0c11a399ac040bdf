use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use triathlon_core::{Event, SpecialKind};

use crate::PlayfieldBounds;

const SPAWN_PRIORITY: [SpecialKind; 2] = [SpecialKind::DiveBomber, SpecialKind::ShieldBreaker];

/// Tuning for one kind of special enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialKindConfig {
    /// First wave on which the special may appear.
    pub min_wave: u32,
    /// Minimum time between two spawns of this kind.
    pub cooldown_ms: f64,
    /// Warning time before the dive starts.
    pub telegraph_ms: f64,
    /// Dive speed in pixels per second.
    pub speed: f32,
}

/// Tuning for the specials spawner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialsConfig {
    /// Dive bomber tuning.
    pub dive_bomber: SpecialKindConfig,
    /// Shield breaker tuning.
    pub shield_breaker: SpecialKindConfig,
    /// Vertical spawn position.
    pub spawn_y: f32,
    /// Number of evenly spaced spawn lanes.
    pub lane_count: u32,
    /// Distance below the playfield after which a special is pruned.
    pub offscreen_margin: f32,
}

impl Default for SpecialsConfig {
    fn default() -> Self {
        Self {
            dive_bomber: SpecialKindConfig {
                min_wave: 3,
                cooldown_ms: 9_000.0,
                telegraph_ms: 900.0,
                speed: 320.0,
            },
            shield_breaker: SpecialKindConfig {
                min_wave: 4,
                cooldown_ms: 12_000.0,
                telegraph_ms: 1_100.0,
                speed: 260.0,
            },
            spawn_y: 48.0,
            lane_count: 5,
            offscreen_margin: 32.0,
        }
    }
}

impl SpecialsConfig {
    fn for_kind(&self, kind: SpecialKind) -> &SpecialKindConfig {
        match kind {
            SpecialKind::DiveBomber => &self.dive_bomber,
            SpecialKind::ShieldBreaker => &self.shield_breaker,
        }
    }
}

/// Movement phase of a special.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialMotion {
    /// Hovering in place while warning the player.
    Telegraph,
    /// Falling toward the bottom of the playfield.
    Diving,
}

/// Live special enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpecialEntity {
    /// Identifier, unique per stage attempt.
    pub id: u32,
    /// Kind of special.
    pub kind: SpecialKind,
    /// Movement phase.
    pub motion: SpecialMotion,
    /// Current position.
    pub position: Vec2,
    /// Telegraph time left.
    pub telegraph_ms_remaining: f64,
    /// Dive speed in pixels per second.
    pub speed: f32,
    /// Whether the special was destroyed or hit something.
    pub consumed: bool,
}

/// Per-tick inputs of the specials spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpecialsInput {
    /// Time spent in the stage attempt.
    pub now_ms: f64,
    /// Frame delta.
    pub dt_ms: f64,
    /// Current wave.
    pub wave: u32,
    /// Whether the boss fight is running.
    pub boss_active: bool,
    /// Playfield size.
    pub bounds: PlayfieldBounds,
}

/// Spawns, moves and prunes special enemies.
#[derive(Clone, Debug)]
pub struct SpecialsDirector {
    config: SpecialsConfig,
    entities: Vec<SpecialEntity>,
    next_spawn_at_ms: [f64; 2],
    spawn_sequence: u32,
}

impl Default for SpecialsDirector {
    fn default() -> Self {
        Self::new(SpecialsConfig::default())
    }
}

impl SpecialsDirector {
    /// Creates an empty spawner. Each kind first becomes eligible one cooldown into the stage.
    #[must_use]
    pub fn new(config: SpecialsConfig) -> Self {
        Self {
            next_spawn_at_ms: initial_schedule(&config),
            config,
            entities: Vec::new(),
            spawn_sequence: 0,
        }
    }

    /// Live specials.
    #[must_use]
    pub fn entities(&self) -> &[SpecialEntity] {
        &self.entities
    }

    /// Earliest spawn time of `kind`.
    #[must_use]
    pub fn next_spawn_at_ms(&self, kind: SpecialKind) -> f64 {
        self.next_spawn_at_ms[kind_slot(kind)]
    }

    /// Number of specials spawned so far.
    #[must_use]
    pub fn spawn_sequence(&self) -> u32 {
        self.spawn_sequence
    }

    /// Marks a special as destroyed. Returns `false` for unknown or already consumed ids.
    pub fn consume(&mut self, id: u32) -> bool {
        match self
            .entities
            .iter_mut()
            .find(|entity| entity.id == id && !entity.consumed)
        {
            Some(entity) => {
                entity.consumed = true;
                true
            }
            None => false,
        }
    }

    /// Clears every special and restarts the schedule.
    pub fn reset(&mut self) {
        self.entities.clear();
        self.next_spawn_at_ms = initial_schedule(&self.config);
        self.spawn_sequence = 0;
    }

    /// Advances live specials, prunes finished ones and spawns at most one new special.
    pub fn update(&mut self, input: SpecialsInput, out: &mut Vec<Event>) {
        let dt_ms = sanitize_ms(input.dt_ms);
        let now_ms = sanitize_ms(input.now_ms);

        for entity in self.entities.iter_mut().filter(|entity| !entity.consumed) {
            match entity.motion {
                SpecialMotion::Telegraph => {
                    entity.telegraph_ms_remaining -= dt_ms;
                    if entity.telegraph_ms_remaining <= 0.0 {
                        entity.telegraph_ms_remaining = 0.0;
                        entity.motion = SpecialMotion::Diving;
                        debug!(id = entity.id, "special diving");
                        out.push(Event::SpecialDiving { id: entity.id });
                    }
                }
                SpecialMotion::Diving => {
                    entity.position.y += entity.speed * (dt_ms / 1_000.0) as f32;
                }
            }
        }

        let prune_below = input.bounds.height + self.config.offscreen_margin;
        self.entities
            .retain(|entity| !entity.consumed && entity.position.y <= prune_below);

        if input.boss_active || !self.entities.is_empty() {
            return;
        }

        for kind in SPAWN_PRIORITY {
            let tuning = *self.config.for_kind(kind);
            let slot = kind_slot(kind);
            if input.wave < tuning.min_wave || now_ms < self.next_spawn_at_ms[slot] {
                continue;
            }

            let entity = self.spawn(kind, &tuning, input.wave, input.bounds);
            self.next_spawn_at_ms[slot] = now_ms + tuning.cooldown_ms;
            debug!(id = entity.id, ?kind, x = entity.position.x, "special spawned");
            out.push(Event::SpecialSpawned {
                id: entity.id,
                kind,
            });
            self.entities.push(entity);
            break;
        }
    }

    fn spawn(
        &mut self,
        kind: SpecialKind,
        tuning: &SpecialKindConfig,
        wave: u32,
        bounds: PlayfieldBounds,
    ) -> SpecialEntity {
        let lanes = self.config.lane_count.max(1);
        let lane = (self.spawn_sequence.wrapping_mul(3).wrapping_add(wave)) % lanes;
        let x = bounds.width * (lane + 1) as f32 / (lanes + 1) as f32;
        self.spawn_sequence = self.spawn_sequence.wrapping_add(1);

        SpecialEntity {
            id: self.spawn_sequence,
            kind,
            motion: SpecialMotion::Telegraph,
            position: Vec2::new(x, self.config.spawn_y),
            telegraph_ms_remaining: tuning.telegraph_ms,
            speed: tuning.speed,
            consumed: false,
        }
    }
}

fn initial_schedule(config: &SpecialsConfig) -> [f64; 2] {
    SPAWN_PRIORITY.map(|kind| config.for_kind(kind).cooldown_ms)
}

fn kind_slot(kind: SpecialKind) -> usize {
    match kind {
        SpecialKind::DiveBomber => 0,
        SpecialKind::ShieldBreaker => 1,
    }
}

fn sanitize_ms(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
