use serde::{Deserialize, Serialize};
use triathlon_core::FirePattern;

use crate::wave::WaveTable;

/// Modulus of the pseudo-cyclic pattern selector.
pub const FIRE_CYCLE_PERIOD: u64 = 17;

const CYCLE_STEP_MS: f64 = 800.0;
const DUAL_MIN_WAVE: u32 = 2;
const DUAL_MIN_CYCLE: u64 = 9;
const BURST_MIN_WAVE: u32 = 3;

/// Tuning of the enemy fire cadence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireDirectorConfig {
    /// Cooldown before pressure and crowd relief, scaled by the wave's cadence.
    pub base_cooldown_ms: f64,
    /// Stage time over which pressure ramps from 0 to 1.
    pub pressure_window_ms: f64,
    /// Cooldown removed at full pressure.
    pub pressure_relief_ms: f64,
    /// Cooldown removed per living enemy.
    pub relief_per_enemy_ms: f64,
    /// Cap on the per-enemy relief.
    pub crowd_relief_cap_ms: f64,
    /// Cooldown floor on wave 1.
    pub floor_ms: f64,
    /// Floor reduction per wave after the first.
    pub floor_step_per_wave_ms: f64,
    /// Lowest floor any wave can reach.
    pub floor_min_ms: f64,
    /// Burst chance on wave 3.
    pub burst_chance_base: f64,
    /// Burst chance added per wave after 3.
    pub burst_chance_per_wave: f64,
    /// Burst chance ceiling.
    pub burst_chance_max: f64,
}

impl Default for FireDirectorConfig {
    fn default() -> Self {
        Self {
            base_cooldown_ms: 1_150.0,
            pressure_window_ms: 60_000.0,
            pressure_relief_ms: 180.0,
            relief_per_enemy_ms: 2.0,
            crowd_relief_cap_ms: 120.0,
            floor_ms: 520.0,
            floor_step_per_wave_ms: 40.0,
            floor_min_ms: 320.0,
            burst_chance_base: 0.18,
            burst_chance_per_wave: 0.04,
            burst_chance_max: 0.35,
        }
    }
}

/// Per-tick inputs of the fire director.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FireInput {
    /// Time spent in the current wave.
    pub elapsed_ms: f64,
    /// Current wave.
    pub wave: u32,
    /// Enemies still alive in the formation.
    pub alive_enemies: u32,
}

/// Decision of the fire director for the next enemy volley.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirePlan {
    /// Delay before the next volley.
    pub cooldown_ms: f64,
    /// Volley shape.
    pub pattern: FirePattern,
    /// Value of the pseudo-cyclic selector.
    pub cycle_value: u64,
    /// Stage pressure in `[0, 1]`.
    pub pressure: f64,
}

/// Chooses enemy volley cadence and shape.
#[derive(Clone, Debug, Default)]
pub struct EnemyFireDirector {
    config: FireDirectorConfig,
    table: WaveTable,
}

impl EnemyFireDirector {
    /// Creates a director reading wave cadence from `table`.
    #[must_use]
    pub fn new(config: FireDirectorConfig, table: WaveTable) -> Self {
        Self { config, table }
    }

    /// Cooldown floor for `wave`.
    #[must_use]
    pub fn cooldown_floor_ms(&self, wave: u32) -> f64 {
        let steps = f64::from(wave.max(1) - 1);
        (self.config.floor_ms - steps * self.config.floor_step_per_wave_ms)
            .max(self.config.floor_min_ms)
    }

    /// Probability-like share of the cycle reserved for bursts on `wave`.
    #[must_use]
    pub fn burst_chance(&self, wave: u32) -> f64 {
        if wave < BURST_MIN_WAVE {
            return 0.0;
        }
        let extra = f64::from(wave - BURST_MIN_WAVE) * self.config.burst_chance_per_wave;
        (self.config.burst_chance_base + extra).min(self.config.burst_chance_max)
    }

    /// Computes the next volley. Identical inputs always yield identical plans.
    #[must_use]
    pub fn compute_fire_plan(&self, input: FireInput) -> FirePlan {
        let elapsed_ms = if input.elapsed_ms.is_finite() {
            input.elapsed_ms.max(0.0)
        } else {
            0.0
        };
        let wave = input.wave.max(1);
        let alive = input.alive_enemies;

        let pressure = if self.config.pressure_window_ms > 0.0 {
            (elapsed_ms / self.config.pressure_window_ms).min(1.0)
        } else {
            1.0
        };

        let base = self.config.base_cooldown_ms * self.table.spec_for_wave(wave).fire_cadence_scale;
        let pressure_relief = (pressure * self.config.pressure_relief_ms).min(self.config.pressure_relief_ms);
        let crowd_relief =
            (f64::from(alive) * self.config.relief_per_enemy_ms).min(self.config.crowd_relief_cap_ms);
        let cooldown_ms = (base - pressure_relief - crowd_relief).max(self.cooldown_floor_ms(wave));

        let cycle_value = ((elapsed_ms / CYCLE_STEP_MS).floor() as u64)
            .wrapping_add(u64::from(wave) * 3)
            .wrapping_add(u64::from(alive))
            % FIRE_CYCLE_PERIOD;

        let period = FIRE_CYCLE_PERIOD as f64;
        let burst_threshold = period - self.burst_chance(wave) * period;
        let pattern = if wave >= BURST_MIN_WAVE && cycle_value as f64 >= burst_threshold {
            FirePattern::Burst
        } else if wave >= DUAL_MIN_WAVE && cycle_value >= DUAL_MIN_CYCLE {
            FirePattern::Dual
        } else {
            FirePattern::Single
        };

        FirePlan {
            cooldown_ms,
            pattern,
            cycle_value,
            pressure,
        }
    }
}
