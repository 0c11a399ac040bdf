use serde::{Deserialize, Serialize};

/// Rolling performance measurements taken when a boundary is reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioSample {
    /// Current combo.
    pub combo: u32,
    /// Points per second over the recent window.
    pub score_rate: f64,
    /// Snake length in segments.
    pub length: u32,
    /// Share of recent beats with a pickup, in `[0, 1]`.
    pub pickup_density: f64,
    /// Score of the current life.
    pub score: f64,
    /// Seconds since the life started.
    pub elapsed_seconds: f64,
    /// Proximity to a collision, in `[0, 1]`.
    pub danger: f64,
    /// Whether a combo milestone was hit recently.
    pub combo_milestone_recent: bool,
    /// Whether the score rate is trending up.
    pub has_positive_momentum: bool,
}

/// Blend weights of the energy index.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyWeights {
    /// Weight of the normalized combo.
    pub combo: f64,
    /// Weight of the normalized score rate.
    pub score_rate: f64,
    /// Weight of the normalized length.
    pub length: f64,
    /// Weight of the pickup density.
    pub pickup_density: f64,
    /// Weight of the normalized score.
    pub score: f64,
    /// Weight of the normalized life time.
    pub elapsed: f64,
    /// Penalty applied at full danger.
    pub danger_penalty: f64,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self {
            combo: 0.28,
            score_rate: 0.22,
            length: 0.17,
            pickup_density: 0.09,
            score: 0.08,
            elapsed: 0.16,
            danger_penalty: 0.18,
        }
    }
}

/// Director tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioDirectorConfig {
    /// Energy blend.
    pub weights: EnergyWeights,
    /// Combo that counts as full energy.
    pub combo_full: f64,
    /// Score rate that counts as full energy.
    pub score_rate_full: f64,
    /// Length that counts as full energy.
    pub length_full: f64,
    /// Score that counts as full energy.
    pub score_full: f64,
    /// Life time that counts as full energy.
    pub elapsed_full_seconds: f64,
    /// Energy needed to enter build, vibe and hype.
    pub thresholds: [f64; 3],
    /// Energy a hype boundary needs to count towards the drop.
    pub drop_energy: f64,
    /// Consecutive qualifying hype boundaries before the drop.
    pub drop_bars: u32,
    /// Combo that satisfies the drop's combo gate.
    pub drop_combo: u32,
    /// Pickup density that satisfies the drop's combo gate.
    pub drop_pickup_density: f64,
    /// Score rate that satisfies the drop's momentum gate.
    pub drop_score_rate: f64,
    /// Window after a danger event during which the drop is held back.
    pub danger_shock_seconds: f64,
}

impl Default for AudioDirectorConfig {
    fn default() -> Self {
        Self {
            weights: EnergyWeights::default(),
            combo_full: 12.0,
            score_rate_full: 40.0,
            length_full: 24.0,
            score_full: 3_000.0,
            elapsed_full_seconds: 180.0,
            thresholds: [0.16, 0.29, 0.44],
            drop_energy: 0.64,
            drop_bars: 2,
            drop_combo: 6,
            drop_pickup_density: 0.55,
            drop_score_rate: 22.0,
            danger_shock_seconds: 3.0,
        }
    }
}

fn unit(value: f64, full: f64) -> f64 {
    if !value.is_finite() || !full.is_finite() || full <= 0.0 {
        return 0.0;
    }
    (value / full).clamp(0.0, 1.0)
}

/// Weighted energy of a sample, clamped to `[0, 1]`.
#[must_use]
pub fn compute_energy_index(sample: &AudioSample, config: &AudioDirectorConfig) -> f64 {
    let weights = &config.weights;
    let energy = weights.combo * unit(f64::from(sample.combo), config.combo_full)
        + weights.score_rate * unit(sample.score_rate, config.score_rate_full)
        + weights.length * unit(f64::from(sample.length), config.length_full)
        + weights.pickup_density * unit(sample.pickup_density, 1.0)
        + weights.score * unit(sample.score, config.score_full)
        + weights.elapsed * unit(sample.elapsed_seconds, config.elapsed_full_seconds)
        - weights.danger_penalty * unit(sample.danger, 1.0);

    if energy.is_finite() {
        energy.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturated_sample_reaches_full_energy() {
        let sample = AudioSample {
            combo: 30,
            score_rate: 90.0,
            length: 40,
            pickup_density: 1.0,
            score: 9_000.0,
            elapsed_seconds: 400.0,
            ..AudioSample::default()
        };
        let energy = compute_energy_index(&sample, &AudioDirectorConfig::default());
        assert!((energy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn danger_is_subtracted_and_result_clamped() {
        let config = AudioDirectorConfig::default();
        let calm = AudioSample {
            combo: 6,
            ..AudioSample::default()
        };
        assert!((compute_energy_index(&calm, &config) - 0.14).abs() < 1e-9);

        let scared = AudioSample { danger: 1.0, ..calm };
        assert_eq!(compute_energy_index(&scared, &config), 0.0);

        let broken = AudioSample {
            score_rate: f64::NAN,
            ..calm
        };
        assert!((compute_energy_index(&broken, &config) - 0.14).abs() < 1e-9);
    }
}
