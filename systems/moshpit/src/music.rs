use serde::{Deserialize, Serialize};
use tracing::trace;
use triathlon_core::Event;

/// Completion percentages that trigger a stinger.
pub const MILESTONE_PERCENTS: [u8; 4] = [25, 50, 75, 100];

/// Reactive soundtrack tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Intensity with nothing collected.
    pub base_intensity: f64,
    /// Intensity added at full average completion.
    pub completion_weight: f64,
    /// Intensity added while the guards are frightened.
    pub fright_boost: f64,
    /// Fewest layers ever playing.
    pub min_layers: u8,
    /// Most layers ever playing.
    pub max_layers: u8,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            base_intensity: 0.2,
            completion_weight: 0.7,
            fright_boost: 0.15,
            min_layers: 1,
            max_layers: 5,
        }
    }
}

/// Music intensity in `[0, 1]` from the average zone completion.
#[must_use]
pub fn compute_music_intensity(average_completion: f64, frightened: bool, config: &MusicConfig) -> f64 {
    let completion = if average_completion.is_finite() {
        average_completion.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let boost = if frightened { config.fright_boost } else { 0.0 };
    let intensity = config.base_intensity + completion * config.completion_weight + boost;
    if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Number of stem layers to play, within `[min_layers, max_layers]`.
#[must_use]
pub fn compute_active_layers(average_completion: f64, frightened: bool, config: &MusicConfig) -> u8 {
    let min = config.min_layers.min(config.max_layers);
    let max = config.max_layers;
    let intensity = compute_music_intensity(average_completion, frightened, config);
    let layers = f64::from(min) + intensity * f64::from(max - min);
    layers.round().clamp(f64::from(min), f64::from(max)) as u8
}

/// Remembers each zone's last observed completion so every milestone fires
/// once per crossing.
#[derive(Clone, Debug, Default)]
pub struct MilestoneTracker {
    last_fraction: Vec<f64>,
}

impl MilestoneTracker {
    /// Creates a tracker for `zones` zones, all at zero.
    #[must_use]
    pub fn new(zones: usize) -> Self {
        Self {
            last_fraction: vec![0.0; zones],
        }
    }

    /// Compares `fractions` against the previous observation and fires a
    /// stinger for every milestone crossed upward. Returns the stingers fired
    /// across all zones.
    pub fn observe(&mut self, fractions: &[f64], out: &mut Vec<Event>) -> u32 {
        if self.last_fraction.len() < fractions.len() {
            self.last_fraction.resize(fractions.len(), 0.0);
        }

        let mut fired = 0;
        for (index, (&current, last)) in fractions.iter().zip(self.last_fraction.iter_mut()).enumerate() {
            let current = if current.is_finite() { current.clamp(0.0, 1.0) } else { 0.0 };
            let zone = u32::try_from(index).unwrap_or(u32::MAX);
            for percent in MILESTONE_PERCENTS {
                let threshold = f64::from(percent) / 100.0;
                if *last < threshold && current >= threshold {
                    fired += 1;
                    trace!(zone, percent, "zone milestone");
                    out.push(Event::ZoneMilestone { zone, percent });
                }
            }
            *last = current;
        }
        fired
    }

    /// Forgets the progress of one zone after it refilled.
    pub fn rewind(&mut self, zone: usize) {
        if let Some(last) = self.last_fraction.get_mut(zone) {
            *last = 0.0;
        }
    }
}
