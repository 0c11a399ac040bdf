use tracing::debug;
use triathlon_core::{AudioState, Event, SnakeAudioMode};

use crate::energy::{compute_energy_index, AudioDirectorConfig, AudioSample};

/// Sixteenth-note steps in one 8-bar phrase.
pub const BOUNDARY_STEPS: u64 = 128;

/// Hysteretic music phase director for one snake life.
#[derive(Clone, Debug)]
pub struct SnakeAudioDirector {
    config: AudioDirectorConfig,
    mode: SnakeAudioMode,
    state: AudioState,
    state_floor: u8,
    last_boundary_step16: Option<u64>,
    drop_triggered: bool,
    high_energy_bars: u32,
    last_danger_at_seconds: Option<f64>,
}

impl Default for SnakeAudioDirector {
    fn default() -> Self {
        Self::new(AudioDirectorConfig::default(), SnakeAudioMode::default())
    }
}

impl SnakeAudioDirector {
    /// Creates a director in the intro phase.
    #[must_use]
    pub fn new(config: AudioDirectorConfig, mode: SnakeAudioMode) -> Self {
        Self {
            config,
            mode,
            state: AudioState::Intro,
            state_floor: AudioState::Intro.rank(),
            last_boundary_step16: None,
            drop_triggered: false,
            high_energy_bars: 0,
            last_danger_at_seconds: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn state(&self) -> AudioState {
        self.state
    }

    /// Highest rank visited this life.
    #[must_use]
    pub fn state_floor(&self) -> u8 {
        self.state_floor
    }

    /// Whether the drop already played this life.
    #[must_use]
    pub fn drop_triggered(&self) -> bool {
        self.drop_triggered
    }

    /// Consecutive hype boundaries at drop energy.
    #[must_use]
    pub fn high_energy_bars(&self) -> u32 {
        self.high_energy_bars
    }

    /// Selected mapping mode.
    #[must_use]
    pub fn mode(&self) -> SnakeAudioMode {
        self.mode
    }

    /// Records a near miss or collision warning at `at_seconds` into the life.
    pub fn note_danger(&mut self, at_seconds: f64) {
        if at_seconds.is_finite() {
            self.last_danger_at_seconds = Some(at_seconds);
        }
    }

    /// Clears every latch for a new life.
    pub fn reset(&mut self) {
        *self = Self::new(self.config, self.mode);
    }

    /// Feeds the sequencer position. The first call inside each 8-bar phrase
    /// evaluates that phrase's boundary, so a step that skips the exact
    /// boundary still counts; later calls in the same phrase are ignored.
    /// Returns the new phase when it changed.
    pub fn on_step(&mut self, step16: u64, sample: &AudioSample, out: &mut Vec<Event>) -> Option<AudioState> {
        let boundary = step16 - step16 % BOUNDARY_STEPS;
        if self.last_boundary_step16.is_some_and(|last| boundary <= last) {
            return None;
        }
        self.last_boundary_step16 = Some(boundary);

        let energy = compute_energy_index(sample, &self.config);
        let next = match self.mode {
            SnakeAudioMode::Legacy => self.threshold_state(energy),
            SnakeAudioMode::V2 => self.next_state(energy, sample),
        };

        if next == self.state {
            return None;
        }

        let from = self.state;
        self.state = next;
        self.state_floor = self.state_floor.max(next.rank());
        debug!(?from, to = ?next, energy, boundary, "audio state changed");
        out.push(Event::AudioStateChanged { from, to: next });
        Some(next)
    }

    fn threshold_state(&self, energy: f64) -> AudioState {
        let [build, vibe, hype] = self.config.thresholds;
        if energy >= hype {
            AudioState::Hype
        } else if energy >= vibe {
            AudioState::Vibe
        } else if energy >= build {
            AudioState::Build
        } else {
            AudioState::Intro
        }
    }

    fn next_state(&mut self, energy: f64, sample: &AudioSample) -> AudioState {
        match self.state {
            AudioState::Intro | AudioState::Build | AudioState::Vibe => self.climb(energy),
            AudioState::Hype => self.hype_boundary(energy, sample),
            AudioState::Drop => AudioState::Breakdown,
            AudioState::Breakdown | AudioState::Flow => AudioState::Flow,
        }
    }

    /// Highest phase whose threshold is met, unless the floor already passed it.
    fn climb(&self, energy: f64) -> AudioState {
        let target = self.threshold_state(energy);
        if target.rank() > self.state_floor {
            target
        } else {
            self.state
        }
    }

    fn hype_boundary(&mut self, energy: f64, sample: &AudioSample) -> AudioState {
        if energy >= self.config.drop_energy {
            self.high_energy_bars = self.high_energy_bars.saturating_add(1);
        } else {
            self.high_energy_bars = 0;
        }

        if self.drop_triggered || self.high_energy_bars < self.config.drop_bars {
            return AudioState::Hype;
        }

        let combo_gate = sample.combo_milestone_recent
            || sample.combo >= self.config.drop_combo
            || sample.pickup_density >= self.config.drop_pickup_density;
        let momentum_gate =
            sample.has_positive_momentum || sample.score_rate >= self.config.drop_score_rate;
        let shocked = self.in_danger_shock(sample.elapsed_seconds);

        if !combo_gate || !momentum_gate || shocked {
            debug!(combo_gate, momentum_gate, shocked, "drop held back");
            return AudioState::Hype;
        }

        self.drop_triggered = true;
        debug!(energy, bars = self.high_energy_bars, "drop triggered");
        AudioState::Drop
    }

    fn in_danger_shock(&self, now_seconds: f64) -> bool {
        match self.last_danger_at_seconds {
            Some(at) if now_seconds.is_finite() => {
                let since = now_seconds - at;
                (0.0..self.config.danger_shock_seconds).contains(&since)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_sample(elapsed_seconds: f64) -> AudioSample {
        AudioSample {
            combo: 12,
            score_rate: 40.0,
            length: 24,
            pickup_density: 1.0,
            score: 3_000.0,
            elapsed_seconds,
            danger: 0.0,
            combo_milestone_recent: true,
            has_positive_momentum: true,
        }
    }

    fn boundary(index: u64) -> u64 {
        index * BOUNDARY_STEPS
    }

    fn sample_with(combo: u32, score_rate: f64) -> AudioSample {
        AudioSample {
            combo,
            score_rate,
            ..AudioSample::default()
        }
    }

    #[test]
    fn saturated_energy_jumps_to_the_highest_crossed_phase() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();

        assert_eq!(director.on_step(boundary(0), &high_sample(10.0), &mut events), Some(AudioState::Hype));
        assert_eq!(director.state_floor(), AudioState::Hype.rank());
        assert_eq!(
            events,
            vec![Event::AudioStateChanged {
                from: AudioState::Intro,
                to: AudioState::Hype,
            }]
        );
    }

    #[test]
    fn rising_energy_climbs_threshold_by_threshold() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();

        assert_eq!(director.on_step(boundary(0), &sample_with(7, 0.0), &mut events), Some(AudioState::Build));
        assert_eq!(director.on_step(boundary(1), &sample_with(12, 4.0), &mut events), Some(AudioState::Vibe));
        assert_eq!(director.on_step(boundary(2), &sample_with(7, 0.0), &mut events), None);
        assert_eq!(director.state(), AudioState::Vibe);
        assert_eq!(director.on_step(boundary(3), &sample_with(12, 40.0), &mut events), Some(AudioState::Hype));
    }

    #[test]
    fn each_phrase_is_evaluated_once() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();

        assert_eq!(director.on_step(64, &sample_with(7, 0.0), &mut events), Some(AudioState::Build));
        assert_eq!(director.on_step(100, &high_sample(10.0), &mut events), None);
        assert_eq!(director.state(), AudioState::Build);
        assert_eq!(director.on_step(boundary(1), &high_sample(10.0), &mut events), Some(AudioState::Hype));
        assert_eq!(director.on_step(boundary(1), &high_sample(10.0), &mut events), None);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn skipped_boundary_step_is_picked_up_late() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();
        let _ = director.on_step(boundary(0), &high_sample(10.0), &mut events);

        assert_eq!(director.on_step(boundary(1) + 2, &high_sample(16.0), &mut events), None);
        assert_eq!(director.high_energy_bars(), 1);
        assert_eq!(director.on_step(boundary(1) + 70, &high_sample(24.0), &mut events), None);
        assert_eq!(director.high_energy_bars(), 1);
        assert_eq!(
            director.on_step(boundary(2) + 1, &high_sample(32.0), &mut events),
            Some(AudioState::Drop)
        );
    }

    #[test]
    fn low_energy_never_regresses_or_drops() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();
        let _ = director.on_step(boundary(0), &high_sample(10.0), &mut events);

        for index in 1..13 {
            assert_eq!(director.on_step(boundary(index), &AudioSample::default(), &mut events), None);
        }
        assert_eq!(director.state(), AudioState::Hype);
        assert!(!director.drop_triggered());
    }

    #[test]
    fn danger_shock_holds_the_drop_back() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();
        for index in 0..2 {
            let _ = director.on_step(boundary(index), &high_sample(10.0), &mut events);
        }
        assert_eq!(director.high_energy_bars(), 1);

        director.note_danger(18.5);
        assert_eq!(director.on_step(boundary(2), &high_sample(20.0), &mut events), None);
        assert_eq!(director.high_energy_bars(), 2);

        assert_eq!(
            director.on_step(boundary(3), &high_sample(21.5), &mut events),
            Some(AudioState::Drop)
        );
    }

    #[test]
    fn gates_must_hold_for_the_drop() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();
        let ungated = AudioSample {
            combo: 5,
            pickup_density: 0.5,
            combo_milestone_recent: false,
            ..high_sample(90.0)
        };
        for index in 0..8 {
            let _ = director.on_step(boundary(index), &ungated, &mut events);
        }
        assert_eq!(director.state(), AudioState::Hype);
        assert!(director.high_energy_bars() >= 2);
    }

    #[test]
    fn legacy_mode_follows_energy_both_ways() {
        let mut director = SnakeAudioDirector::new(AudioDirectorConfig::default(), SnakeAudioMode::Legacy);
        let mut events = Vec::new();

        assert_eq!(director.on_step(boundary(0), &high_sample(10.0), &mut events), Some(AudioState::Hype));
        for index in 1..4 {
            assert_eq!(director.on_step(boundary(index), &high_sample(10.0), &mut events), None);
        }
        assert_eq!(
            director.on_step(boundary(4), &AudioSample::default(), &mut events),
            Some(AudioState::Intro)
        );
        assert!(!director.drop_triggered());
    }

    #[test]
    fn reset_clears_latches() {
        let mut director = SnakeAudioDirector::default();
        let mut events = Vec::new();
        for index in 0..6 {
            let _ = director.on_step(boundary(index), &high_sample(10.0), &mut events);
        }
        assert!(director.drop_triggered());

        director.reset();
        assert_eq!(director.state(), AudioState::Intro);
        assert_eq!(director.state_floor(), 0);
        assert!(!director.drop_triggered());
        assert_eq!(director.on_step(boundary(5), &sample_with(7, 0.0), &mut events), Some(AudioState::Build));
    }
}
