use serde::{Deserialize, Serialize};
use tracing::debug;
use triathlon_core::{AttackPattern, BossPhase, Event};

use crate::pick_by_index;

const PHASE_TWO_ROTATION: [AttackPattern; 3] = [
    AttackPattern::Volley,
    AttackPattern::VerticalLaser,
    AttackPattern::SeekerSwarm,
];
const PHASE_THREE_ROTATION: [AttackPattern; 3] = [
    AttackPattern::VerticalLaser,
    AttackPattern::EnrageBurst,
    AttackPattern::SeekerSwarm,
];

/// Attack cadence of one boss phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    /// Time between attacks.
    pub cooldown_ms: f64,
    /// Warning window before each attack.
    pub telegraph_ms: f64,
}

/// How the boss picks its next attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackSelection {
    /// One pattern per phase: sweep, volley, enrage burst.
    Fixed,
    /// Phases two and three rotate through three patterns each.
    #[default]
    Rotating,
}

/// Boss tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Health at entry.
    pub max_hp: u32,
    /// Health ratio at or below which phase two starts.
    pub phase_two_threshold: f64,
    /// Health ratio at or below which phase three starts.
    pub phase_three_threshold: f64,
    /// Timing of phases one, two and three.
    pub phases: [PhaseTiming; 3],
    /// Attack selection strategy.
    pub selection: AttackSelection,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            max_hp: 1_200,
            phase_two_threshold: 0.7,
            phase_three_threshold: 0.35,
            phases: [
                PhaseTiming {
                    cooldown_ms: 2_400.0,
                    telegraph_ms: 700.0,
                },
                PhaseTiming {
                    cooldown_ms: 1_900.0,
                    telegraph_ms: 600.0,
                },
                PhaseTiming {
                    cooldown_ms: 1_400.0,
                    telegraph_ms: 450.0,
                },
            ],
            selection: AttackSelection::default(),
        }
    }
}

impl BossConfig {
    fn timing(&self, phase: BossPhase) -> PhaseTiming {
        self.phases[usize::from(phase.number() - 1)]
    }
}

/// Phase implied by the remaining health ratio.
#[must_use]
pub fn phase_for_hp(hp: u32, max_hp: u32, config: &BossConfig) -> BossPhase {
    if max_hp == 0 {
        return BossPhase::Three;
    }
    let ratio = f64::from(hp) / f64::from(max_hp);
    if ratio <= config.phase_three_threshold {
        BossPhase::Three
    } else if ratio <= config.phase_two_threshold {
        BossPhase::Two
    } else {
        BossPhase::One
    }
}

fn phase_after(phase: BossPhase) -> Option<BossPhase> {
    match phase {
        BossPhase::One => Some(BossPhase::Two),
        BossPhase::Two => Some(BossPhase::Three),
        BossPhase::Three => None,
    }
}

/// Snapshot of the boss.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    /// Whether the fight is running.
    pub active: bool,
    /// Whether the boss was destroyed.
    pub defeated: bool,
    /// Remaining health.
    pub hp: u32,
    /// Health at entry.
    pub max_hp: u32,
    /// Phase derived from `hp / max_hp`.
    pub phase: BossPhase,
    /// Whether the next attack is being telegraphed.
    pub telegraph_active: bool,
    /// Time until the next attack.
    pub attack_timer_ms: f64,
    /// Attacks fired since entry.
    pub total_attacks: u32,
    /// Most recent attack.
    pub last_attack_pattern: Option<AttackPattern>,
}

impl BossState {
    fn dormant(max_hp: u32) -> Self {
        Self {
            active: false,
            defeated: false,
            hp: max_hp,
            max_hp,
            phase: BossPhase::One,
            telegraph_active: false,
            attack_timer_ms: 0.0,
            total_attacks: 0,
            last_attack_pattern: None,
        }
    }
}

/// Drives the boss health phases and attack loop.
#[derive(Clone, Debug)]
pub struct BossDirector {
    config: BossConfig,
    state: BossState,
    phase_attack_index: i64,
}

impl Default for BossDirector {
    fn default() -> Self {
        Self::new(BossConfig::default())
    }
}

impl BossDirector {
    /// Creates an inactive boss.
    #[must_use]
    pub fn new(config: BossConfig) -> Self {
        Self {
            state: BossState::dormant(config.max_hp),
            config,
            phase_attack_index: 0,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> BossState {
        self.state
    }

    /// Starts the fight at full health in phase one.
    pub fn enter(&mut self, out: &mut Vec<Event>) {
        let max_hp = self.config.max_hp;
        self.state = BossState {
            active: true,
            attack_timer_ms: self.config.timing(BossPhase::One).cooldown_ms,
            ..BossState::dormant(max_hp)
        };
        self.phase_attack_index = 0;
        debug!(max_hp, "boss entered");
        out.push(Event::BossEntered { max_hp });
    }

    /// Returns the boss to its pre-fight state.
    pub fn reset(&mut self) {
        self.state = BossState::dormant(self.config.max_hp);
        self.phase_attack_index = 0;
    }

    /// Applies damage and recomputes the phase. Ignored unless the fight is running.
    pub fn apply_damage(&mut self, amount: u32, out: &mut Vec<Event>) {
        if !self.state.active || self.state.defeated || amount == 0 {
            return;
        }

        self.state.hp = self.state.hp.saturating_sub(amount);
        let previous = self.state.phase;
        let phase = phase_for_hp(self.state.hp, self.state.max_hp, &self.config);
        if phase != previous {
            self.state.phase = phase;
            self.phase_attack_index = 0;
            self.state.telegraph_active = false;
            self.state.attack_timer_ms = self
                .state
                .attack_timer_ms
                .min(self.config.timing(phase).cooldown_ms);
            let mut from = previous;
            while from.number() < phase.number() {
                let Some(to) = phase_after(from) else {
                    break;
                };
                debug!(from = from.number(), to = to.number(), hp = self.state.hp, "boss phase changed");
                out.push(Event::BossPhaseChanged { from, to });
                from = to;
            }
        }

        if self.state.hp == 0 {
            self.state.defeated = true;
            self.state.active = false;
            self.state.telegraph_active = false;
            debug!(attacks = self.state.total_attacks, "boss defeated");
            out.push(Event::BossDefeated);
        }
    }

    /// Runs the attack countdown and returns the pattern fired this frame, if any.
    pub fn update(&mut self, dt_ms: f64, out: &mut Vec<Event>) -> Option<AttackPattern> {
        if !self.state.active || self.state.defeated {
            return None;
        }
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let timing = self.config.timing(self.state.phase);

        self.state.attack_timer_ms -= dt_ms;

        if self.state.attack_timer_ms <= 0.0 {
            let pattern = self.next_pattern();
            let phase = self.state.phase;
            self.state.total_attacks = self.state.total_attacks.saturating_add(1);
            self.state.last_attack_pattern = Some(pattern);
            self.state.attack_timer_ms = timing.cooldown_ms;
            self.state.telegraph_active = false;
            self.phase_attack_index += 1;
            debug!(?pattern, phase = phase.number(), "boss attack fired");
            out.push(Event::BossAttackFired { pattern, phase });
            return Some(pattern);
        }

        if self.state.attack_timer_ms <= timing.telegraph_ms && !self.state.telegraph_active {
            self.state.telegraph_active = true;
            out.push(Event::BossAttackTelegraphed {
                pattern: self.next_pattern(),
            });
        }

        None
    }

    /// Pattern the next attack will use.
    #[must_use]
    pub fn next_pattern(&self) -> AttackPattern {
        let index = self.phase_attack_index;
        match (self.config.selection, self.state.phase) {
            (_, BossPhase::One) => AttackPattern::Sweep,
            (AttackSelection::Fixed, BossPhase::Two) => AttackPattern::Volley,
            (AttackSelection::Fixed, BossPhase::Three) => AttackPattern::EnrageBurst,
            (AttackSelection::Rotating, BossPhase::Two) => {
                pick_by_index(&PHASE_TWO_ROTATION, index).unwrap_or(AttackPattern::Volley)
            }
            (AttackSelection::Rotating, BossPhase::Three) => {
                pick_by_index(&PHASE_THREE_ROTATION, index).unwrap_or(AttackPattern::EnrageBurst)
            }
        }
    }
}
