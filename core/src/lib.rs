#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arcade Triathlon engine.
//!
//! This crate defines the message surface that connects the headless adapter,
//! the authoritative run-flow state, and the pure stage systems. Adapters
//! submit [`Command`] values describing run-level mutations, the run-flow
//! state executes them via its `apply` entry point, and every system reports
//! what happened during a tick by appending [`Event`] values to a caller-owned
//! buffer instead of invoking callbacks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod config;

pub use config::{ConfigError, RunConfig, SnakeAudioMode};

/// Number of stages chained in a single run.
pub const STAGE_COUNT: usize = 3;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Arcade Triathlon.";

/// Stages of the triathlon in the order they are played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Snake-style rhythm game.
    RhythmSerpent,
    /// Pac-Man-style chase game.
    Moshpit,
    /// Wave shooter that ends in a boss fight.
    AmpInvaders,
}

impl Stage {
    /// Every stage in play order.
    pub const ALL: [Stage; STAGE_COUNT] = [Stage::RhythmSerpent, Stage::Moshpit, Stage::AmpInvaders];

    /// Zero-based position of the stage within a run.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::RhythmSerpent => 0,
            Self::Moshpit => 1,
            Self::AmpInvaders => 2,
        }
    }

    /// Resolves a stage from its index, clamping anything past the last stage.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::RhythmSerpent,
            1 => Self::Moshpit,
            _ => Self::AmpInvaders,
        }
    }

    /// Returns the stage played after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::RhythmSerpent => Some(Self::Moshpit),
            Self::Moshpit => Some(Self::AmpInvaders),
            Self::AmpInvaders => None,
        }
    }
}

/// Music genre attached to an Amp Invaders wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    /// First wave of every cycle.
    Pop,
    /// Second wave of every cycle.
    Edm,
    /// Third wave of every cycle.
    HipHop,
    /// Fourth wave of every cycle.
    Rock,
}

impl Genre {
    /// Lowercase identifier used by audio and theme collaborators.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pop => "pop",
            Self::Edm => "edm",
            Self::HipHop => "hiphop",
            Self::Rock => "rock",
        }
    }
}

/// Phase of the Amp Invaders boss, derived from its remaining health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    /// Health above the first threshold.
    One,
    /// Health at or below the first threshold.
    Two,
    /// Health at or below the second threshold.
    Three,
}

impl BossPhase {
    /// One-based phase number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Attack patterns the boss can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttackPattern {
    /// Wide fan of slow orbs.
    Sweep,
    /// Aimed cluster of bolts.
    Volley,
    /// Radial ring fired while enraged.
    EnrageBurst,
    /// Vertical laser columns around the player's lane.
    VerticalLaser,
    /// Homing seekers.
    SeekerSwarm,
}

/// Volley shape selected by the enemy fire director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirePattern {
    /// One shot from one shooter.
    Single,
    /// Two shooters fire together.
    Dual,
    /// Rapid burst from one shooter.
    Burst,
}

/// Kinds of special enemies that interrupt regular waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Dives at the player from wave 3 onward.
    DiveBomber,
    /// Targets the shields from wave 4 onward.
    ShieldBreaker,
}

/// Narrative phase of the Rhythm Serpent music.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioState {
    /// Opening groove.
    Intro,
    /// Layers start stacking.
    Build,
    /// Full groove.
    Vibe,
    /// Peak energy before the drop.
    Hype,
    /// One-shot drop.
    Drop,
    /// Cool-down after the drop.
    Breakdown,
    /// Terminal groove for the rest of the life.
    Flow,
}

impl AudioState {
    /// Ordinal rank used for the monotonic state floor.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Intro => 0,
            Self::Build => 1,
            Self::Vibe => 2,
            Self::Hype => 3,
            Self::Drop => 4,
            Self::Breakdown => 5,
            Self::Flow => 6,
        }
    }
}

/// Commands that express all permissible run-flow mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the run clock and the current stage clock.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Adds raw points earned in the current stage.
    AddStageScore {
        /// Raw points; negative values are accepted and floored when scored.
        /// Ignored once the current attempt has ended.
        points: f64,
    },
    /// Reports that the current stage attempt ended (death or objective).
    EndStage,
    /// Reports that the stage objective (boss defeat, every zone cleared) was met.
    CompleteObjective,
    /// Restarts the current stage without touching banked results.
    RetryStage,
    /// Banks the current stage and moves to the next one.
    AdvanceStage {
        /// Tri-points credited to the stage being left.
        tri_points: u64,
    },
}

/// Events broadcast by the run flow and the stage systems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Commit became available for the stage.
    CommitUnlocked {
        /// Stage that unlocked.
        stage: Stage,
    },
    /// Current stage was restarted.
    StageRetried {
        /// Stage that restarted.
        stage: Stage,
    },
    /// A stage was banked and the run moved on.
    StageAdvanced {
        /// Stage that was banked.
        from: Stage,
        /// Stage now being played.
        to: Stage,
        /// Raw score written to the bank.
        banked_raw: f64,
        /// Tri-points written to the bank.
        banked_tri: u64,
    },
    /// The final stage was banked.
    RunCompleted,
    /// The run clock reached zero.
    RunEnded,
    /// Points were awarded inside a stage.
    ScoreAwarded {
        /// Stage that produced the points.
        stage: Stage,
        /// Points awarded.
        points: u32,
    },
    /// An Amp Invaders wave was cleared.
    WaveCleared {
        /// Wave number that was cleared.
        wave: u32,
        /// Wave number now starting.
        next_wave: u32,
        /// Genre of the next wave.
        genre: Genre,
    },
    /// The player's spread tier increased.
    SpreadTierUpgraded {
        /// New tier.
        tier: u8,
    },
    /// The boss entered the arena.
    BossEntered {
        /// Boss health at entry.
        max_hp: u32,
    },
    /// The boss crossed a health threshold.
    BossPhaseChanged {
        /// Phase on the healthy side of the crossed threshold.
        from: BossPhase,
        /// Phase entered by crossing it.
        to: BossPhase,
    },
    /// The boss started telegraphing its next attack.
    BossAttackTelegraphed {
        /// Attack about to fire.
        pattern: AttackPattern,
    },
    /// The boss fired an attack.
    BossAttackFired {
        /// Attack that fired.
        pattern: AttackPattern,
        /// Phase the boss was in.
        phase: BossPhase,
    },
    /// The boss ran out of health.
    BossDefeated,
    /// A special enemy appeared and started telegraphing.
    SpecialSpawned {
        /// Identifier of the special.
        id: u32,
        /// Kind of special.
        kind: SpecialKind,
    },
    /// A special finished telegraphing and started diving.
    SpecialDiving {
        /// Identifier of the special.
        id: u32,
    },
    /// A Moshpit zone was fully collected.
    ZoneCompleted {
        /// Zone identifier.
        zone: u32,
        /// Completions of this zone including this one.
        completions: u32,
        /// Bonus awarded.
        bonus: u32,
    },
    /// A completed Moshpit zone refilled.
    ZoneRespawned {
        /// Zone identifier.
        zone: u32,
    },
    /// A zone crossed a completion milestone.
    ZoneMilestone {
        /// Zone identifier.
        zone: u32,
        /// Milestone percentage (25, 50, 75 or 100).
        percent: u8,
    },
    /// The Rhythm Serpent music changed phase.
    AudioStateChanged {
        /// Previous phase.
        from: AudioState,
        /// New phase.
        to: AudioState,
    },
}
