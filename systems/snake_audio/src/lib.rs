#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive music director for the Rhythm Serpent stage.
//!
//! The director turns a rolling performance sample into a narrative music
//! phase. It only reconsiders the phase on 8-bar boundaries, never falls back
//! to a phase it already passed, and plays the drop at most once per life.

mod director;
mod energy;

pub use director::{SnakeAudioDirector, BOUNDARY_STEPS};
pub use energy::{compute_energy_index, AudioDirectorConfig, AudioSample, EnergyWeights};
