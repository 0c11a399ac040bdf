//! Commit-unlock rules shared by every stage.

use serde::{Deserialize, Serialize};
use triathlon_core::Stage;

/// Stage time after which commit always unlocks.
pub const COMMIT_UNLOCK_MS: u64 = 60_000;

/// Reports whether a stage attempt has earned the right to commit.
///
/// Surviving a full minute unlocks commit, and so does an attempt that ended
/// before the minute was up.
#[must_use]
pub fn is_commit_unlock_eligible(elapsed_ms: u64, stage_ended: bool) -> bool {
    elapsed_ms >= COMMIT_UNLOCK_MS || (stage_ended && elapsed_ms < COMMIT_UNLOCK_MS)
}

/// Stage clock snapshot used to build the stage menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOptionsInput {
    /// Time spent in the current attempt.
    pub elapsed_ms: u64,
    /// Whether the attempt has ended.
    pub stage_ended: bool,
}

/// Choices offered to the player for the current stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOptions {
    /// Whether the stage can be banked now.
    pub can_commit: bool,
    /// Whether the stage can be restarted now.
    pub can_retry: bool,
    /// Time left until the shared rule unlocks commit.
    pub commit_unlock_in_ms: u64,
}

/// Evaluates the shared sixty-second rule for the stage menu.
#[must_use]
pub fn compute_stage_options(input: StageOptionsInput) -> StageOptions {
    StageOptions {
        can_commit: is_commit_unlock_eligible(input.elapsed_ms, input.stage_ended),
        can_retry: input.stage_ended,
        commit_unlock_in_ms: COMMIT_UNLOCK_MS.saturating_sub(input.elapsed_ms),
    }
}

/// Per-stage variant of the commit rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRule {
    /// Stage the rule applies to.
    pub stage: Stage,
    /// Whether finishing the stage objective unlocks commit early.
    pub objective_unlocks: bool,
}

impl StageRule {
    /// Rule used by `stage`.
    ///
    /// Amp Invaders unlocks when the boss falls and Moshpit when every zone
    /// has been cleared once. Rhythm Serpent has no objective shortcut.
    #[must_use]
    pub const fn for_stage(stage: Stage) -> Self {
        let objective_unlocks = match stage {
            Stage::RhythmSerpent => false,
            Stage::Moshpit | Stage::AmpInvaders => true,
        };
        Self {
            stage,
            objective_unlocks,
        }
    }

    /// Applies the shared rule plus the stage objective shortcut.
    #[must_use]
    pub fn is_unlocked(&self, elapsed_ms: u64, stage_ended: bool, objective_complete: bool) -> bool {
        is_commit_unlock_eligible(elapsed_ms, stage_ended)
            || (self.objective_unlocks && objective_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_unlocks_at_sixty_seconds() {
        let locked = compute_stage_options(StageOptionsInput {
            elapsed_ms: 59_000,
            stage_ended: false,
        });
        assert!(!locked.can_commit);
        assert_eq!(locked.commit_unlock_in_ms, 1_000);

        let unlocked = compute_stage_options(StageOptionsInput {
            elapsed_ms: 60_000,
            stage_ended: false,
        });
        assert!(unlocked.can_commit);
        assert_eq!(unlocked.commit_unlock_in_ms, 0);
    }

    #[test]
    fn early_death_unlocks_commit() {
        let options = compute_stage_options(StageOptionsInput {
            elapsed_ms: 12_000,
            stage_ended: true,
        });
        assert!(options.can_commit);
        assert!(options.can_retry);
    }

    #[test]
    fn objective_shortcut_is_stage_specific() {
        let serpent = StageRule::for_stage(Stage::RhythmSerpent);
        let invaders = StageRule::for_stage(Stage::AmpInvaders);
        assert!(!serpent.is_unlocked(30_000, false, true));
        assert!(invaders.is_unlocked(30_000, false, true));
        assert!(!invaders.is_unlocked(30_000, false, false));
    }
}
