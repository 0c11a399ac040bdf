#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run-flow state for the Arcade Triathlon.
//!
//! The run flow owns the stage index, the per-stage clock, the raw score of
//! the attempt in progress, the commit flags and the banked results. Banks are
//! written only when advancing past a stage; retrying a stage resets its clock
//! and raw score but never touches commit flags or banks.

use std::time::Duration;

use tracing::debug;
use triathlon_core::{Command, Event, RunConfig, Stage, STAGE_COUNT, WELCOME_BANNER};
use triathlon_system_scoring::{is_commit_unlock_eligible, StageRule};

/// Represents the authoritative run-flow state.
#[derive(Clone, Debug)]
pub struct FlowState {
    banner: &'static str,
    current_stage: Stage,
    elapsed_in_stage: Duration,
    stage_raw: f64,
    stage_ended: bool,
    commit_unlocked_by_stage: [bool; STAGE_COUNT],
    banked_raw: [f64; STAGE_COUNT],
    banked_tri: [u64; STAGE_COUNT],
    run_left: Duration,
    run_over: bool,
    completed: bool,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new(&RunConfig::default())
    }
}

impl FlowState {
    /// Creates the run flow for a fresh run.
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            current_stage: Stage::RhythmSerpent,
            elapsed_in_stage: Duration::ZERO,
            stage_raw: 0.0,
            stage_ended: false,
            commit_unlocked_by_stage: [false; STAGE_COUNT],
            banked_raw: [0.0; STAGE_COUNT],
            banked_tri: [0; STAGE_COUNT],
            run_left: config.run_duration(),
            run_over: false,
            completed: false,
        }
    }

    /// Unlocks commit for the current stage when the attempt qualifies.
    ///
    /// Returns `true` only when the flag flipped during this call. The flag is
    /// never cleared by this method.
    pub fn mark_commit_unlocked_if_eligible(&mut self, stage_ended: bool) -> bool {
        let index = self.current_stage.index();
        if self.commit_unlocked_by_stage[index] {
            return false;
        }
        if !is_commit_unlocked_now(self.elapsed_in_stage, stage_ended) {
            return false;
        }
        self.commit_unlocked_by_stage[index] = true;
        true
    }

    /// Returns the stored commit flag of the current stage.
    ///
    /// This is not recomputed from the stage clock, so a stage that unlocked
    /// early stays committable after a retry resets the clock.
    #[must_use]
    pub fn can_commit_now(&self) -> bool {
        self.commit_unlocked_by_stage[self.current_stage.index()]
    }

    /// Restarts the current stage attempt.
    pub fn retry_stage(&mut self) {
        self.elapsed_in_stage = Duration::ZERO;
        self.stage_raw = 0.0;
        self.stage_ended = false;
    }

    /// Banks the current stage and enters the next one.
    ///
    /// Advancing from the last stage banks it and marks the run completed
    /// without moving the index. Entering a stage always starts with commit
    /// locked for that stage.
    pub fn advance_stage(&mut self, tri_points: u64) -> Option<Stage> {
        let from = self.current_stage;
        let index = from.index();
        self.banked_raw[index] = self.stage_raw;
        self.banked_tri[index] = tri_points;
        self.elapsed_in_stage = Duration::ZERO;
        self.stage_raw = 0.0;
        self.stage_ended = false;

        match from.next() {
            Some(next) => {
                self.current_stage = next;
                self.commit_unlocked_by_stage[next.index()] = false;
                Some(next)
            }
            None => {
                self.completed = true;
                None
            }
        }
    }

    fn add_stage_score(&mut self, points: f64) {
        if !points.is_finite() {
            return;
        }
        self.stage_raw = (self.stage_raw + points).max(0.0);
    }

    fn is_accepting_commands(&self) -> bool {
        !self.run_over && !self.completed
    }
}

fn is_commit_unlocked_now(elapsed: Duration, stage_ended: bool) -> bool {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    is_commit_unlock_eligible(elapsed_ms, stage_ended)
}

/// Applies the provided command to the run flow, mutating state deterministically.
pub fn apply(state: &mut FlowState, command: Command, out_events: &mut Vec<Event>) {
    if !state.is_accepting_commands() {
        debug!(?command, "run finished, ignoring command");
        return;
    }

    match command {
        Command::Tick { dt } => {
            let dt = dt.min(state.run_left);
            state.elapsed_in_stage = state.elapsed_in_stage.saturating_add(dt);
            state.run_left = state.run_left.saturating_sub(dt);
            out_events.push(Event::TimeAdvanced { dt });

            if state.mark_commit_unlocked_if_eligible(state.stage_ended) {
                debug!(stage = ?state.current_stage, "commit unlocked by stage clock");
                out_events.push(Event::CommitUnlocked {
                    stage: state.current_stage,
                });
            }

            if state.run_left.is_zero() {
                state.run_over = true;
                debug!("run clock exhausted");
                out_events.push(Event::RunEnded);
            }
        }
        Command::AddStageScore { points } => {
            if state.stage_ended {
                debug!(points, "stage attempt over, ignoring score");
                return;
            }
            state.add_stage_score(points);
        }
        Command::EndStage => {
            state.stage_ended = true;
            if state.mark_commit_unlocked_if_eligible(true) {
                debug!(stage = ?state.current_stage, "commit unlocked by stage end");
                out_events.push(Event::CommitUnlocked {
                    stage: state.current_stage,
                });
            }
        }
        Command::CompleteObjective => {
            let rule = StageRule::for_stage(state.current_stage);
            let index = state.current_stage.index();
            if rule.objective_unlocks && !state.commit_unlocked_by_stage[index] {
                state.commit_unlocked_by_stage[index] = true;
                debug!(stage = ?state.current_stage, "commit unlocked by objective");
                out_events.push(Event::CommitUnlocked {
                    stage: state.current_stage,
                });
            }
        }
        Command::RetryStage => {
            state.retry_stage();
            out_events.push(Event::StageRetried {
                stage: state.current_stage,
            });
        }
        Command::AdvanceStage { tri_points } => {
            if !state.can_commit_now() {
                debug!(stage = ?state.current_stage, "commit still locked, ignoring advance");
                return;
            }

            let from = state.current_stage;
            let banked_raw = state.stage_raw;
            match state.advance_stage(tri_points) {
                Some(to) => {
                    debug!(?from, ?to, banked_raw, tri_points, "stage banked");
                    out_events.push(Event::StageAdvanced {
                        from,
                        to,
                        banked_raw,
                        banked_tri: tri_points,
                    });
                }
                None => {
                    debug!(?from, banked_raw, tri_points, "final stage banked");
                    out_events.push(Event::RunCompleted);
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the run flow.
pub mod query {
    use std::time::Duration;

    use super::FlowState;
    use triathlon_core::{Stage, STAGE_COUNT};
    use triathlon_system_scoring::{FinalScoreInput, StageOptions, COMMIT_UNLOCK_MS};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(state: &FlowState) -> &'static str {
        state.banner
    }

    /// Stage currently being played.
    #[must_use]
    pub fn current_stage(state: &FlowState) -> Stage {
        state.current_stage
    }

    /// Time spent in the current stage attempt.
    #[must_use]
    pub fn elapsed_in_stage(state: &FlowState) -> Duration {
        state.elapsed_in_stage
    }

    /// Raw score of the current stage attempt.
    #[must_use]
    pub fn stage_raw(state: &FlowState) -> f64 {
        state.stage_raw
    }

    /// Stored commit flag of the current stage.
    #[must_use]
    pub fn can_commit_now(state: &FlowState) -> bool {
        state.can_commit_now()
    }

    /// Commit flags for every stage.
    #[must_use]
    pub fn commit_unlocked_by_stage(state: &FlowState) -> [bool; STAGE_COUNT] {
        state.commit_unlocked_by_stage
    }

    /// Menu options for the current stage.
    #[must_use]
    pub fn stage_options(state: &FlowState) -> StageOptions {
        let elapsed_ms = u64::try_from(state.elapsed_in_stage.as_millis()).unwrap_or(u64::MAX);
        StageOptions {
            can_commit: state.can_commit_now(),
            can_retry: state.stage_ended && !state.run_over,
            commit_unlock_in_ms: COMMIT_UNLOCK_MS.saturating_sub(elapsed_ms),
        }
    }

    /// Raw scores banked so far.
    #[must_use]
    pub fn banked_raw(state: &FlowState) -> [f64; STAGE_COUNT] {
        state.banked_raw
    }

    /// Tri-points banked so far.
    #[must_use]
    pub fn banked_tri(state: &FlowState) -> [u64; STAGE_COUNT] {
        state.banked_tri
    }

    /// Time left on the run clock.
    #[must_use]
    pub fn run_time_left(state: &FlowState) -> Duration {
        state.run_left
    }

    /// Whether the run clock reached zero.
    #[must_use]
    pub fn is_run_over(state: &FlowState) -> bool {
        state.run_over
    }

    /// Whether the final stage was banked.
    #[must_use]
    pub fn is_completed(state: &FlowState) -> bool {
        state.completed
    }

    /// Builds the final score input from the banked tri-points.
    #[must_use]
    pub fn final_score_input(state: &FlowState, boss_defeated: bool) -> FinalScoreInput {
        FinalScoreInput {
            stage_scores: state.banked_tri.map(|points| points as f64),
            run_ms_left: state.run_left.as_secs_f64() * 1_000.0,
            completed_all_stages: state.completed,
            boss_defeated,
        }
    }
}
