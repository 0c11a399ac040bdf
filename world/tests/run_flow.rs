use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use triathlon_core::{Command, Event, RunConfig, Stage};
use triathlon_world::{self as world, query, FlowState};

fn tick(state: &mut FlowState, millis: u64, events: &mut Vec<Event>) {
    world::apply(
        state,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        events,
    );
}

#[test]
fn commit_unlocks_after_a_minute_of_play() {
    let mut state = FlowState::default();
    let mut events = Vec::new();

    tick(&mut state, 59_000, &mut events);
    assert!(!query::stage_options(&state).can_commit);

    tick(&mut state, 1_000, &mut events);
    assert!(query::stage_options(&state).can_commit);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::CommitUnlocked { .. }))
            .count(),
        1,
        "commit unlock must be announced once",
    );
}

#[test]
fn early_death_unlock_persists_through_retry() {
    let mut state = FlowState::default();
    let mut events = Vec::new();

    tick(&mut state, 12_000, &mut events);
    world::apply(&mut state, Command::EndStage, &mut events);
    assert!(query::can_commit_now(&state));

    world::apply(&mut state, Command::RetryStage, &mut events);
    assert_eq!(query::elapsed_in_stage(&state), Duration::ZERO);
    assert_eq!(query::stage_raw(&state), 0.0);
    assert!(query::can_commit_now(&state), "retry must not relock commit");
    assert_eq!(query::banked_tri(&state), [0, 0, 0]);
}

#[test]
fn advance_is_ignored_while_commit_is_locked() {
    let mut state = FlowState::default();
    let mut events = Vec::new();

    world::apply(&mut state, Command::AddStageScore { points: 300.0 }, &mut events);
    world::apply(&mut state, Command::AdvanceStage { tri_points: 300 }, &mut events);

    assert_eq!(query::current_stage(&state), Stage::RhythmSerpent);
    assert_eq!(query::stage_raw(&state), 300.0);
    assert!(events.is_empty());
}

#[test]
fn advancing_banks_scores_and_locks_the_next_stage() {
    let mut state = FlowState::default();
    let mut events = Vec::new();

    world::apply(&mut state, Command::AddStageScore { points: 512.5 }, &mut events);
    world::apply(&mut state, Command::EndStage, &mut events);
    world::apply(&mut state, Command::AdvanceStage { tri_points: 513 }, &mut events);

    assert_eq!(query::current_stage(&state), Stage::Moshpit);
    assert_eq!(query::banked_raw(&state)[0], 512.5);
    assert_eq!(query::banked_tri(&state)[0], 513);
    assert!(!query::can_commit_now(&state));
    assert!(events.contains(&Event::StageAdvanced {
        from: Stage::RhythmSerpent,
        to: Stage::Moshpit,
        banked_raw: 512.5,
        banked_tri: 513,
    }));
}

#[test]
fn objective_unlock_only_applies_to_objective_stages() {
    let mut state = FlowState::default();
    let mut events = Vec::new();

    world::apply(&mut state, Command::CompleteObjective, &mut events);
    assert!(!query::can_commit_now(&state));

    world::apply(&mut state, Command::EndStage, &mut events);
    world::apply(&mut state, Command::AdvanceStage { tri_points: 10 }, &mut events);
    world::apply(&mut state, Command::CompleteObjective, &mut events);
    assert!(query::can_commit_now(&state));
}

#[test]
fn run_clock_exhaustion_ends_the_run_once() {
    let config = RunConfig::from_query("runMinutes=1").expect("config");
    let mut state = FlowState::new(&config);
    let mut events = Vec::new();

    tick(&mut state, 45_000, &mut events);
    tick(&mut state, 45_000, &mut events);
    tick(&mut state, 45_000, &mut events);

    assert!(query::is_run_over(&state));
    assert_eq!(query::run_time_left(&state), Duration::ZERO);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::RunEnded))
            .count(),
        1
    );
    assert_eq!(query::elapsed_in_stage(&state), Duration::from_secs(60));
}

#[test]
fn score_after_stage_end_is_ignored_until_retry() {
    let mut state = FlowState::default();
    let mut events = Vec::new();

    world::apply(&mut state, Command::AddStageScore { points: 75.0 }, &mut events);
    world::apply(&mut state, Command::EndStage, &mut events);
    world::apply(&mut state, Command::AddStageScore { points: 500.0 }, &mut events);
    assert_eq!(query::stage_raw(&state), 75.0);

    world::apply(&mut state, Command::RetryStage, &mut events);
    world::apply(&mut state, Command::AddStageScore { points: 30.0 }, &mut events);
    assert_eq!(query::stage_raw(&state), 30.0);
}

#[test]
fn final_stage_completion_feeds_final_score() {
    let mut state = FlowState::default();
    let mut events = Vec::new();

    for tri in [400, 500, 600] {
        world::apply(&mut state, Command::EndStage, &mut events);
        world::apply(&mut state, Command::AdvanceStage { tri_points: tri }, &mut events);
    }

    assert!(query::is_completed(&state));
    assert_eq!(events.last(), Some(&Event::RunCompleted));

    let input = query::final_score_input(&state, true);
    assert_eq!(input.stage_scores, [400.0, 500.0, 600.0]);
    assert!(input.completed_all_stages);
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.banked_tri, [90, 1_200, 0]);
    assert_eq!(first.stage, Stage::AmpInvaders);
    assert_ne!(first.fingerprint(), 0);
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut state = FlowState::default();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut state, command, &mut events);
        log.extend(events.iter().map(|event| format!("{event:?}")));
    }

    ReplayOutcome {
        stage: query::current_stage(&state),
        banked_tri: query::banked_tri(&state),
        run_left: query::run_time_left(&state),
        log,
    }
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::Tick {
            dt: Duration::from_secs(20),
        },
        Command::AddStageScore { points: 90.0 },
        Command::EndStage,
        Command::RetryStage,
        Command::Tick {
            dt: Duration::from_secs(5),
        },
        Command::AddStageScore { points: 40.0 },
        Command::AdvanceStage { tri_points: 90 },
        Command::Tick {
            dt: Duration::from_secs(61),
        },
        Command::AddStageScore { points: 1_200.0 },
        Command::AdvanceStage { tri_points: 1_200 },
        Command::Tick {
            dt: Duration::from_secs(3),
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    stage: Stage,
    banked_tri: [u64; 3],
    run_left: Duration,
    log: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
