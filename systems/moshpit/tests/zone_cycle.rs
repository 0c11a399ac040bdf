use pretty_assertions::assert_eq;
use triathlon_core::Event;
use triathlon_system_moshpit::{
    active_mosher_count, compute_active_layers, guard_step_ms, MusicConfig, PacingConfig,
    ZoneConfig, ZoneTracker,
};

const FRAME_MS: f64 = 250.0;

#[derive(Debug, PartialEq)]
struct StageOutcome {
    events: Vec<Event>,
    score: u32,
    stingers: u32,
    mosher_counts: Vec<u32>,
    layers: Vec<u8>,
}

/// Sweeps zones round robin, collecting one tile every frame.
fn play(frames: u32) -> StageOutcome {
    let pacing = PacingConfig::default();
    let music = MusicConfig::default();
    let mut tracker = ZoneTracker::new(&[4, 6, 8], ZoneConfig::default());
    let mut events = Vec::new();
    let mut score = 0;
    let mut stingers = 0;
    let mut mosher_counts = Vec::new();
    let mut layers = Vec::new();

    for frame in 0..frames {
        let now_ms = f64::from(frame) * FRAME_MS;
        let zone = frame % 3;
        if let Some(bonus) = tracker.collect(zone, now_ms, &mut events) {
            score += bonus;
        }
        stingers += tracker.update(now_ms, &mut events);
        mosher_counts.push(active_mosher_count(tracker.total_completions(), &pacing));
        layers.push(compute_active_layers(tracker.average_completion(), false, &music));
    }

    StageOutcome {
        events,
        score,
        stingers,
        mosher_counts,
        layers,
    }
}

#[test]
fn zone_cycle_replays_identically() {
    assert_eq!(play(240), play(240));
}

#[test]
fn completions_escalate_moshers_and_pay_decaying_bonuses() {
    let outcome = play(240);

    let bonuses: Vec<(u32, u32, u32)> = outcome
        .events
        .iter()
        .filter_map(|event| match event {
            Event::ZoneCompleted {
                zone,
                completions,
                bonus,
            } => Some((*zone, *completions, *bonus)),
            _ => None,
        })
        .collect();

    let first_small_zone: Vec<u32> = bonuses
        .iter()
        .filter(|(zone, _, _)| *zone == 0)
        .map(|(_, _, bonus)| *bonus)
        .collect();
    assert!(first_small_zone.len() >= 3);
    assert_eq!(&first_small_zone[..3], &[30, 24, 24]);

    assert_eq!(outcome.mosher_counts.first(), Some(&1));
    assert_eq!(outcome.mosher_counts.last(), Some(&3));
    assert!(outcome.mosher_counts.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(
        outcome.score,
        bonuses.iter().map(|(_, _, bonus)| bonus).sum::<u32>()
    );
    assert!(outcome.stingers >= 12);
    assert!(outcome.layers.iter().all(|layer| (1..=5).contains(layer)));
}

#[test]
fn frightened_guards_are_always_slower() {
    let pacing = PacingConfig::default();
    for level in 1..10 {
        for completions in 0..12 {
            assert!(
                guard_step_ms(level, completions, true, &pacing)
                    > guard_step_ms(level, completions, false, &pacing)
            );
        }
    }
}
