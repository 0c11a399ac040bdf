use pretty_assertions::assert_eq;
use triathlon_system_leaderboard::{
    format_entry_line, InMemoryBackend, LeaderboardBackend, LeaderboardEntry, LeaderboardStore,
};
use triathlon_system_scoring::{compute_final_score, FinalScoreInput};

#[test]
fn final_scores_flow_from_run_to_board() {
    let mut store = LeaderboardStore::new(InMemoryBackend::new());
    let runs = [
        ("amy", [1_200.0, 900.0, 2_100.0], 130_000.0),
        ("bo!b", [800.0, 700.0, 600.0], 20_000.0),
        ("cal", [1_200.0, 900.0, 2_100.0], 130_000.0),
    ];

    for (player, stage_scores, run_ms_left) in runs {
        let score = compute_final_score(&FinalScoreInput {
            stage_scores,
            run_ms_left,
            completed_all_stages: true,
            boss_defeated: true,
        });
        let _ = store
            .submit(LeaderboardEntry::from_final_score(player, &score))
            .expect("stored");
    }

    let mut fresh = LeaderboardStore::new(store.backend().clone());
    fresh.hydrate().expect("hydrate");
    assert!(fresh.is_hydrated());

    let lines: Vec<String> = fresh
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| format_entry_line(index + 1, entry))
        .collect();
    assert_eq!(
        lines,
        vec![
            " 1. AMY  5.4K".to_owned(),
            " 2. CAL  5.4K".to_owned(),
            " 3. BOB  2.1K".to_owned(),
        ]
    );

    let remote = store.backend().fetch(Some(2)).expect("fetch");
    assert_eq!(remote.len(), 2);
    assert_eq!(remote[0].initials, "AMY");
    assert_eq!(remote[0].stage3, 2_100);
}
