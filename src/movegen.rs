//! The move generator: enumerates every valid move for the current
//! player, plus a fast single-tile-only variant for the estimator's
//! playout loop.

use std::collections::HashSet;

use crate::board::{Board, Position};
use crate::game::GameState;
use crate::rules::{can_form_valid_line, is_valid_single_placement, score_move, validate_move};
use crate::tile::Tile;

/// A fully-scored candidate move: an ordered placement list plus the score
/// it would earn if played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub placements: Vec<(Position, Tile)>,
    pub score: i32,
}

/// Once a move scores at least this much, a Qwirkle has been found (6 for
/// the line plus the 6 bonus) and enumeration stops early.
const QWIRKLE_SCORE_THRESHOLD: i32 = 12;

/// Empty cells orthogonally adjacent to an occupied cell — or just the
/// origin, on an empty board.
pub fn candidate_positions(board: &Board) -> Vec<Position> {
    if board.is_empty() {
        return vec![Position::ORIGIN];
    }
    let mut set = HashSet::new();
    for p in board.positions() {
        for n in p.neighbors() {
            if !board.has(n) {
                set.insert(n);
            }
        }
    }
    let mut positions: Vec<Position> = set.into_iter().collect();
    positions.sort_by_key(|p| (p.row, p.col));
    positions
}

/// Enumerates every valid move for the current player, sorted by score
/// descending.
///
/// Hand subsets are tried largest-to-smallest (bigger subsets tend to
/// score higher, so an early Qwirkle prunes the rest of the search).
/// Each subset is pre-filtered with [`can_form_valid_line`] before any
/// position or permutation work happens. Permutations of a subset's tile
/// values are deduplicated across subsets via a base-36 positional hash —
/// a hand holding two copies of the same tile produces many slot-index
/// subsets that collapse to the same tile-value sequence, and the hash
/// lets the second and later occurrences short-circuit before any
/// placement is attempted.
pub fn generate_all_moves(state: &GameState) -> Vec<Move> {
    let hand = state.current_hand();
    let candidates = candidate_positions(&state.board);
    let n = hand.size();
    if n == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut moves: Vec<Move> = Vec::new();
    let mut best_score = 0i32;
    let mut seen_permutations: HashSet<u64> = HashSet::new();
    let mut work_board = state.board.clone();

    'sizes: for size in (1..=n).rev() {
        for mask in subsets_of_size(n, size) {
            let subset_tiles: Vec<Tile> =
                (0..n).filter(|i| mask & (1 << i) != 0).map(|i| hand.get(i).unwrap()).collect();

            if !can_form_valid_line(&subset_tiles) {
                continue;
            }

            if size == 1 {
                let tile = subset_tiles[0];
                for &pos in &candidates {
                    if is_valid_single_placement(&mut work_board, pos, tile) {
                        let placements = vec![(pos, tile)];
                        let score = score_move(&mut work_board, &placements);
                        record(&mut moves, &mut best_score, Move { placements, score });
                    }
                }
            } else {
                for perm in permutations(&subset_tiles) {
                    if !seen_permutations.insert(positional_hash(&perm)) {
                        continue;
                    }
                    for &start in &candidates {
                        try_line(&mut work_board, &perm, start, true, &mut moves, &mut best_score);
                        try_line(&mut work_board, &perm, start, false, &mut moves, &mut best_score);
                    }
                }
            }

            if best_score >= QWIRKLE_SCORE_THRESHOLD {
                break 'sizes;
            }
        }
    }

    moves.sort_by(|a, b| b.score.cmp(&a.score));
    moves
}

/// Single-tile-only variant used by the Monte Carlo estimator: every
/// (tile, candidate position) pair, no subset enumeration, no
/// permutations. `O(hand × candidates)`.
pub fn generate_fast_move(state: &GameState) -> Option<Move> {
    let hand = state.current_hand();
    let candidates = candidate_positions(&state.board);
    let mut work_board = state.board.clone();
    let mut best: Option<Move> = None;

    for &tile in hand.tiles_unsafe() {
        for &pos in &candidates {
            if is_valid_single_placement(&mut work_board, pos, tile) {
                let placements = vec![(pos, tile)];
                let score = score_move(&mut work_board, &placements);
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(Move { placements, score });
                }
            }
        }
    }
    best
}

/// Tries placing `perm` starting at `start`, running along a row
/// (`horizontal`) or a column. Skips immediately if any of the `perm.len()`
/// positions is already occupied.
fn try_line(
    board: &mut Board,
    perm: &[Tile],
    start: Position,
    horizontal: bool,
    moves: &mut Vec<Move>,
    best_score: &mut i32,
) {
    let positions: Vec<Position> = (0..perm.len())
        .map(|i| {
            if horizontal {
                Position::new(start.row, start.col + i as i32)
            } else {
                Position::new(start.row + i as i32, start.col)
            }
        })
        .collect();
    if positions.iter().any(|p| board.has(*p)) {
        return;
    }
    let placements: Vec<(Position, Tile)> = positions.into_iter().zip(perm.iter().copied()).collect();
    if !validate_move(board, &placements) {
        return;
    }
    let score = score_move(board, &placements);
    record(moves, best_score, Move { placements, score });
}

fn record(moves: &mut Vec<Move>, best_score: &mut i32, mv: Move) {
    if mv.score > *best_score {
        *best_score = mv.score;
    }
    moves.push(mv);
}

/// All `n`-bit masks with exactly `k` bits set. `n ≤ 6` keeps this cheap
/// enough to brute force rather than building subsets combinatorially.
fn subsets_of_size(n: usize, k: usize) -> Vec<usize> {
    (1..(1usize << n)).filter(|m| m.count_ones() as usize == k).collect()
}

/// All permutations of `tiles` (guaranteed pairwise-distinct by the
/// `can_form_valid_line` pre-filter for subsets of size ≥ 2).
fn permutations(tiles: &[Tile]) -> Vec<Vec<Tile>> {
    let mut result = Vec::new();
    let mut current = tiles.to_vec();
    permute(&mut current, 0, &mut result);
    result
}

fn permute(arr: &mut Vec<Tile>, k: usize, result: &mut Vec<Vec<Tile>>) {
    if k == arr.len() {
        result.push(arr.clone());
        return;
    }
    for i in k..arr.len() {
        arr.swap(k, i);
        permute(arr, k + 1, result);
        arr.swap(k, i);
    }
}

/// Base-36 positional hash of an ordered tile sequence: `sum(index_i *
/// 36^i)`. Equal permutations (same tile values in the same order) collapse
/// to the same key regardless of which hand slots produced them.
fn positional_hash(perm: &[Tile]) -> u64 {
    let mut hash: u64 = 0;
    let mut multiplier: u64 = 1;
    for t in perm {
        hash += t.index() as u64 * multiplier;
        multiplier *= 36;
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Hand;

    #[test]
    fn empty_board_candidates_is_just_origin() {
        let board = Board::new();
        assert_eq!(candidate_positions(&board), vec![Position::ORIGIN]);
    }

    #[test]
    fn first_move_generates_moves_for_every_hand_tile() {
        let mut state = GameState::new(42);
        state.hands[0] = Hand::new();
        state.hands[0].add([Tile::new(0, 0), Tile::new(1, 1)]);
        let moves = generate_all_moves(&state);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.placements[0].0 == Position::ORIGIN));
    }

    #[test]
    fn generated_moves_are_sorted_descending_by_score() {
        let mut state = GameState::new(3);
        state.board.set(Position::new(0, 0), Tile::new(0, 0));
        state.board.set(Position::new(0, 1), Tile::new(1, 0));
        state.hands[0] = Hand::new();
        state.hands[0].add([Tile::new(2, 0), Tile::new(5, 5)]);
        let moves = generate_all_moves(&state);
        for w in moves.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }

    #[test]
    fn fast_move_never_beats_best_of_full_generation() {
        let mut state = GameState::new(9);
        state.board.set(Position::new(0, 0), Tile::new(0, 0));
        state.hands[0] = Hand::new();
        state.hands[0].add([Tile::new(1, 0), Tile::new(2, 0), Tile::new(0, 1)]);
        let all = generate_all_moves(&state);
        let fast = generate_fast_move(&state);
        if let Some(fast_move) = fast {
            let best_all = all.first().map(|m| m.score).unwrap_or(0);
            assert!(fast_move.score <= best_all);
        }
    }

    #[test]
    fn duplicate_hand_slots_do_not_produce_duplicate_permutation_work() {
        // Two slots holding the same tile value must not double-count a
        // permutation via the positional hash dedup.
        let mut state = GameState::new(21);
        state.hands[0] = Hand::new();
        state.hands[0].add([Tile::new(0, 0), Tile::new(0, 0), Tile::new(1, 0)]);
        let moves = generate_all_moves(&state);
        assert!(!moves.is_empty());
    }
}
