//! The rules kernel: line extraction, line validity, placement validity for
//! single and multi-tile moves, and scoring.
//!
//! Hot paths (`extract_line_fixed`, `is_valid_single_placement`,
//! `score_move`) never allocate: line contents live in a fixed 7-slot
//! [`LineBuffer`] and duplicate checks use a 36-slot boolean table keyed by
//! dense tile index.

use std::collections::HashSet;

use crate::board::{Board, Position};
use crate::hand::HAND_CAPACITY;
use crate::tile::Tile;

/// Capacity of the zero-allocation line buffer. One more than the longest
/// legal line (6), so a 7-tile run is still representable and rejected by
/// [`is_valid_line`] rather than silently truncated into a false positive.
pub const LINE_BUFFER_CAPACITY: usize = 7;

/// Row-wise or column-wise: the two axes a line can run along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    fn step(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        }
    }
}

/// A stack-allocated, fixed-capacity view of a line's tiles, used by hot
/// paths that cannot afford a heap allocation per line.
#[derive(Debug, Clone, Copy)]
pub struct LineBuffer {
    tiles: [Tile; LINE_BUFFER_CAPACITY],
    len: usize,
}

impl LineBuffer {
    fn empty() -> Self {
        LineBuffer { tiles: [Tile::new(0, 0); LINE_BUFFER_CAPACITY], len: 0 }
    }

    fn push(&mut self, tile: Tile) {
        if self.len < LINE_BUFFER_CAPACITY {
            self.tiles[self.len] = tile;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles[..self.len]
    }
}

/// Walks the maximal contiguous run of occupied cells through `pos` along
/// `dir`, feeding each tile (in line order) to `push`. An unoccupied `pos`
/// yields an empty line, per spec: length 0 includes the center.
fn walk_line(board: &Board, pos: Position, dir: Direction, mut push: impl FnMut(Tile)) {
    if !board.has(pos) {
        return;
    }
    let step = dir.step();
    let mut start = pos;
    loop {
        let prev = Position::new(start.row - step.0, start.col - step.1);
        if board.has(prev) {
            start = prev;
        } else {
            break;
        }
    }
    let mut cur = start;
    while let Some(t) = board.get(cur) {
        push(t);
        cur = Position::new(cur.row + step.0, cur.col + step.1);
    }
}

/// The topmost (vertical) or leftmost (horizontal) position of the line
/// through `pos`. Used as half of the dedup key when scoring.
fn line_start(board: &Board, pos: Position, dir: Direction) -> Position {
    let step = dir.step();
    let mut start = pos;
    loop {
        let prev = Position::new(start.row - step.0, start.col - step.1);
        if board.has(prev) {
            start = prev;
        } else {
            return start;
        }
    }
}

/// Allocating line extraction for general callers (hints, UI, tests).
pub fn extract_line_alloc(board: &Board, pos: Position, dir: Direction) -> Vec<Tile> {
    let mut v = Vec::new();
    walk_line(board, pos, dir, |t| v.push(t));
    v
}

/// Zero-allocation line extraction for hot paths (move generation, the
/// estimator's playout loop).
pub fn extract_line_fixed(board: &Board, pos: Position, dir: Direction) -> LineBuffer {
    let mut buf = LineBuffer::empty();
    walk_line(board, pos, dir, |t| buf.push(t));
    buf
}

/// A sequence of tiles is a valid line iff it has length ≤ 1, or length ≤ 6
/// with no repeated tile index and either all one color or all one shape.
pub fn is_valid_line(tiles: &[Tile]) -> bool {
    if tiles.len() <= 1 {
        return true;
    }
    if tiles.len() > 6 {
        return false;
    }
    let mut seen = [false; 36];
    for t in tiles {
        if seen[t.index()] {
            return false;
        }
        seen[t.index()] = true;
    }
    let first = tiles[0];
    tiles.iter().all(|t| t.color == first.color) || tiles.iter().all(|t| t.shape == first.shape)
}

/// Whether an unordered hand subset could, in principle, form a valid line
/// if placed together — the move generator's pre-filter before it bothers
/// enumerating positions and permutations. Identical test to
/// [`is_valid_line`]; named separately because it is applied to a subset of
/// tiles in hand, not to tiles already read off the board.
pub fn can_form_valid_line(tiles: &[Tile]) -> bool {
    is_valid_line(tiles)
}

/// Validates a single placement at an empty position using the
/// place/check/remove pattern: the tile is set, both lines through it are
/// checked, and it is always removed again before returning.
pub fn is_valid_single_placement(board: &mut Board, pos: Position, tile: Tile) -> bool {
    if board.has(pos) {
        return false;
    }
    if board.is_empty() {
        if pos != Position::ORIGIN {
            return false;
        }
    } else if !board.has_neighbor(pos) {
        return false;
    }

    board.set(pos, tile);
    let h = extract_line_fixed(board, pos, Direction::Horizontal);
    let v = extract_line_fixed(board, pos, Direction::Vertical);
    let valid = is_valid_line(h.as_slice()) && is_valid_line(v.as_slice());
    board.remove(pos);
    valid
}

/// Validates a move of one or more placements. Dispatches single-tile moves
/// to the fast path; otherwise runs the full multi-placement check:
/// distinct + collinear positions, all originally empty, adjacency (or the
/// first-move rule), a fully-occupied segment between the extremes, and
/// every touched line valid.
pub fn validate_move(board: &mut Board, placements: &[(Position, Tile)]) -> bool {
    if placements.is_empty() || placements.len() > HAND_CAPACITY {
        return false;
    }
    if placements.len() == 1 {
        return is_valid_single_placement(board, placements[0].0, placements[0].1);
    }

    let positions: Vec<Position> = placements.iter().map(|(p, _)| *p).collect();
    let unique: HashSet<Position> = positions.iter().copied().collect();
    if unique.len() != positions.len() {
        return false;
    }

    let same_row = positions.iter().all(|p| p.row == positions[0].row);
    let same_col = positions.iter().all(|p| p.col == positions[0].col);
    if !same_row && !same_col {
        return false;
    }

    if placements.iter().any(|(p, _)| board.has(*p)) {
        return false;
    }

    let first_move = board.is_empty();
    if first_move {
        if !unique.contains(&Position::ORIGIN) {
            return false;
        }
    } else {
        let adjacent_to_existing = placements.iter().any(|(p, _)| {
            p.neighbors().iter().any(|n| board.has(*n) && !unique.contains(n))
        });
        if !adjacent_to_existing {
            return false;
        }
    }

    if same_row {
        let row = positions[0].row;
        let min_col = positions.iter().map(|p| p.col).min().unwrap();
        let max_col = positions.iter().map(|p| p.col).max().unwrap();
        for col in min_col..=max_col {
            let pos = Position::new(row, col);
            if !board.has(pos) && !unique.contains(&pos) {
                return false;
            }
        }
    } else {
        let col = positions[0].col;
        let min_row = positions.iter().map(|p| p.row).min().unwrap();
        let max_row = positions.iter().map(|p| p.row).max().unwrap();
        for row in min_row..=max_row {
            let pos = Position::new(row, col);
            if !board.has(pos) && !unique.contains(&pos) {
                return false;
            }
        }
    }

    for (p, t) in placements {
        board.set(*p, *t);
    }
    let mut ok = true;
    for (p, _) in placements {
        let h = extract_line_fixed(board, *p, Direction::Horizontal);
        let v = extract_line_fixed(board, *p, Direction::Vertical);
        if !is_valid_line(h.as_slice()) || !is_valid_line(v.as_slice()) {
            ok = false;
            break;
        }
    }
    for (p, _) in placements {
        board.remove(*p);
    }
    ok
}

/// Scores an already-validated move: the sum, over every distinct line of
/// length ≥ 2 touched by a placement, of that line's length, plus a +6
/// Qwirkle bonus per line of exactly 6. A single isolated placement that
/// forms no line of length ≥ 2 (only possible on the very first move of
/// the game) scores 1. Line identity for dedup is direction plus the
/// line's leftmost/topmost position. Applies and then undoes the
/// placements on `board`, leaving it unchanged.
pub fn score_move(board: &mut Board, placements: &[(Position, Tile)]) -> i32 {
    for (p, t) in placements {
        board.set(*p, *t);
    }

    let mut score = 0i32;
    let mut seen_lines: HashSet<(Direction, Position)> = HashSet::new();
    for (p, _) in placements {
        for dir in [Direction::Horizontal, Direction::Vertical] {
            let buf = extract_line_fixed(board, *p, dir);
            if buf.len() >= 2 {
                let key = (dir, line_start(board, *p, dir));
                if seen_lines.insert(key) {
                    score += buf.len() as i32;
                    if buf.len() == 6 {
                        score += 6;
                    }
                }
            }
        }
    }
    if score == 0 {
        score = 1;
    }

    for (p, _) in placements {
        board.remove(*p);
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(shape: u8, color: u8) -> Tile {
        Tile::new(shape, color)
    }

    #[test]
    fn empty_line_has_length_zero() {
        let board = Board::new();
        let buf = extract_line_fixed(&board, Position::ORIGIN, Direction::Horizontal);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn line_validity_rules() {
        assert!(is_valid_line(&[]));
        assert!(is_valid_line(&[t(0, 0)]));
        assert!(is_valid_line(&[t(0, 0), t(1, 0), t(2, 0)])); // same color
        assert!(is_valid_line(&[t(0, 0), t(0, 1), t(0, 2)])); // same shape
        assert!(!is_valid_line(&[t(0, 0), t(0, 0)])); // duplicate
        assert!(!is_valid_line(&[t(0, 0), t(1, 1)])); // neither shared
        let six: Vec<Tile> = (0..6).map(|c| t(0, c)).collect();
        assert!(is_valid_line(&six));
    }

    #[test]
    fn first_move_must_be_at_origin() {
        let mut board = Board::new();
        assert!(!is_valid_single_placement(&mut board, Position::new(0, 1), t(0, 0)));
        assert!(is_valid_single_placement(&mut board, Position::ORIGIN, t(0, 0)));
        assert!(board.is_empty()); // place/check/remove leaves the board untouched
    }

    #[test]
    fn second_placement_requires_a_neighbor() {
        let mut board = Board::new();
        board.set(Position::ORIGIN, t(0, 0));
        assert!(!is_valid_single_placement(&mut board, Position::new(5, 5), t(0, 1)));
        assert!(is_valid_single_placement(&mut board, Position::new(0, 1), t(0, 1)));
    }

    #[test]
    fn scenario_two_from_spec() {
        let mut board = Board::new();
        board.set(Position::new(0, 0), t(0, 0));
        board.set(Position::new(0, 1), t(1, 0));
        let placements = vec![(Position::new(0, 2), t(2, 0))];
        assert!(validate_move(&mut board, &placements));
        let score = score_move(&mut board, &placements);
        assert_eq!(score, 3);
        assert!(board.is_empty() == false && !board.has(Position::new(0, 2)));
    }

    #[test]
    fn scenario_three_qwirkle_bonus() {
        let mut board = Board::new();
        for c in 0..5u8 {
            board.set(Position::new(0, c as i32), t(c, 0));
        }
        let placements = vec![(Position::new(0, 5), t(5, 0))];
        assert!(validate_move(&mut board, &placements));
        assert_eq!(score_move(&mut board, &placements), 12);
    }

    #[test]
    fn seven_tile_line_is_rejected() {
        let mut board = Board::new();
        for c in 0..6i32 {
            board.set(Position::new(0, c), t(c as u8, 0));
        }
        // A 7th same-color tile would make an invalid 7-length line.
        assert!(!is_valid_single_placement(&mut board, Position::new(0, 6), t(0, 1)));
    }

    #[test]
    fn multi_placement_must_fill_gaps() {
        let mut board = Board::new();
        board.set(Position::ORIGIN, t(0, 0));
        // (0,1) and (0,3) with a gap at (0,2) must be rejected.
        let placements = vec![(Position::new(0, 1), t(1, 0)), (Position::new(0, 3), t(3, 0))];
        assert!(!validate_move(&mut board, &placements));
    }

    #[test]
    fn removing_placed_tiles_leaves_an_empty_line() {
        let mut board = Board::new();
        board.set(Position::ORIGIN, t(0, 0));
        board.set(Position::new(0, 1), t(1, 0));
        board.remove(Position::ORIGIN);
        board.remove(Position::new(0, 1));
        let buf = extract_line_fixed(&board, Position::ORIGIN, Direction::Horizontal);
        assert_eq!(buf.len(), 0);
    }
}
