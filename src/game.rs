//! Game state: turn orchestration over the board, bag, and two hands.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::bag::Bag;
use crate::board::{Board, Position};
use crate::error::{MoveError, SwapError};
use crate::hand::Hand;
use crate::rules;
use crate::tile::Tile;

/// End-of-game bonus credited to the player whose hand emptied first.
pub const EMPTYING_HAND_BONUS: i32 = 6;

/// The game's outcome once `game_over` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player(usize),
    Tie,
}

/// One turn's history entry. Swaps carry empty `placements` and `score` 0
/// with `is_swap` set; plays carry the opposite.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub player: usize,
    pub placements: Vec<(Position, Tile)>,
    pub score: i32,
    pub is_swap: bool,
    pub swap_count: usize,
}

/// The full state of a two-player game: board, bag, both hands, both
/// scores, whose turn it is, and whether the game has ended.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub bag: Bag,
    pub hands: [Hand; 2],
    pub scores: [i32; 2],
    pub current_player: usize,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub history: Vec<MoveRecord>,
    pub seed: u64,
}

impl GameState {
    /// Builds a new game. `seed == 0` derives a seed from the current time
    /// so casual callers don't need to invent one.
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { time_derived_seed() } else { seed };
        let mut bag = Bag::new(seed);
        let mut hands = [Hand::new(), Hand::new()];
        hands[0].refill(&mut bag);
        hands[1].refill(&mut bag);
        GameState {
            board: Board::new(),
            bag,
            hands,
            scores: [0, 0],
            current_player: 0,
            game_over: false,
            winner: None,
            history: Vec::new(),
            seed,
        }
    }

    pub fn current_hand(&self) -> &Hand {
        &self.hands[self.current_player]
    }

    pub fn other_player(&self) -> usize {
        1 - self.current_player
    }

    /// Deep clone for true forking (e.g. speculative hints that must not
    /// disturb the live game).
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Lighter clone for the Monte Carlo estimator: identical play state
    /// but an empty history, since playouts never need turn history and
    /// dropping it avoids copying an ever-growing vector per simulation.
    pub fn clone_for_simulation(&self) -> Self {
        GameState {
            board: self.board.clone(),
            bag: self.bag.clone(),
            hands: self.hands.clone(),
            scores: self.scores,
            current_player: self.current_player,
            game_over: self.game_over,
            winner: self.winner,
            history: Vec::new(),
            seed: self.seed,
        }
    }

    /// Validates, applies, scores, and records a play. On success, returns
    /// the score earned and toggles the turn if the game continues.
    pub fn play_tiles(&mut self, placements: &[(Position, Tile)]) -> Result<i32, MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if placements.is_empty() {
            return Err(MoveError::EmptyMove);
        }

        let tiles: Vec<Tile> = placements.iter().map(|(_, t)| *t).collect();
        if !hand_can_supply(&self.hands[self.current_player], &tiles) {
            return Err(MoveError::InvalidMove);
        }
        if !rules::validate_move(&mut self.board, placements) {
            return Err(MoveError::InvalidMove);
        }

        let score = rules::score_move(&mut self.board, placements);
        self.commit_play(placements, score);
        Ok(score)
    }

    /// Applies a move already produced (and thus already validated and
    /// scored) by the move generator, skipping re-validation. Used by the
    /// Monte Carlo estimator's playout loop, which only ever plays moves it
    /// generated itself.
    pub fn play_tiles_prevalidated(&mut self, placements: &[(Position, Tile)], score: i32) {
        self.commit_play(placements, score);
    }

    fn commit_play(&mut self, placements: &[(Position, Tile)], score: i32) {
        for (p, t) in placements {
            self.board.set(*p, *t);
        }
        self.scores[self.current_player] += score;

        let tiles: Vec<Tile> = placements.iter().map(|(_, t)| *t).collect();
        take_tiles_from_hand(&mut self.hands[self.current_player], &tiles);
        self.hands[self.current_player].refill(&mut self.bag);

        self.history.push(MoveRecord {
            player: self.current_player,
            placements: placements.to_vec(),
            score,
            is_swap: false,
            swap_count: 0,
        });

        self.check_game_over();
        if !self.game_over {
            self.current_player = self.other_player();
        }
    }

    /// Exchanges the hand tiles at `indices` for fresh draws. Requires a
    /// non-empty index list, indices in range, and enough tiles left in the
    /// bag to cover the exchange.
    pub fn swap_tiles(&mut self, indices: &[usize]) -> Result<(), SwapError> {
        if self.game_over {
            return Err(SwapError::GameOver);
        }
        if indices.is_empty() {
            return Err(SwapError::EmptyIndices);
        }
        let hand_size = self.hands[self.current_player].size();
        if indices.iter().any(|&i| i >= hand_size) {
            return Err(SwapError::BadIndex);
        }
        if self.bag.remaining() < indices.len() {
            return Err(SwapError::InsufficientBag);
        }

        let hand = &mut self.hands[self.current_player];
        let removed = hand.remove_multiple(indices);
        hand.refill(&mut self.bag);
        self.bag.return_tiles(removed);

        self.history.push(MoveRecord {
            player: self.current_player,
            placements: Vec::new(),
            score: 0,
            is_swap: true,
            swap_count: indices.len(),
        });

        self.current_player = self.other_player();
        Ok(())
    }

    /// Hand-empty + bag-empty ⇒ game over. The emptying player gets a
    /// bonus; the winner is whoever has the higher score, or a tie.
    fn check_game_over(&mut self) {
        if self.game_over {
            return;
        }
        let emptied = self.hands.iter().position(|h| h.is_empty());
        if let (Some(player), true) = (emptied, self.bag.is_empty()) {
            self.scores[player] += EMPTYING_HAND_BONUS;
            self.game_over = true;
            self.winner = Some(match self.scores[0].cmp(&self.scores[1]) {
                std::cmp::Ordering::Greater => Winner::Player(0),
                std::cmp::Ordering::Less => Winner::Player(1),
                std::cmp::Ordering::Equal => Winner::Tie,
            });
        }
    }
}

fn time_derived_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

/// Whether `hand` holds at least one copy of every tile in `tiles`,
/// respecting multiplicities (a hand can carry several identical tiles).
fn hand_can_supply(hand: &Hand, tiles: &[Tile]) -> bool {
    let mut available: Vec<Tile> = hand.tiles_unsafe().to_vec();
    for t in tiles {
        match available.iter().position(|x| x == t) {
            Some(pos) => {
                available.remove(pos);
            }
            None => return false,
        }
    }
    true
}

/// Removes one hand slot per tile in `tiles`, matching by value rather
/// than by the index the tiles happened to occupy in a placement list.
fn take_tiles_from_hand(hand: &mut Hand, tiles: &[Tile]) {
    let mut taken = vec![false; hand.size()];
    let mut indices = Vec::with_capacity(tiles.len());
    for t in tiles {
        let found = hand
            .tiles_unsafe()
            .iter()
            .enumerate()
            .find(|(i, tile)| !taken[*i] && **tile == *t)
            .map(|(i, _)| i);
        if let Some(i) = found {
            taken[i] = true;
            indices.push(i);
        }
    }
    hand.remove_multiple(&indices);
}
