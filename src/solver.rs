//! Solvers: strategies for picking one move out of the generator's
//! already-sorted output. Mirrors the teacher's `select_action_*` family in
//! `search.rs` (greedy/random/expectimax over `ALL_ACTIONS`), generalized
//! from "pick a 2048 shift direction" to "pick a pre-scored Qwirkle move".

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::game::GameState;
use crate::movegen::Move;

/// Shared contract every solver implements: pick a move (or decline) from
/// an already-generated, score-sorted list.
pub trait Solver: Send + Sync {
    /// Picks a move from `moves` (sorted by score descending), or `None` if
    /// the list is empty. `state` is available for solvers that need
    /// context beyond the move list itself; none of the three below do.
    fn select_move(&mut self, state: &GameState, moves: &[Move]) -> Option<Move>;

    fn name(&self) -> &'static str;
}

/// Always takes the first (highest-scoring) move. Stateless: safe to share
/// as a singleton across the estimator's worker pool, per spec.md §5.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    fn select_move(&mut self, _state: &GameState, moves: &[Move]) -> Option<Move> {
        moves.first().cloned()
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Picks uniformly among all generated moves, via a seeded per-solver
/// generator — mirrors `search::select_action_randomly`'s uniform pick
/// over applicable actions, generalized to pre-scored moves.
pub struct UniformRandomSolver {
    rng: ChaCha8Rng,
}

impl UniformRandomSolver {
    pub fn new(seed: u64) -> Self {
        UniformRandomSolver { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl Solver for UniformRandomSolver {
    fn select_move(&mut self, _state: &GameState, moves: &[Move]) -> Option<Move> {
        if moves.is_empty() {
            return None;
        }
        let i = self.rng.random_range(0..moves.len());
        moves.get(i).cloned()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Samples moves with weight `(score + 1)^(1/temperature)`, via inverse-CDF
/// over the cumulative weight. `temperature -> 0` approaches greedy;
/// `temperature == 1.0` is balanced; large temperatures approach uniform.
/// The `+1` keeps zero-score moves from getting a zero weight.
pub struct WeightedRandomSolver {
    rng: ChaCha8Rng,
    temperature: f64,
}

impl WeightedRandomSolver {
    pub fn new(seed: u64, temperature: f64) -> Self {
        WeightedRandomSolver { rng: ChaCha8Rng::seed_from_u64(seed), temperature }
    }

    pub const DEFAULT_TEMPERATURE: f64 = 1.0;
}

impl Solver for WeightedRandomSolver {
    fn select_move(&mut self, _state: &GameState, moves: &[Move]) -> Option<Move> {
        if moves.is_empty() {
            return None;
        }
        let exponent = 1.0 / self.temperature;
        let weights: Vec<f64> = moves.iter().map(|m| ((m.score + 1) as f64).powf(exponent)).collect();
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            return moves.first().cloned();
        }
        let mut target = self.rng.random::<f64>() * total;
        for (i, w) in weights.iter().enumerate() {
            target -= w;
            if target <= 0.0 {
                return moves.get(i).cloned();
            }
        }
        moves.last().cloned()
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}

/// Builds a solver by name, defaulting to greedy on anything unrecognized
/// — per spec.md §4.5, unknown strategy names never fail hard.
pub fn solver_by_name(name: &str, seed: u64) -> Box<dyn Solver> {
    match name {
        "random" => Box::new(UniformRandomSolver::new(seed)),
        "weighted" => Box::new(WeightedRandomSolver::new(seed, WeightedRandomSolver::DEFAULT_TEMPERATURE)),
        _ => Box::new(GreedySolver),
    }
}
