//! Two-player Qwirkle engine: tile/bag/board/hand primitives, a rules
//! kernel, turn-orchestrating game state, an exhaustive move generator,
//! a set of solvers, and a parallel Monte Carlo win-probability estimator.
//!
//! The HTTP session façade in [`server`] and the `qwirkle` CLI binary are
//! thin adapters over this core; nearly all of the engine's algorithmic
//! weight lives in [`rules`], [`movegen`], and [`estimator`].

pub mod bag;
pub mod board;
pub mod error;
pub mod estimator;
pub mod game;
pub mod hand;
pub mod movegen;
pub mod rules;
pub mod server;
pub mod solver;
pub mod tile;

pub use bag::Bag;
pub use board::{Board, Position};
pub use game::GameState;
pub use hand::Hand;
pub use movegen::Move;
pub use tile::Tile;
