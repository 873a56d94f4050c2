//! Typed error taxonomy for the rules kernel and game state, replacing the
//! `-1`/sentinel conventions flagged in spec.md §9. Nothing in this module
//! is fatal to the process: every variant here is recovered locally by the
//! session façade into a `{success: false, reason}` envelope.

use thiserror::Error;

/// Why a move (a placement list) was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("no placements were supplied")]
    EmptyMove,
    #[error("a hand slot index was out of range")]
    BadSlot,
    #[error("the proposed placements do not form a valid move")]
    InvalidMove,
}

/// Why a swap (a set of hand indices to exchange) was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwapError {
    #[error("the game is already over")]
    GameOver,
    #[error("no indices were supplied")]
    EmptyIndices,
    #[error("the bag does not hold enough tiles to cover this swap")]
    InsufficientBag,
    #[error("a hand slot index was out of range")]
    BadIndex,
}

impl MoveError {
    /// The human-readable reason the session façade surfaces verbatim at
    /// the HTTP boundary, per spec.md §7.
    pub fn reason(&self) -> &'static str {
        match self {
            MoveError::GameOver | MoveError::EmptyMove | MoveError::BadSlot | MoveError::InvalidMove => {
                "Invalid move"
            }
        }
    }
}

impl SwapError {
    pub fn reason(&self) -> &'static str {
        match self {
            SwapError::GameOver
            | SwapError::EmptyIndices
            | SwapError::InsufficientBag
            | SwapError::BadIndex => "Cannot swap tiles",
        }
    }
}
