//! Wire-format structs for the session façade's JSON boundary (spec.md
//! §6). Board keys use the exact literal `"<row>,<col>"` format; every
//! hand-slot reference here is 1-based, converted to/from the 0-based
//! core at the edges of [`handlers`](super::handlers).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::game::{GameState, Winner};
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TileDto {
    pub shape: u8,
    pub color: u8,
}

impl From<Tile> for TileDto {
    fn from(t: Tile) -> Self {
        TileDto { shape: t.shape, color: t.color }
    }
}

impl From<TileDto> for Tile {
    fn from(t: TileDto) -> Self {
        Tile::new(t.shape, t.color)
    }
}

/// The full board/hand/score snapshot returned by `GET /api/game/{id}`
/// and embedded in every play/swap/ai-step response.
#[derive(Debug, Clone, Serialize)]
pub struct StateDto {
    pub game_id: String,
    pub board: HashMap<String, TileDto>,
    pub hand: Vec<TileDto>,
    pub current_player: usize,
    pub scores: [i32; 2],
    pub bag_remaining: usize,
    pub game_over: bool,
    pub winner: Option<i32>,
    pub last_move_positions: Vec<[i32; 2]>,
    pub message: String,
}

/// Builds the board-key/position round-trip: `"<row>,<col>"`.
pub fn position_key(pos: Position) -> String {
    format!("{},{}", pos.row, pos.col)
}

pub fn state_dto(
    game_id: &str,
    state: &GameState,
    last_move_positions: &[Position],
    message: impl Into<String>,
) -> StateDto {
    let board = state.board.positions().map(|p| (position_key(p), state.board.get(p).unwrap().into())).collect();
    let hand = state.current_hand().tiles_unsafe().iter().copied().map(TileDto::from).collect();
    let winner = state.winner.map(|w| match w {
        Winner::Player(i) => i as i32,
        Winner::Tie => -1,
    });
    StateDto {
        game_id: game_id.to_string(),
        board,
        hand,
        current_player: state.current_player,
        scores: state.scores,
        bag_remaining: state.bag.remaining(),
        game_over: state.game_over,
        winner,
        last_move_positions: last_move_positions.iter().map(|p| [p.row, p.col]).collect(),
        message: message.into(),
    }
}

/// `POST /api/game/new` request body.
#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    #[serde(default)]
    pub vs_ai: bool,
    #[serde(default = "default_strategy")]
    pub ai_strategy: String,
    #[serde(default)]
    pub ai_vs_ai: bool,
}

fn default_strategy() -> String {
    "greedy".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PlacementDto {
    pub row: i32,
    pub col: i32,
    /// 1-based slot index into the current player's hand.
    pub tile_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub placements: Vec<PlacementDto>,
}

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    /// 1-based slot indices into the current player's hand.
    pub indices: Vec<usize>,
}

/// Envelope wrapping either a successful state snapshot or a
/// success-false reason, per spec.md §7 — no field is ever half-filled.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResult {
    Ok {
        success: bool,
        #[serde(flatten)]
        state: StateDto,
    },
    Err {
        success: bool,
        reason: String,
    },
}

impl ApiResult {
    pub fn ok(state: StateDto) -> Self {
        ApiResult::Ok { success: true, state }
    }

    pub fn err(reason: impl Into<String>) -> Self {
        ApiResult::Err { success: false, reason: reason.into() }
    }
}

/// `GET /api/game/{id}/hint` response: the greedy best move with its
/// per-slot (1-based) hand indices rather than tile values, so the UI can
/// highlight the exact slots to drag.
#[derive(Debug, Clone, Serialize)]
pub struct HintPlacementDto {
    pub row: i32,
    pub col: i32,
    pub hand_slot: usize,
    pub tile: TileDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct HintResponse {
    pub success: bool,
    pub has_move: bool,
    pub placements: Vec<HintPlacementDto>,
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HintResponse {
    pub fn err(reason: impl Into<String>) -> Self {
        HintResponse { success: false, has_move: false, placements: Vec::new(), score: 0, reason: Some(reason.into()) }
    }
}

/// `GET /api/game/{id}/win-probability` response.
#[derive(Debug, Clone, Serialize)]
pub struct WinProbabilityResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub p0_prob: f64,
    pub p1_prob: f64,
    pub tie_prob: f64,
    pub n_simulations: usize,
    pub confidence: f64,
}

impl WinProbabilityResponse {
    pub fn err(reason: impl Into<String>) -> Self {
        WinProbabilityResponse {
            success: false,
            reason: Some(reason.into()),
            p0_prob: 0.0,
            p1_prob: 0.0,
            tie_prob: 0.0,
            n_simulations: 0,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
