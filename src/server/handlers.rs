//! The eight routes of spec.md §6, as thin axum handlers: parse/validate
//! the wire DTOs, take the session lock, call into the core, marshal the
//! result back out. No rules-kernel logic lives here.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rand::Rng;

use crate::board::Position;
use crate::estimator::estimate_default;
use crate::game::GameState;
use crate::movegen::generate_all_moves;
use crate::solver::{solver_by_name, GreedySolver, Solver};

use super::dto::{
    state_dto, ApiResult, HealthResponse, HintPlacementDto, HintResponse, NewGameRequest, PlayRequest, SwapRequest,
    TileDto, WinProbabilityResponse,
};
use super::session::{new_game_id, Session, SessionRegistry};

pub type AppState = Arc<SessionRegistry>;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn new_game(State(registry): State<AppState>, Json(req): Json<NewGameRequest>) -> Json<ApiResult> {
    let seed = rand::rng().random::<u64>().max(1);
    let game = GameState::new(seed);
    let id = new_game_id();
    let session = Session::new(id.clone(), game, req.vs_ai, req.ai_vs_ai, req.ai_strategy.clone());
    let session = registry.insert(session);
    tracing::info!(
        game_id = %session.id,
        seed,
        vs_ai = session.vs_ai,
        ai_vs_ai = session.ai_vs_ai,
        ai_strategy = %req.ai_strategy,
        "session created"
    );

    let locked = session.state.read().unwrap();
    Json(ApiResult::ok(state_dto(&session.id, &locked.game, &locked.last_move_positions, "Game created")))
}

pub async fn get_game(
    State(registry): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResult>) {
    match registry.get(&id) {
        None => unknown_game(),
        Some(session) => {
            let locked = session.state.read().unwrap();
            (StatusCode::OK, Json(ApiResult::ok(state_dto(&id, &locked.game, &locked.last_move_positions, ""))))
        }
    }
}

pub async fn play(
    State(registry): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PlayRequest>,
) -> (StatusCode, Json<ApiResult>) {
    let Some(session) = registry.get(&id) else {
        return unknown_game();
    };

    let mut locked = session.state.write().unwrap();
    let hand = locked.game.current_hand().clone();
    let mut placements = Vec::with_capacity(req.placements.len());
    for p in &req.placements {
        let Some(slot) = p.tile_index.checked_sub(1) else {
            return (StatusCode::OK, Json(ApiResult::err("Invalid move")));
        };
        let Some(tile) = hand.get(slot) else {
            return (StatusCode::OK, Json(ApiResult::err("Invalid move")));
        };
        placements.push((Position::new(p.row, p.col), tile));
    }

    match locked.game.play_tiles(&placements) {
        Err(e) => {
            tracing::warn!(game_id = %id, reason = e.reason(), "play rejected");
            (StatusCode::OK, Json(ApiResult::err(e.reason())))
        }
        Ok(score) => {
            tracing::debug!(game_id = %id, score, "play applied");
            locked.last_move_positions = placements.iter().map(|(pos, _)| *pos).collect();
            maybe_run_ai_turn(&session, &mut locked);
            (StatusCode::OK, Json(ApiResult::ok(state_dto(&id, &locked.game, &locked.last_move_positions, ""))))
        }
    }
}

pub async fn swap(
    State(registry): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SwapRequest>,
) -> (StatusCode, Json<ApiResult>) {
    let Some(session) = registry.get(&id) else {
        return unknown_game();
    };

    let mut locked = session.state.write().unwrap();
    let mut indices = Vec::with_capacity(req.indices.len());
    for &i in &req.indices {
        let Some(zero_based) = i.checked_sub(1) else {
            return (StatusCode::OK, Json(ApiResult::err("Cannot swap tiles")));
        };
        indices.push(zero_based);
    }

    match locked.game.swap_tiles(&indices) {
        Err(e) => {
            tracing::warn!(game_id = %id, reason = e.reason(), "swap rejected");
            (StatusCode::OK, Json(ApiResult::err(e.reason())))
        }
        Ok(()) => {
            tracing::debug!(game_id = %id, count = indices.len(), "swap applied");
            locked.last_move_positions.clear();
            maybe_run_ai_turn(&session, &mut locked);
            (StatusCode::OK, Json(ApiResult::ok(state_dto(&id, &locked.game, &locked.last_move_positions, ""))))
        }
    }
}

pub async fn ai_step(
    State(registry): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResult>) {
    let Some(session) = registry.get(&id) else {
        return unknown_game();
    };
    let mut locked = session.state.write().unwrap();
    if locked.game.game_over {
        return (StatusCode::OK, Json(ApiResult::err("Invalid move")));
    }
    run_one_ai_move(&session, &mut locked);
    (StatusCode::OK, Json(ApiResult::ok(state_dto(&id, &locked.game, &locked.last_move_positions, ""))))
}

pub async fn hint(State(registry): State<AppState>, Path(id): Path<String>) -> (StatusCode, Json<HintResponse>) {
    let Some(session) = registry.get(&id) else {
        return (StatusCode::NOT_FOUND, Json(HintResponse::err("unknown game id")));
    };
    let locked = session.state.read().unwrap();
    if locked.game.game_over {
        return (StatusCode::OK, Json(HintResponse::err("the game is already over")));
    }

    let moves = generate_all_moves(&locked.game);
    let Some(best) = GreedySolver.select_move(&locked.game, &moves) else {
        return (
            StatusCode::OK,
            Json(HintResponse { success: true, has_move: false, placements: Vec::new(), score: 0, reason: None }),
        );
    };

    let hand = locked.game.current_hand();
    let mut taken = vec![false; hand.size()];
    let placements = best
        .placements
        .iter()
        .map(|(pos, tile)| {
            let slot = hand
                .tiles_unsafe()
                .iter()
                .enumerate()
                .find(|(i, t)| !taken[*i] && *t == tile)
                .map(|(i, _)| i)
                .unwrap_or(0);
            taken[slot] = true;
            HintPlacementDto { row: pos.row, col: pos.col, hand_slot: slot + 1, tile: TileDto::from(*tile) }
        })
        .collect();

    (
        StatusCode::OK,
        Json(HintResponse { success: true, has_move: true, placements, score: best.score, reason: None }),
    )
}

pub async fn win_probability(
    State(registry): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<WinProbabilityResponse>) {
    let Some(session) = registry.get(&id) else {
        return (StatusCode::NOT_FOUND, Json(WinProbabilityResponse::err("unknown game id")));
    };
    let locked = session.state.read().unwrap();
    tracing::info!(game_id = %id, n = crate::estimator::DEFAULT_SIMULATIONS, workers = num_cpus::get(), "estimating win probability");
    let result = estimate_default(&locked.game);
    tracing::debug!(game_id = %id, p0 = result.p0, p1 = result.p1, tie = result.tie, confidence = result.confidence, "win probability estimated");
    (
        StatusCode::OK,
        Json(WinProbabilityResponse {
            success: true,
            reason: None,
            p0_prob: result.p0,
            p1_prob: result.p1,
            tie_prob: result.tie,
            n_simulations: result.n,
            confidence: result.confidence,
        }),
    )
}

fn unknown_game() -> (StatusCode, Json<ApiResult>) {
    (StatusCode::NOT_FOUND, Json(ApiResult::err("unknown game id")))
}

/// After a human move, steps the AI exactly once if it now holds the
/// turn — per spec.md §6's play/swap "AI-step rule".
fn maybe_run_ai_turn(session: &Session, locked: &mut super::session::SessionState) {
    if !locked.game.game_over && session.ai_has_turn(locked.game.current_player) {
        run_one_ai_move(session, locked);
    }
}

/// Runs one AI move for whoever currently holds the turn. Falls back to
/// swapping slot 0 if no move is available and the bag still has tiles;
/// otherwise the turn passes with no state change beyond toggling whose
/// turn it is. Never surfaced as an error, per spec.md §7.
fn run_one_ai_move(session: &Session, locked: &mut super::session::SessionState) {
    let mut solver = solver_by_name(&session.ai_strategy, rand::rng().random::<u64>());
    let moves = generate_all_moves(&locked.game);
    if let Some(mv) = solver.select_move(&locked.game, &moves) {
        tracing::debug!(game_id = %session.id, strategy = solver.name(), score = mv.score, "ai move applied");
        locked.game.play_tiles_prevalidated(&mv.placements, mv.score);
        locked.last_move_positions = mv.placements.iter().map(|(pos, _)| *pos).collect();
        return;
    }

    let hand_non_empty = !locked.game.current_hand().is_empty();
    if !locked.game.bag.is_empty() && hand_non_empty && locked.game.swap_tiles(&[0]).is_ok() {
        tracing::debug!(game_id = %session.id, strategy = solver.name(), "ai fell back to swapping slot 0");
        locked.last_move_positions.clear();
        return;
    }

    tracing::warn!(game_id = %session.id, "ai has no move or swap available, passing turn");
    if !locked.game.game_over {
        locked.game.current_player = locked.game.other_player();
    }
    locked.last_move_positions.clear();
}
