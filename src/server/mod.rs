//! The HTTP session façade (spec.md §6): axum routing over a shared
//! [`session::SessionRegistry`]. Thin by design — every handler's body is
//! parse DTO, take the session lock, call into the core, marshal back out.

pub mod dto;
pub mod handlers;
pub mod session;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use session::SessionRegistry;

/// Builds the full router: the eight routes of spec.md §6 plus a static
/// file service for `./static`, when present, per spec.md §6's
/// Environment paragraph.
pub fn build_router() -> Router {
    let registry: handlers::AppState = Arc::new(SessionRegistry::new());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/game/new", post(handlers::new_game))
        .route("/api/game/:id", get(handlers::get_game))
        .route("/api/game/:id/play", post(handlers::play))
        .route("/api/game/:id/swap", post(handlers::swap))
        .route("/api/game/:id/hint", get(handlers::hint))
        .route("/api/game/:id/ai-step", post(handlers::ai_step))
        .route("/api/game/:id/win-probability", get(handlers::win_probability))
        .nest_service("/", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_check_responds_ok() {
        let app = build_router();
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn new_game_then_get_round_trips() {
        let app = build_router();
        let new_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/game/new")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(new_response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(new_response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let id = json.get("game_id").and_then(|v| v.as_str()).unwrap().to_string();

        let get_response = app
            .oneshot(Request::builder().uri(format!("/api/game/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(get_response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_game_id_returns_not_found() {
        let app = build_router();
        let response = app
            .oneshot(Request::builder().uri("/api/game/does-not-exist").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
