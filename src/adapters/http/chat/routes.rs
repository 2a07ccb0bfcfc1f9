//! Axum routes for chat endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{chat, health, recommend_likes, ChatAppState};

/// Creates routes for chat endpoints.
///
/// - POST /chat - Chat turn, streamed as SSE
/// - POST /recommendations/likes - Likes-based recommendation, streamed as SSE
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/recommendations/likes", post(recommend_likes))
}

/// Combined router with chat routes under /api plus the health probe.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .nest("/api", chat_routes())
        .route("/health", get(health))
}
