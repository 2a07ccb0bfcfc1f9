//! HTTP adapter for chat endpoints.
//!
//! - `POST /api/chat` - chat turn, SSE envelope events
//! - `POST /api/recommendations/likes` - likes-based pick, SSE envelope events
//! - `GET /health` - liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ChatRequestDto, HealthResponse, LikesRequestDto};
pub use handlers::ChatAppState;
pub use routes::{chat_router, chat_routes};
