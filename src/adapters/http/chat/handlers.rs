//! HTTP handlers for chat endpoints.
//!
//! Responses are Server-Sent Events; each `data:` line is one envelope
//! event serialized as JSON.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::{Stream, StreamExt};

use crate::application::{ChatEvent, ChatService, EventStream};
use crate::ports::ProviderInfo;

use super::dto::{ChatRequestDto, HealthResponse, LikesRequestDto};

/// Shared state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub service: ChatService,
    pub provider: ProviderInfo,
}

impl ChatAppState {
    pub fn new(service: ChatService, provider: ProviderInfo) -> Self {
        Self { service, provider }
    }
}

fn to_sse_event(event: &ChatEvent) -> Event {
    match Event::default().json_data(event) {
        Ok(sse) => sse,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize chat event");
            Event::default().data(r#"{"type":"error","message":"serialization failure"}"#)
        }
    }
}

fn sse(events: EventStream) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send> {
    let stream = events.map(|event| Ok(to_sse_event(&event)));
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// POST /api/chat - Stream the reply to one chat message.
pub async fn chat(
    State(state): State<ChatAppState>,
    Json(body): Json<ChatRequestDto>,
) -> impl IntoResponse {
    sse(state.service.chat(body.into()))
}

/// POST /api/recommendations/likes - Stream a likes-based recommendation.
pub async fn recommend_likes(
    State(state): State<ChatAppState>,
    Json(body): Json<LikesRequestDto>,
) -> impl IntoResponse {
    sse(state.service.recommend_likes(body.into()))
}

/// GET /health - Liveness probe.
pub async fn health(State(state): State<ChatAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        provider: state.provider.name.clone(),
        model: state.provider.model.clone(),
    })
}
