//! Integration tests for the SSE HTTP surface.
//!
//! These tests verify the router end to end with `tower::ServiceExt::oneshot`:
//! 1. Each `data:` line is one JSON envelope event
//! 2. A full plan flow over HTTP ends in a plan card
//! 3. Malformed bodies are rejected before reaching the service

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use carrier_chat::adapters::ai::MockAIProvider;
use carrier_chat::adapters::catalog::InMemoryCatalog;
use carrier_chat::adapters::http::chat::{chat_router, ChatAppState};
use carrier_chat::adapters::session::InMemoryKeyValueStore;
use carrier_chat::application::{
    ChatService, FlowController, IntentClassifier, SessionPolicy, SessionRepository,
    StreamComposer,
};
use carrier_chat::ports::AIProvider;

fn app() -> Router {
    let ai = Arc::new(MockAIProvider::new().with_stream_reply("이 요금제가 잘 맞아요."));
    let sessions = SessionRepository::new(
        Arc::new(InMemoryKeyValueStore::default()),
        SessionPolicy::default(),
    );
    let controller = FlowController::new(
        IntentClassifier::new(ai.clone()),
        Arc::new(InMemoryCatalog::sample()),
    );
    let composer =
        StreamComposer::new(ai.clone(), sessions.clone()).with_chunk_delay(Duration::ZERO);
    let state = ChatAppState::new(
        ChatService::new(sessions, controller, composer),
        ai.provider_info(),
    );
    chat_router().with_state(state)
}

fn chat(session: &str, message: &str) -> Request<Body> {
    let body = serde_json::json!({ "session_id": session, "message": message });
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn events(app: &Router, request: Request<Body>) -> Vec<Value> {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).unwrap())
        .collect()
}

fn types(events: &[Value]) -> Vec<&str> {
    events.iter().filter_map(|e| e["type"].as_str()).collect()
}

#[tokio::test]
async fn plan_flow_over_http() {
    let app = app();
    for message in ["요금제 추천해줘", "무제한", "많이 해요", "유튜브"] {
        let events = events(&app, chat("h1", message)).await;
        assert_eq!(types(&events).first(), Some(&"message_start"));
        assert_eq!(types(&events).last(), Some(&"message_end"));
    }

    let events = events(&app, chat("h1", "5만원 이하")).await;
    let kinds = types(&events);
    assert_eq!(kinds[0], "plan_recommendations");
    assert_eq!(kinds[1], "message_start");
    assert_eq!(kinds.last(), Some(&"message_end"));

    let plans = events[0]["plans"].as_array().unwrap();
    assert_eq!(plans.len(), 2);
}

#[tokio::test]
async fn every_data_line_is_a_typed_event() {
    let app = app();
    let events = events(&app, chat("h2", "안녕")).await;
    assert!(!events.is_empty());
    for event in &events {
        assert!(event["type"].is_string(), "untyped event {event}");
    }
    let chunks: String = events
        .iter()
        .filter(|e| e["type"] == "message_chunk")
        .filter_map(|e| e["content"].as_str())
        .collect();
    assert!(!chunks.is_empty());
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"message":"안녕"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}
