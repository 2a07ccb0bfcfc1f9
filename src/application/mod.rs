//! Application layer - orchestration of the dialog kernel.
//!
//! - `SessionRepository` - bounded, fail-soft session persistence
//! - `IntentClassifier` - rule stage with a deadline-bounded model fallback
//! - `FlowController` - question flows and one-shot dispatch
//! - `StreamComposer` - card, sentinels and paced prose as envelope events
//! - `ChatService` - validates requests and wires the above into one stream

pub mod chat_service;
pub mod composer;
pub mod events;
pub mod flow_controller;
pub mod handlers;
pub mod intent_classifier;
pub mod prompts;
pub mod session_repository;

pub use chat_service::{ChatRequest, ChatService, LikesRequest, RequestError, MAX_MESSAGE_CHARS};
pub use composer::{Composition, EventStream, StreamComposer, DEFAULT_CHUNK_DELAY};
pub use events::ChatEvent;
pub use flow_controller::{FlowController, FlowError, GeneratedReply, PendingCard, Reply, TurnInput};
pub use intent_classifier::{IntentClassifier, DEFAULT_CLASSIFY_TIMEOUT};
pub use session_repository::{SessionPolicy, SessionRepository};
