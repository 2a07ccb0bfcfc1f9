//! Chat service - the entry point wiring sessions, flows and composition.
//!
//! Nothing runs until the returned stream is polled. The stream never
//! yields an error item: failures become apology text, and an invalid
//! request becomes a single `error` event.

use async_stream::stream;
use futures::StreamExt;
use uuid::Uuid;

use crate::domain::foundation::{SessionId, Tone, UserId};
use crate::domain::replies::CannedReply;
use crate::domain::session::SessionRecord;
use crate::ports::RequestMetadata;

use super::composer::{Composition, EventStream, StreamComposer};
use super::events::ChatEvent;
use super::flow_controller::{FlowController, Reply, TurnInput};
use super::session_repository::SessionRepository;

/// Longest accepted chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2_000;

/// A chat turn.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    pub tone: Option<Tone>,
    pub user_id: Option<String>,
}

/// A likes-based recommendation request.
#[derive(Debug, Clone)]
pub struct LikesRequest {
    pub session_id: String,
    pub liked: Vec<String>,
    pub tone: Option<Tone>,
}

/// Request validation failures, reported as an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid session id: {0}")]
    SessionId(String),

    #[error("invalid user id: {0}")]
    UserId(String),

    #[error("message exceeds {max} characters")]
    MessageTooLong { max: usize },
}

struct ValidChat {
    session_id: SessionId,
    user_id: Option<UserId>,
}

impl ChatRequest {
    fn validate(&self) -> Result<ValidChat, RequestError> {
        let session_id = SessionId::new(self.session_id.clone())
            .map_err(|e| RequestError::SessionId(e.to_string()))?;
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(RequestError::MessageTooLong {
                max: MAX_MESSAGE_CHARS,
            });
        }
        let user_id = self
            .user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(UserId::new)
            .transpose()
            .map_err(|e| RequestError::UserId(e.to_string()))?;
        Ok(ValidChat {
            session_id,
            user_id,
        })
    }
}

/// Handles chat and likes requests end to end.
#[derive(Clone)]
pub struct ChatService {
    sessions: SessionRepository,
    controller: FlowController,
    composer: StreamComposer,
    default_tone: Tone,
}

impl ChatService {
    pub fn new(
        sessions: SessionRepository,
        controller: FlowController,
        composer: StreamComposer,
    ) -> Self {
        Self {
            sessions,
            controller,
            composer,
            default_tone: Tone::default(),
        }
    }

    pub fn with_default_tone(mut self, tone: Tone) -> Self {
        self.default_tone = tone;
        self
    }

    /// Streams the response to one chat message.
    pub fn chat(&self, request: ChatRequest) -> EventStream {
        let this = self.clone();

        Box::pin(stream! {
            let valid = match request.validate() {
                Ok(valid) => valid,
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected chat request");
                    yield ChatEvent::error(e.to_string());
                    return;
                }
            };

            let tone = request.tone.unwrap_or(this.default_tone);
            let trace_id = Uuid::new_v4().to_string();
            let metadata = RequestMetadata::new(valid.session_id.clone(), trace_id.clone());
            tracing::debug!(session_id = %valid.session_id, trace_id = %trace_id, "Chat turn");

            let mut record = this.sessions.load(&valid.session_id).await;
            let mid_flow = !record.is_idle();
            let input = TurnInput {
                utterance: &request.message,
                tone,
                user_id: valid.user_id.as_ref(),
                metadata,
            };

            let reply = match this.controller.handle(&mut record, input).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(session_id = %valid.session_id, error = %e, "Turn failed, resetting flow");
                    recover(&mut record, mid_flow, tone)
                }
            };
            this.sessions.save(&valid.session_id, &record).await;

            let mut events = this.composer.compose(Composition {
                session_id: valid.session_id,
                record,
                utterance: request.message,
                tone,
                reply,
            });
            while let Some(event) = events.next().await {
                yield event;
            }
        })
    }

    /// Streams a likes-based recommendation.
    pub fn recommend_likes(&self, request: LikesRequest) -> EventStream {
        let this = self.clone();

        Box::pin(stream! {
            let session_id = match SessionId::new(request.session_id.clone()) {
                Ok(id) => id,
                Err(e) => {
                    yield ChatEvent::error(RequestError::SessionId(e.to_string()).to_string());
                    return;
                }
            };

            let tone = request.tone.unwrap_or(this.default_tone);
            let metadata = RequestMetadata::new(session_id.clone(), Uuid::new_v4().to_string());
            let mut record = this.sessions.load(&session_id).await;

            let reply = match this.controller.likes(&mut record, &request.liked, tone, metadata).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(session_id = %session_id, error = %e, "Likes recommendation failed");
                    recover(&mut record, false, tone)
                }
            };
            this.sessions.save(&session_id, &record).await;

            let mut events = this.composer.compose(Composition {
                session_id,
                record,
                utterance: request.liked.join(", "),
                tone,
                reply,
            });
            while let Some(event) = events.next().await {
                yield event;
            }
        })
    }
}

/// Returns the session to idle and picks the apology for a failed turn.
fn recover(record: &mut SessionRecord, mid_flow: bool, tone: Tone) -> Reply {
    record.clear_flow();
    record.last_kind = None;
    let apology = if mid_flow {
        CannedReply::FlowReset
    } else {
        CannedReply::TryAgainShortly
    };
    Reply::Text(apology.text(tone).to_string())
}
