//! Streaming composer - turns a decided reply into envelope events.
//!
//! Model prose is buffered in full before anything is emitted, so the card
//! can be checked against it and always precedes the text. The buffered
//! prose is then replayed as word chunks with a short pacing delay.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};
use tokio::time::sleep;

use crate::domain::foundation::{SessionId, Tone};
use crate::domain::recommendation::prose_kind;
use crate::domain::replies::CannedReply;
use crate::domain::session::SessionRecord;
use crate::ports::{AIError, AIProvider, CompletionRequest};

use super::events::ChatEvent;
use super::flow_controller::{GeneratedReply, Reply};
use super::session_repository::SessionRepository;

/// Pull-based stream of envelope events.
pub type EventStream = Pin<Box<dyn Stream<Item = ChatEvent> + Send>>;

/// Default pause between replayed chunks.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(20);

/// One turn to compose.
#[derive(Debug, Clone)]
pub struct Composition {
    pub session_id: SessionId,
    pub record: SessionRecord,
    pub utterance: String,
    pub tone: Tone,
    pub reply: Reply,
}

/// Produces the event sequence of a turn and persists its outcome.
#[derive(Clone)]
pub struct StreamComposer {
    ai: Arc<dyn AIProvider>,
    sessions: SessionRepository,
    chunk_delay: Duration,
}

impl StreamComposer {
    pub fn new(ai: Arc<dyn AIProvider>, sessions: SessionRepository) -> Self {
        Self {
            ai,
            sessions,
            chunk_delay: DEFAULT_CHUNK_DELAY,
        }
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Streams the events of one turn.
    ///
    /// The sequence always ends with `message_end`. The record, with the
    /// exchange appended and the completion kind cleared, is saved right
    /// before that event.
    pub fn compose(&self, turn: Composition) -> EventStream {
        let ai = self.ai.clone();
        let sessions = self.sessions.clone();
        let delay = self.chunk_delay;

        Box::pin(stream! {
            let Composition { session_id, mut record, utterance, tone, reply } = turn;

            let assistant_text = match reply {
                Reply::Text(text) => {
                    yield ChatEvent::MessageStart;
                    for chunk in word_chunks(&text) {
                        pace(delay).await;
                        yield ChatEvent::chunk(chunk);
                    }
                    text
                }
                Reply::Generated(GeneratedReply { lead, card, request }) => {
                    let (prose, failure) = buffer_reply(ai.as_ref(), request).await;
                    if let Some(e) = &failure {
                        tracing::warn!(session_id = %session_id, error = %e, "Model reply failed");
                    }

                    if let Some(lead) = lead {
                        yield lead;
                    }

                    if let Some(card) = card {
                        let kind = card.kind();
                        if record.last_kind == Some(kind) {
                            if prose_kind(&prose).contradicts(kind) {
                                tracing::warn!(
                                    session_id = %session_id,
                                    ?kind,
                                    "Model prose talks about the other card kind"
                                );
                            }
                            if let Some(event) = card.resolve(&prose) {
                                yield event;
                            }
                        } else {
                            tracing::warn!(
                                session_id = %session_id,
                                ?kind,
                                session_kind = ?record.last_kind,
                                "Card kind disagrees with session state, card suppressed"
                            );
                        }
                    }

                    yield ChatEvent::MessageStart;
                    for chunk in word_chunks(&prose) {
                        pace(delay).await;
                        yield ChatEvent::chunk(chunk);
                    }

                    let mut text = prose;
                    if failure.is_some() {
                        let apology = if text.trim().is_empty() {
                            CannedReply::TryAgainShortly
                        } else {
                            CannedReply::StreamInterrupted
                        };
                        let apology = apology.text(tone);
                        yield ChatEvent::chunk(apology);
                        text.push_str(apology);
                    }
                    text
                }
            };

            let max_pairs = sessions.policy().history_pairs;
            record.push_turn(utterance, assistant_text, max_pairs);
            record.last_kind = None;
            sessions.save(&session_id, &record).await;

            yield ChatEvent::MessageEnd;
        })
    }
}

/// Reads the whole model reply. On failure returns what arrived so far.
async fn buffer_reply(ai: &dyn AIProvider, request: CompletionRequest) -> (String, Option<AIError>) {
    let mut chunks = match ai.stream_complete(request).await {
        Ok(chunks) => chunks,
        Err(e) => return (String::new(), Some(e)),
    };

    let mut text = String::new();
    while let Some(item) = chunks.next().await {
        match item {
            Ok(chunk) => {
                text.push_str(&chunk.delta);
                if chunk.is_final() {
                    break;
                }
            }
            Err(e) => return (text, Some(e)),
        }
    }
    (text, None)
}

/// Word-granular chunks that concatenate back to `text`.
fn word_chunks(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(' ')
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}
