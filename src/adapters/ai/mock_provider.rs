//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Separate queues for single completions (intent fallback) and
//!   streamed replies
//! - Simulated delays for timeout testing
//! - Error injection, including failures in the middle of a stream
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_completion("plan_request")
//!     .with_stream_reply("이 요금제를 추천드려요.");
//! ```

use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, ChunkStream, CompletionRequest, CompletionResponse, FinishReason,
    ProviderInfo, StreamChunk, TokenUsage,
};

/// Content returned when a queue is exhausted.
pub const DEFAULT_MOCK_REPLY: &str = "Mock response";

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this content.
    Success(String),
    /// Fail before producing anything.
    Error(MockError),
    /// Stream the words of `partial`, then fail.
    FailMidStream { partial: String, error: MockError },
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    completions: Arc<Mutex<VecDeque<MockResponse>>>,
    streams: Arc<Mutex<VecDeque<MockResponse>>>,
    info: ProviderInfo,
    delay: Duration,
    chunk_delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            completions: Arc::new(Mutex::new(VecDeque::new())),
            streams: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            chunk_delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a single-completion response.
    pub fn with_completion(self, content: impl Into<String>) -> Self {
        lock(&self.completions).push_back(MockResponse::Success(content.into()));
        self
    }

    /// Queues a single-completion error.
    pub fn with_completion_error(self, error: MockError) -> Self {
        lock(&self.completions).push_back(MockResponse::Error(error));
        self
    }

    /// Queues a streamed reply.
    pub fn with_stream_reply(self, content: impl Into<String>) -> Self {
        lock(&self.streams).push_back(MockResponse::Success(content.into()));
        self
    }

    /// Queues a stream that fails before its first chunk.
    pub fn with_stream_error(self, error: MockError) -> Self {
        lock(&self.streams).push_back(MockResponse::Error(error));
        self
    }

    /// Queues a stream that yields `partial` and then fails.
    pub fn with_stream_failing_after(self, partial: impl Into<String>, error: MockError) -> Self {
        lock(&self.streams).push_back(MockResponse::FailMidStream {
            partial: partial.into(),
            error,
        });
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets simulated latency between streamed chunks.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    fn next(queue: &Mutex<VecDeque<MockResponse>>) -> MockResponse {
        lock(queue)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success(DEFAULT_MOCK_REPLY.to_string()))
    }

    async fn record(&self, request: CompletionRequest) {
        lock(&self.calls).push(request);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// Splits content into word chunks that concatenate back to the input.
fn word_chunks(content: &str) -> Vec<String> {
    content
        .split_inclusive(' ')
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.record(request).await;

        match Self::next(&self.completions) {
            MockResponse::Success(content) => Ok(CompletionResponse {
                content,
                usage: TokenUsage::new(10, 2),
                model: self.info.model.clone(),
                finish_reason: FinishReason::Stop,
            }),
            MockResponse::Error(err) | MockResponse::FailMidStream { error: err, .. } => {
                Err(err.into())
            }
        }
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<ChunkStream, AIError> {
        self.record(request).await;

        let (content, failure) = match Self::next(&self.streams) {
            MockResponse::Success(content) => (content, None),
            MockResponse::Error(err) => return Err(err.into()),
            MockResponse::FailMidStream { partial, error } => (partial, Some(error)),
        };

        let mut items: Vec<Result<StreamChunk, AIError>> = word_chunks(&content)
            .into_iter()
            .map(|chunk| Ok(StreamChunk::content(chunk)))
            .collect();
        match failure {
            Some(err) => items.push(Err(err.into())),
            None => items.push(Ok(StreamChunk::final_chunk(FinishReason::Stop))),
        }

        let chunk_delay = self.chunk_delay;
        let chunks = stream::unfold(items.into_iter(), move |mut items| async move {
            let item = items.next()?;
            if !chunk_delay.is_zero() {
                sleep(chunk_delay).await;
            }
            Some((item, items))
        });

        Ok(Box::pin(chunks))
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::{MessageRole, RequestMetadata};
    use futures::StreamExt;

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(SessionId::new("s1").unwrap(), "trace-1"))
            .with_message(MessageRole::User, "Hello")
    }

    async fn collect(provider: &MockAIProvider) -> Vec<Result<StreamChunk, AIError>> {
        provider
            .stream_complete(test_request())
            .await
            .unwrap()
            .collect()
            .await
    }

    #[tokio::test]
    async fn completions_are_returned_in_order_then_default() {
        let provider = MockAIProvider::new()
            .with_completion("greeting")
            .with_completion("nonsense");

        assert_eq!(provider.complete(test_request()).await.unwrap().content, "greeting");
        assert_eq!(provider.complete(test_request()).await.unwrap().content, "nonsense");
        assert_eq!(
            provider.complete(test_request()).await.unwrap().content,
            DEFAULT_MOCK_REPLY
        );
    }

    #[tokio::test]
    async fn completion_and_stream_queues_are_independent() {
        let provider = MockAIProvider::new()
            .with_completion("plan_request")
            .with_stream_reply("추천드려요");

        let chunks = collect(&provider).await;
        assert_eq!(chunks[0].as_ref().unwrap().delta, "추천드려요");
        assert_eq!(
            provider.complete(test_request()).await.unwrap().content,
            "plan_request"
        );
    }

    #[tokio::test]
    async fn stream_chunks_concatenate_to_reply() {
        let provider = MockAIProvider::new().with_stream_reply("이 요금제를 추천드려요.");
        let chunks = collect(&provider).await;

        let text: String = chunks
            .iter()
            .map(|c| c.as_ref().unwrap().delta.clone())
            .collect();
        assert_eq!(text, "이 요금제를 추천드려요.");
        assert!(chunks.last().unwrap().as_ref().unwrap().is_final());
    }

    #[tokio::test]
    async fn stream_can_fail_midway() {
        let provider = MockAIProvider::new().with_stream_failing_after(
            "부분 응답",
            MockError::Network {
                message: "reset".into(),
            },
        );
        let chunks = collect(&provider).await;

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].is_ok());
        assert!(matches!(chunks[2], Err(AIError::Network(_))));
    }

    #[tokio::test]
    async fn stream_error_before_first_chunk() {
        let provider = MockAIProvider::new().with_stream_error(MockError::AuthenticationFailed);
        assert!(matches!(
            provider.stream_complete(test_request()).await,
            Err(AIError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn tracks_calls() {
        let provider = MockAIProvider::new();
        provider.complete(test_request()).await.unwrap();
        let _ = provider.stream_complete(test_request()).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.get_calls()[0].last_user_message(), Some("Hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let provider = MockAIProvider::new().with_delay(Duration::from_secs(30));
        let result =
            tokio::time::timeout(Duration::from_secs(10), provider.complete(test_request())).await;
        assert!(result.is_err());
    }
}
