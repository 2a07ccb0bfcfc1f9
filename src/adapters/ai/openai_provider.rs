//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! # Streaming
//!
//! Uses Server-Sent Events (SSE). Network chunks may split an event line
//! anywhere, so bytes are buffered until a full line is available. Parsing
//! stops at the `[DONE]` marker.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, ChunkStream, CompletionRequest, CompletionResponse, FinishReason,
    MessageRole, ProviderInfo, StreamChunk, TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest, stream: bool) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: Some(stream),
        }
    }

    async fn send(&self, request: &CompletionRequest, stream: bool) -> Result<Response, AIError> {
        let body = self.to_openai_request(request, stream);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        Self::check_status(response).await
    }

    /// Maps non-success statuses to errors.
    async fn check_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(parse_retry_after(&error_body))),
            400 if error_body.contains("content_filter") => {
                Err(AIError::content_filtered(error_body))
            }
            400..=499 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn complete_once(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send(request, false).await?;
        let body: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            usage: body
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            model: body.model,
            finish_reason: finish_reason(choice.finish_reason.as_deref()),
        })
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut attempt = 0;
        loop {
            match self.complete_once(&request).await {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    tracing::warn!(
                        trace_id = %request.metadata.trace_id,
                        attempt,
                        error = %err,
                        "OpenAI completion failed, retrying"
                    );
                    // Exponential backoff: 1s, 2s, 4s, ...
                    sleep(Duration::from_secs(1 << attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<ChunkStream, AIError> {
        let response = self.send(&request, true).await?;
        let mut bytes = Box::pin(response.bytes_stream());

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::default();
            while let Some(next) = bytes.next().await {
                match next {
                    Ok(chunk) => {
                        for item in decoder.push(&chunk) {
                            yield item;
                        }
                        if decoder.is_done() {
                            break;
                        }
                    }
                    Err(e) => {
                        yield Err(AIError::network(format!("Stream error: {}", e)));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

/// Incremental SSE line decoder.
#[derive(Debug, Default)]
struct SseDecoder {
    /// Raw bytes; a network chunk may end inside a multibyte character.
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    /// Feeds raw bytes and returns the chunks of every completed line.
    fn push(&mut self, bytes: &[u8]) -> Vec<Result<StreamChunk, AIError>> {
        self.buffer.extend_from_slice(bytes);
        let mut results = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            if self.done {
                continue;
            }
            let line = match std::str::from_utf8(&raw) {
                Ok(line) => line.trim_end_matches(['\n', '\r']),
                Err(e) => {
                    results.push(Err(AIError::parse(format!("Invalid UTF-8 in SSE line: {}", e))));
                    continue;
                }
            };
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim_start();

            if data == "[DONE]" {
                self.done = true;
                continue;
            }
            if data.is_empty() {
                continue;
            }

            match serde_json::from_str::<StreamResponseChunk>(data) {
                Ok(chunk) => {
                    if let Some(choice) = chunk.choices.into_iter().next() {
                        if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
                            results.push(Ok(StreamChunk::content(content)));
                        }
                        if let Some(reason) = choice.finish_reason {
                            results.push(Ok(StreamChunk::final_chunk(finish_reason(Some(&reason)))));
                        }
                    }
                }
                Err(e) => results.push(Err(AIError::parse(format!(
                    "Failed to parse SSE chunk: {}",
                    e
                )))),
            }
        }

        results
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

fn finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

/// Parses "try again in Ns" out of an error body, defaulting to 30s.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let rest = &message[message.find("try again in ")? + 13..];
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            rest[..end].parse().ok()
        })
        .unwrap_or(30)
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct StreamResponseChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}
