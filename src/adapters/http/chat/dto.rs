//! HTTP DTOs for chat endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{ChatRequest, LikesRequest};
use crate::domain::foundation::Tone;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestDto {
    pub session_id: String,
    pub message: String,
    /// "formal" or "playful"; anything else reads as formal.
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl From<ChatRequestDto> for ChatRequest {
    fn from(dto: ChatRequestDto) -> Self {
        Self {
            session_id: dto.session_id,
            message: dto.message,
            tone: dto.tone.as_deref().map(Tone::parse_lenient),
            user_id: dto.user_id,
        }
    }
}

/// Body of `POST /api/recommendations/likes`.
#[derive(Debug, Clone, Deserialize)]
pub struct LikesRequestDto {
    pub session_id: String,
    /// Liked subscription or brand names.
    #[serde(default)]
    pub liked: Vec<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

impl From<LikesRequestDto> for LikesRequest {
    fn from(dto: LikesRequestDto) -> Self {
        Self {
            session_id: dto.session_id,
            liked: dto.liked,
            tone: dto.tone.as_deref().map(Tone::parse_lenient),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub model: String,
}
