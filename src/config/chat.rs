//! Chat presentation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::Tone;

/// Upper bound on the pause between streamed chunks.
pub const MAX_CHUNK_DELAY_MS: u64 = 50;

/// Chat presentation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Pause between streamed word chunks in milliseconds
    #[serde(default = "default_chunk_delay")]
    pub chunk_delay_ms: u64,

    /// Tone used when a request names none
    #[serde(default)]
    pub default_tone: Tone,
}

impl ChatConfig {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chunk_delay_ms > MAX_CHUNK_DELAY_MS {
            return Err(ValidationError::ChunkDelayTooLong {
                max_ms: MAX_CHUNK_DELAY_MS,
            });
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            chunk_delay_ms: default_chunk_delay(),
            default_tone: Tone::default(),
        }
    }
}

fn default_chunk_delay() -> u64 {
    20
}
