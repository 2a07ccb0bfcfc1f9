//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool size must be between 1 and 100")]
    InvalidPoolSize,

    #[error("Session {0} must be greater than zero")]
    ZeroSessionLimit(&'static str),

    #[error("Sweep target ratio must be in (0, 1]")]
    InvalidSweepRatio,

    #[error("Chunk delay must be at most {max_ms}ms")]
    ChunkDelayTooLong { max_ms: u64 },

    #[error("Invalid AI base URL")]
    InvalidAiBaseUrl,
}
