//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CARRIER_CHAT` prefix
//! and nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use carrier_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod catalog;
mod chat;
mod error;
mod server;
mod session;

pub use ai::AiConfig;
pub use catalog::CatalogConfig;
pub use chat::{ChatConfig, MAX_CHUNK_DELAY_MS};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Only `ai.openai_api_key` is required; every other section has defaults
/// that run the service against in-process stores.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Session store configuration (Redis or in-memory)
    #[serde(default)]
    pub session: SessionConfig,

    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Catalog configuration (PostgreSQL or sample data)
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Chat presentation configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `CARRIER_CHAT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CARRIER_CHAT__SESSION__TTL_SECS=600` -> `session.ttl_secs = 600`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CARRIER_CHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.session.validate()?;
        self.ai.validate()?;
        self.catalog.validate()?;
        self.chat.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
