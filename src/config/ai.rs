//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::OpenAIConfig;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for the model stage of intent classification
    #[serde(default = "default_classify_timeout")]
    pub classify_timeout_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Provider configuration built from these settings
    pub fn provider_config(&self) -> Result<OpenAIConfig, ValidationError> {
        let key = self
            .openai_api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
        Ok(OpenAIConfig::new(key.expose_secret().clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.trim_end_matches('/'))
            .with_timeout(self.timeout())
            .with_max_retries(self.max_retries))
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidAiBaseUrl);
        }
        if self.timeout_secs == 0 || self.classify_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            classify_timeout_secs: default_classify_timeout(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_classify_timeout() -> u64 {
    10
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AiConfig {
        AiConfig {
            openai_api_key: Some(Secret::new("sk-xxx".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.classify_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_validation_missing_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );

        let config = AiConfig {
            openai_api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_validation_bad_base_url() {
        let config = AiConfig {
            base_url: "api.openai.com".to_string(),
            ..with_key()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAiBaseUrl));
    }

    #[test]
    fn test_provider_config_carries_settings() {
        let config = AiConfig {
            model: "gpt-4o".to_string(),
            base_url: "http://localhost:8000/v1/".to_string(),
            timeout_secs: 5,
            ..with_key()
        };
        let provider = config.provider_config().unwrap();
        assert_eq!(provider.model, "gpt-4o");
        assert_eq!(provider.base_url, "http://localhost:8000/v1");
        assert_eq!(provider.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", with_key());
        assert!(!rendered.contains("sk-xxx"));
    }
}
