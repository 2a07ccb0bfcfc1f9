//! Strongly-typed identifier value objects.
//!
//! Session identifiers are opaque strings chosen by the client, so unlike
//! generated UUID ids they are validated rather than minted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Maximum accepted session identifier length.
pub const MAX_SESSION_ID_LENGTH: usize = 128;

/// Opaque identifier of a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new SessionId, rejecting blank or oversized values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        let length = trimmed.chars().count();
        if length > MAX_SESSION_ID_LENGTH {
            return Err(ValidationError::too_long(
                "session_id",
                MAX_SESSION_ID_LENGTH,
                length,
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a carrier subscriber, used to look up usage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_accepts_opaque_string() {
        let id = SessionId::new("web-3f2a").unwrap();
        assert_eq!(id.as_str(), "web-3f2a");
    }

    #[test]
    fn session_id_trims_whitespace() {
        let id = SessionId::new("  abc  ").unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn session_id_rejects_blank() {
        match SessionId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "session_id"),
            other => panic!("Expected EmptyField, got {:?}", other),
        }
    }

    #[test]
    fn session_id_rejects_oversized() {
        let result = SessionId::new("x".repeat(MAX_SESSION_ID_LENGTH + 1));
        assert!(matches!(result, Err(ValidationError::TooLong { .. })));
    }

    #[test]
    fn session_id_serializes_transparently() {
        let id = SessionId::new("s-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s-1\"");
    }

    #[test]
    fn user_id_rejects_empty_string() {
        let result = UserId::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn user_id_displays_inner_value() {
        let id = UserId::new("user-123").unwrap();
        assert_eq!(format!("{}", id), "user-123");
    }
}
