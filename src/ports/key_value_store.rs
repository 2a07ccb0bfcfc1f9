//! Key/value store port backing session persistence.
//!
//! The contract mirrors a small subset of Redis: plain string values with
//! a per-key TTL, a key count, a bounded scan and server configuration.
//! Implementations may evict keys at any time under memory pressure.

use async_trait::async_trait;

/// Port for a TTL-capable key/value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Missing or expired keys yield `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value with a fresh TTL in seconds.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// Deletes a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Number of live keys.
    async fn db_size(&self) -> Result<usize, StoreError>;

    /// Returns up to `limit` keys.
    ///
    /// Stores that track access order return least recently used keys first.
    async fn scan(&self, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Remaining lifetime of a key in milliseconds, `None` when the key is
    /// missing or has no expiry.
    async fn ttl_ms(&self, key: &str) -> Result<Option<u64>, StoreError>;

    /// Sets a server configuration parameter.
    async fn config_set(&self, name: &str, value: &str) -> Result<(), StoreError>;
}

/// Key/value store errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Could not reach the store.
    #[error("connection error: {0}")]
    Connection(String),

    /// The operation exceeded its deadline.
    #[error("store operation timed out after {timeout_secs}s")]
    Timeout {
        /// Configured deadline.
        timeout_secs: u64,
    },

    /// The store rejected the command.
    #[error("command failed: {0}")]
    Command(String),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a command error.
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display() {
        assert_eq!(
            StoreError::Timeout { timeout_secs: 3 }.to_string(),
            "store operation timed out after 3s"
        );
        assert_eq!(
            StoreError::connection("refused").to_string(),
            "connection error: refused"
        );
    }
}
