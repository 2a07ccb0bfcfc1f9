//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the dialog kernel to external systems:
//! - `ai` - OpenAI-compatible chat completions and a scriptable mock
//! - `session` - Redis and in-memory key/value stores
//! - `catalog` - PostgreSQL and in-memory product catalogs
//! - `http` - axum routes streaming envelope events as SSE

pub mod ai;
pub mod catalog;
pub mod http;
pub mod session;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use catalog::{InMemoryCatalog, PostgresCatalog};
pub use session::{InMemoryKeyValueStore, RedisKeyValueStore};
