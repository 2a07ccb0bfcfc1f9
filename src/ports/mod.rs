//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialog kernel and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - language-model completions and streamed replies
//! - `KeyValueStore` - TTL key/value store holding session records
//! - `CatalogReader` - read-only product catalog and subscriber usage

mod ai_provider;
mod catalog;
mod key_value_store;

pub use ai_provider::{
    AIError, AIProvider, ChunkStream, CompletionRequest, CompletionResponse, FinishReason,
    Message, MessageRole, ProviderInfo, RequestMetadata, StreamChunk, TokenUsage,
};
pub use catalog::{CatalogError, CatalogReader};
pub use key_value_store::{KeyValueStore, StoreError};
