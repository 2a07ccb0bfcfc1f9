//! Key/value store adapters holding session records.
//!
//! - `InMemoryKeyValueStore` - LRU map with per-key TTL for tests and
//!   single-process runs
//! - `RedisKeyValueStore` - Redis over a multiplexed async connection

mod in_memory_store;
mod redis_store;

pub use in_memory_store::InMemoryKeyValueStore;
pub use redis_store::RedisKeyValueStore;
