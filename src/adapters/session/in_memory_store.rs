//! In-memory key/value store with LRU eviction and per-key TTL.
//!
//! Behaves like a Redis instance configured with `allkeys-lru`: reads and
//! writes refresh a key's recency, and inserting beyond `max_entries`
//! evicts the least recently used key. Expired keys are dropped lazily.
//! Time comes from `tokio::time`, so paused-clock tests control expiry.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::ports::{KeyValueStore, StoreError};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
    tick: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Recency order: oldest tick first.
    order: BTreeMap<u64, String>,
    next_tick: u64,
    config: HashMap<String, String>,
}

impl Inner {
    fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        if let Some(entry) = self.entries.get_mut(key) {
            self.order.remove(&entry.tick);
            entry.tick = tick;
            self.order.insert(tick, key.to_string());
            self.next_tick += 1;
        }
    }

    fn remove(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.tick);
        Some(entry)
    }

    /// Removes `key` when it has expired. Returns true if it is still live.
    fn live(&mut self, key: &str, now: Instant) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.expires_at.is_some_and(|at| at <= now) => {
                self.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at.is_some_and(|at| at <= now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            self.remove(&key);
        }
    }

    fn evict_lru(&mut self) {
        if let Some((_, key)) = self.order.pop_first() {
            self.entries.remove(&key);
        }
    }
}

/// In-memory key/value store.
#[derive(Debug, Clone)]
pub struct InMemoryKeyValueStore {
    inner: Arc<Mutex<Inner>>,
    max_entries: usize,
}

impl InMemoryKeyValueStore {
    /// Creates a store holding at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            max_entries: max_entries.max(1),
        }
    }

    /// Value last set for a configuration parameter.
    pub async fn config_value(&self, name: &str) -> Option<String> {
        self.inner.lock().await.config.get(name).cloned()
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.live(key, Instant::now()) {
            return Ok(None);
        }
        inner.touch(key);
        Ok(inner.entries.get(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;

        let existed = inner.remove(key).is_some();
        if !existed && inner.entries.len() >= self.max_entries {
            inner.purge_expired(now);
            while inner.entries.len() >= self.max_entries {
                inner.evict_lru();
            }
        }

        let tick = inner.next_tick;
        inner.next_tick += 1;
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: (ttl_secs > 0).then(|| now + Duration::from_secs(ttl_secs)),
                tick,
            },
        );
        inner.order.insert(tick, key.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.lock().await.remove(key);
        Ok(())
    }

    async fn db_size(&self) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.purge_expired(Instant::now());
        Ok(inner.entries.len())
    }

    async fn scan(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.purge_expired(Instant::now());
        Ok(inner.order.values().take(limit).cloned().collect())
    }

    async fn ttl_ms(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;
        if !inner.live(key, now) {
            return Ok(None);
        }
        Ok(inner
            .entries
            .get(key)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now).as_millis() as u64))
    }

    async fn config_set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.inner
            .lock()
            .await
            .config
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod basics {
        use super::*;

        #[tokio::test]
        async fn set_then_get() {
            let store = InMemoryKeyValueStore::default();
            store.set("k", "v", 60).await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        }

        #[tokio::test]
        async fn missing_key_is_none() {
            let store = InMemoryKeyValueStore::default();
            assert_eq!(store.get("nope").await.unwrap(), None);
            assert_eq!(store.ttl_ms("nope").await.unwrap(), None);
        }

        #[tokio::test]
        async fn delete_is_idempotent() {
            let store = InMemoryKeyValueStore::default();
            store.set("k", "v", 60).await.unwrap();
            store.delete("k").await.unwrap();
            store.delete("k").await.unwrap();
            assert_eq!(store.db_size().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn config_set_is_recorded() {
            let store = InMemoryKeyValueStore::default();
            store.config_set("maxmemory-policy", "allkeys-lru").await.unwrap();
            assert_eq!(
                store.config_value("maxmemory-policy").await,
                Some("allkeys-lru".to_string())
            );
        }
    }

    mod expiry {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn keys_expire_after_ttl() {
            let store = InMemoryKeyValueStore::default();
            store.set("k", "v", 10).await.unwrap();

            tokio::time::advance(Duration::from_secs(9)).await;
            assert!(store.get("k").await.unwrap().is_some());

            tokio::time::advance(Duration::from_secs(2)).await;
            assert!(store.get("k").await.unwrap().is_none());
            assert_eq!(store.db_size().await.unwrap(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn ttl_counts_down() {
            let store = InMemoryKeyValueStore::default();
            store.set("k", "v", 600).await.unwrap();
            tokio::time::advance(Duration::from_secs(100)).await;
            assert_eq!(store.ttl_ms("k").await.unwrap(), Some(500_000));
        }

        #[tokio::test(start_paused = true)]
        async fn rewrite_refreshes_ttl() {
            let store = InMemoryKeyValueStore::default();
            store.set("k", "v1", 10).await.unwrap();
            tokio::time::advance(Duration::from_secs(8)).await;
            store.set("k", "v2", 10).await.unwrap();
            tokio::time::advance(Duration::from_secs(8)).await;
            assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
        }
    }

    mod lru {
        use super::*;

        #[tokio::test]
        async fn evicts_least_recently_used() {
            let store = InMemoryKeyValueStore::new(2);
            store.set("a", "1", 60).await.unwrap();
            store.set("b", "2", 60).await.unwrap();
            store.get("a").await.unwrap();
            store.set("c", "3", 60).await.unwrap();

            assert!(store.get("a").await.unwrap().is_some());
            assert!(store.get("b").await.unwrap().is_none());
            assert!(store.get("c").await.unwrap().is_some());
        }

        #[tokio::test]
        async fn scan_returns_oldest_first() {
            let store = InMemoryKeyValueStore::default();
            for key in ["a", "b", "c", "d"] {
                store.set(key, "v", 60).await.unwrap();
            }
            store.get("a").await.unwrap();

            assert_eq!(store.scan(3).await.unwrap(), vec!["b", "c", "d"]);
        }
    }
}
