//! Session repository - bounded, fail-soft persistence of session records.
//!
//! Wraps a `KeyValueStore` and enforces the size, capacity and eviction
//! contracts. No operation here returns an error: reads degrade to an
//! empty record, writes and deletes log and move on.

use std::sync::Arc;

use rand::Rng;

use crate::domain::foundation::SessionId;
use crate::domain::session::{self, SessionRecord, DEFAULT_HISTORY_PAIRS};
use crate::ports::KeyValueStore;

const KEY_PREFIX: &str = "session:";

/// Limits applied to stored sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPolicy {
    /// TTL applied on every write.
    pub ttl_secs: u64,
    /// Entry count above which a sweep trims the store.
    pub max_sessions: usize,
    /// Hard memory cap handed to the backing store.
    pub max_memory_mb: u64,
    /// Encoded size above which the TTL is halved.
    pub soft_limit_bytes: usize,
    /// A sweep check runs on one write in this many.
    pub sweep_one_in: u32,
    /// Keys inspected per sweep.
    pub sweep_sample: usize,
    /// Share of `max_sessions` a sweep trims down to.
    pub sweep_target_ratio: f64,
    /// Conversation pairs kept per session.
    pub history_pairs: usize,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            max_sessions: 500,
            max_memory_mb: 50,
            soft_limit_bytes: 2_048,
            sweep_one_in: 10,
            sweep_sample: 200,
            sweep_target_ratio: 0.9,
            history_pairs: DEFAULT_HISTORY_PAIRS,
        }
    }
}

impl SessionPolicy {
    fn sweep_target(&self) -> usize {
        (self.max_sessions as f64 * self.sweep_target_ratio).floor() as usize
    }
}

/// Reads and writes session records through a key/value store.
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn KeyValueStore>,
    policy: SessionPolicy,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, policy: SessionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    fn key(id: &SessionId) -> String {
        format!("{}{}", KEY_PREFIX, id.as_str())
    }

    /// Applies the memory cap and LRU eviction policy to the backing store.
    pub async fn configure_store(&self) {
        let settings = [
            ("maxmemory", format!("{}mb", self.policy.max_memory_mb)),
            ("maxmemory-policy", "allkeys-lru".to_string()),
        ];
        for (name, value) in settings {
            if let Err(e) = self.store.config_set(name, &value).await {
                tracing::warn!(setting = name, error = %e, "Failed to configure session store");
            }
        }
    }

    /// Loads a session, returning an empty record when missing or unreadable.
    ///
    /// Records written under legacy keys, or carrying stray slots or an
    /// inconsistent flow position, are repaired and written back.
    pub async fn load(&self, id: &SessionId) -> SessionRecord {
        let raw = match self.store.get(&Self::key(id)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return SessionRecord::default(),
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Session read failed, starting fresh");
                return SessionRecord::default();
            }
        };

        let decoded = match session::decode(&raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Unreadable session record, starting fresh");
                return SessionRecord::default();
            }
        };

        if decoded.needs_rewrite {
            tracing::debug!(session_id = %id, "Rewriting migrated session record");
            self.save(id, &decoded.record).await;
        }
        decoded.record
    }

    /// Writes a session with a fresh TTL.
    pub async fn save(&self, id: &SessionId, record: &SessionRecord) {
        let encoded = match session::encode(record, self.policy.history_pairs) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Failed to encode session");
                return;
            }
        };

        let mut ttl = self.policy.ttl_secs;
        if encoded.len() > self.policy.soft_limit_bytes {
            ttl = (ttl / 2).max(1);
            tracing::debug!(
                session_id = %id,
                size = encoded.len(),
                ttl_secs = ttl,
                "Oversized session, shortening TTL"
            );
        }

        if let Err(e) = self.store.set(&Self::key(id), &encoded, ttl).await {
            tracing::warn!(session_id = %id, error = %e, "Session write failed");
            return;
        }

        let roll = self.policy.sweep_one_in <= 1
            || rand::thread_rng().gen_range(0..self.policy.sweep_one_in) == 0;
        if roll {
            self.sweep().await;
        }
    }

    /// Removes a session. Best effort.
    pub async fn delete(&self, id: &SessionId) {
        if let Err(e) = self.store.delete(&Self::key(id)).await {
            tracing::warn!(session_id = %id, error = %e, "Session delete failed");
        }
    }

    /// Trims the store when it holds more than `max_sessions` entries.
    ///
    /// Sessions from a bounded sample are removed shortest remaining TTL
    /// first until the count reaches the target. Returns the number removed.
    pub async fn sweep(&self) -> usize {
        let size = match self.store.db_size().await {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(error = %e, "Session sweep could not size the store");
                return 0;
            }
        };
        if size <= self.policy.max_sessions {
            return 0;
        }

        let keys = match self.store.scan(self.policy.sweep_sample).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Session sweep scan failed");
                return 0;
            }
        };

        let mut candidates = Vec::with_capacity(keys.len());
        for key in keys.into_iter().filter(|k| k.starts_with(KEY_PREFIX)) {
            match self.store.ttl_ms(&key).await {
                Ok(ttl) => candidates.push((ttl.unwrap_or(u64::MAX), key)),
                Err(e) => tracing::warn!(key = %key, error = %e, "Session sweep TTL lookup failed"),
            }
        }
        candidates.sort_by_key(|(ttl, _)| *ttl);

        let excess = size.saturating_sub(self.policy.sweep_target());
        let mut removed = 0;
        for (_, key) in candidates.into_iter().take(excess) {
            match self.store.delete(&key).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(key = %key, error = %e, "Session sweep delete failed"),
            }
        }

        tracing::info!(before = size, removed, "Swept session store");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session::InMemoryKeyValueStore;
    use crate::domain::session::FlowTag;
    use crate::ports::StoreError;
    use async_trait::async_trait;

    fn sid(id: &str) -> SessionId {
        SessionId::new(id).unwrap()
    }

    fn repository(store: Arc<InMemoryKeyValueStore>, policy: SessionPolicy) -> SessionRepository {
        SessionRepository::new(store, policy)
    }

    fn no_sweep() -> SessionPolicy {
        SessionPolicy {
            sweep_one_in: u32::MAX,
            ..SessionPolicy::default()
        }
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::connection("down"))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), StoreError> {
            Err(StoreError::connection("down"))
        }
        async fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::connection("down"))
        }
        async fn db_size(&self) -> Result<usize, StoreError> {
            Err(StoreError::connection("down"))
        }
        async fn scan(&self, _limit: usize) -> Result<Vec<String>, StoreError> {
            Err(StoreError::connection("down"))
        }
        async fn ttl_ms(&self, _key: &str) -> Result<Option<u64>, StoreError> {
            Err(StoreError::connection("down"))
        }
        async fn config_set(&self, _name: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::connection("down"))
        }
    }

    mod reads_and_writes {
        use super::*;

        #[tokio::test]
        async fn missing_session_is_empty() {
            let repo = repository(Arc::new(InMemoryKeyValueStore::default()), no_sweep());
            assert_eq!(repo.load(&sid("new")).await, SessionRecord::default());
        }

        #[tokio::test]
        async fn saved_session_round_trips() {
            let repo = repository(Arc::new(InMemoryKeyValueStore::default()), no_sweep());
            let mut record = SessionRecord::default();
            record.start_flow(FlowTag::Plan);
            record.slots.insert("data_usage".into(), "무제한".into());
            record.step = 2;

            repo.save(&sid("s1"), &record).await;
            assert_eq!(repo.load(&sid("s1")).await, record);
        }

        #[tokio::test]
        async fn delete_forgets_session() {
            let repo = repository(Arc::new(InMemoryKeyValueStore::default()), no_sweep());
            let mut record = SessionRecord::default();
            record.start_flow(FlowTag::Subscription);
            repo.save(&sid("s1"), &record).await;

            repo.delete(&sid("s1")).await;
            assert!(repo.load(&sid("s1")).await.is_idle());
        }

        #[tokio::test]
        async fn broken_store_degrades_silently() {
            let repo = SessionRepository::new(Arc::new(BrokenStore), SessionPolicy::default());
            let mut record = SessionRecord::default();
            record.start_flow(FlowTag::Plan);

            repo.save(&sid("s1"), &record).await;
            repo.delete(&sid("s1")).await;
            repo.configure_store().await;
            assert_eq!(repo.load(&sid("s1")).await, SessionRecord::default());
            assert_eq!(repo.sweep().await, 0);
        }

        #[tokio::test]
        async fn garbage_record_reads_as_fresh() {
            let store = Arc::new(InMemoryKeyValueStore::default());
            store.set("session:s1", "not json", 600).await.unwrap();
            let repo = repository(store, no_sweep());

            assert_eq!(repo.load(&sid("s1")).await, SessionRecord::default());
        }

        #[tokio::test]
        async fn legacy_record_is_rewritten_in_compact_form() {
            let store = Arc::new(InMemoryKeyValueStore::default());
            store
                .set(
                    "session:s1",
                    r#"{"flow_type":"plan_flow","plan_step":2,"user_answers":{"data":"무제한"}}"#,
                    600,
                )
                .await
                .unwrap();
            let repo = repository(store.clone(), no_sweep());

            let record = repo.load(&sid("s1")).await;
            assert_eq!(record.flow, Some(FlowTag::Plan));
            assert_eq!(record.slots.get("data_usage").map(String::as_str), Some("무제한"));

            let stored = store.get("session:s1").await.unwrap().unwrap();
            assert!(stored.contains("\"f\""));
            assert!(!stored.contains("flow_type"));
        }

        #[tokio::test]
        async fn store_is_configured_for_lru() {
            let store = Arc::new(InMemoryKeyValueStore::default());
            let repo = repository(store.clone(), no_sweep());
            repo.configure_store().await;

            assert_eq!(store.config_value("maxmemory").await.as_deref(), Some("50mb"));
            assert_eq!(
                store.config_value("maxmemory-policy").await.as_deref(),
                Some("allkeys-lru")
            );
        }
    }

    mod size_bound {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn oversized_record_gets_half_ttl() {
            let store = Arc::new(InMemoryKeyValueStore::default());
            let repo = repository(
                store.clone(),
                SessionPolicy {
                    soft_limit_bytes: 64,
                    ..no_sweep()
                },
            );
            let mut record = SessionRecord::default();
            record.push_turn("요금제 추천해줘".repeat(5), "데이터는 얼마나 사용하시나요?".repeat(5), 5);

            repo.save(&sid("big"), &record).await;
            let ttl = store.ttl_ms("session:big").await.unwrap().unwrap();
            assert!(ttl <= 300_000);
        }

        #[tokio::test(start_paused = true)]
        async fn small_record_gets_full_ttl() {
            let store = Arc::new(InMemoryKeyValueStore::default());
            let repo = repository(store.clone(), no_sweep());

            repo.save(&sid("small"), &SessionRecord::default()).await;
            let ttl = store.ttl_ms("session:small").await.unwrap().unwrap();
            assert!(ttl > 300_000);
        }
    }

    mod capacity {
        use super::*;

        fn tight(max_sessions: usize) -> SessionPolicy {
            SessionPolicy {
                max_sessions,
                sweep_one_in: 1,
                ..SessionPolicy::default()
            }
        }

        #[tokio::test(start_paused = true)]
        async fn sweep_is_noop_under_cap() {
            let store = Arc::new(InMemoryKeyValueStore::default());
            let repo = repository(store.clone(), tight(10));
            for i in 0..10 {
                repo.save(&sid(&format!("s{i}")), &SessionRecord::default()).await;
            }
            assert_eq!(store.db_size().await.unwrap(), 10);
        }

        #[tokio::test(start_paused = true)]
        async fn sweep_trims_oldest_to_target() {
            let store = Arc::new(InMemoryKeyValueStore::default());
            let repo = repository(store.clone(), tight(10));
            for i in 0..11 {
                repo.save(&sid(&format!("s{i}")), &SessionRecord::default()).await;
            }

            assert_eq!(store.db_size().await.unwrap(), 9);
            assert!(store.get("session:s0").await.unwrap().is_none());
            assert!(store.get("session:s1").await.unwrap().is_none());
            assert!(store.get("session:s10").await.unwrap().is_some());
        }
    }
}
