//! Integration tests for session persistence limits.
//!
//! These tests drive `SessionRepository` over the in-memory store with a
//! paused clock so TTL ordering is deterministic:
//! 1. Writing past the session cap evicts the earliest sessions
//! 2. The most recent sessions always survive a sweep
//! 3. Store configuration applies the memory cap and LRU policy

use std::sync::Arc;

use carrier_chat::adapters::session::InMemoryKeyValueStore;
use carrier_chat::application::{SessionPolicy, SessionRepository};
use carrier_chat::domain::foundation::SessionId;
use carrier_chat::domain::session::{FlowTag, SessionRecord};
use carrier_chat::ports::KeyValueStore;

fn sid(i: usize) -> SessionId {
    SessionId::new(format!("user-{i}")).unwrap()
}

fn busy_record(i: usize) -> SessionRecord {
    let mut record = SessionRecord::default();
    record.start_flow(FlowTag::Plan);
    record.push_turn(format!("요금제 추천해줘 {i}"), "데이터는 얼마나 사용하시나요?", 5);
    record
}

fn capped_policy() -> SessionPolicy {
    SessionPolicy {
        max_sessions: 500,
        sweep_one_in: 1,
        sweep_sample: 200,
        sweep_target_ratio: 0.9,
        ..SessionPolicy::default()
    }
}

#[tokio::test(start_paused = true)]
async fn writing_past_cap_evicts_earliest_sessions() {
    let store = Arc::new(InMemoryKeyValueStore::default());
    let repo = SessionRepository::new(store.clone(), capped_policy());

    for i in 0..600 {
        repo.save(&sid(i), &busy_record(i)).await;
    }

    let size = store.db_size().await.unwrap();
    assert!(size <= 500, "store holds {size} sessions");

    for i in 0..50 {
        let record = repo.load(&sid(i)).await;
        assert!(record.is_idle(), "session {i} should have been evicted");
        assert!(record.history.is_empty());
    }
    for i in 550..600 {
        let record = repo.load(&sid(i)).await;
        assert_eq!(record.flow, Some(FlowTag::Plan), "session {i} should survive");
        assert_eq!(record.history.len(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn sweep_lands_on_target_ratio() {
    let store = Arc::new(InMemoryKeyValueStore::default());
    let repo = SessionRepository::new(store.clone(), capped_policy());

    for i in 0..=500 {
        repo.save(&sid(i), &busy_record(i)).await;
    }

    assert_eq!(store.db_size().await.unwrap(), 450);
}

#[tokio::test]
async fn configure_store_sets_memory_policy() {
    let store = Arc::new(InMemoryKeyValueStore::default());
    let repo = SessionRepository::new(
        store.clone(),
        SessionPolicy {
            max_memory_mb: 64,
            ..SessionPolicy::default()
        },
    );

    repo.configure_store().await;

    assert_eq!(store.config_value("maxmemory").await, Some("64mb".to_string()));
    assert_eq!(
        store.config_value("maxmemory-policy").await,
        Some("allkeys-lru".to_string())
    );
}
