//! Redis-backed key/value store.
//!
//! Every command runs under a per-operation deadline. The multiplexed
//! connection is cloned per call, so concurrent requests share one socket.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{FromRedisValue, RedisError};
use std::time::Duration;

use crate::ports::{KeyValueStore, StoreError};

/// Redis key/value store.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    conn: MultiplexedConnection,
    timeout: Duration,
}

impl RedisKeyValueStore {
    /// Wraps an existing connection.
    pub fn new(conn: MultiplexedConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::connection(e.to_string()))?;
        let conn = tokio::time::timeout(timeout, client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| StoreError::Timeout {
                timeout_secs: timeout.as_secs(),
            })?
            .map_err(|e| StoreError::connection(e.to_string()))?;
        Ok(Self::new(conn, timeout))
    }

    /// Runs one command under the deadline.
    async fn query<T: FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T, StoreError> {
        let mut conn = self.conn.clone();
        tokio::time::timeout(self.timeout, cmd.query_async::<_, T>(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(map_redis_error)
    }
}

fn map_redis_error(e: RedisError) -> StoreError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_io_error() {
        StoreError::connection(e.to_string())
    } else if e.is_timeout() {
        StoreError::Timeout { timeout_secs: 0 }
    } else {
        StoreError::command(e.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.query(redis::cmd("GET").arg(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if ttl_secs > 0 {
            cmd.arg("EX").arg(ttl_secs);
        }
        self.query::<()>(&cmd).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.query::<i64>(redis::cmd("DEL").arg(key)).await?;
        Ok(())
    }

    async fn db_size(&self) -> Result<usize, StoreError> {
        self.query(&redis::cmd("DBSIZE")).await
    }

    async fn scan(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::with_capacity(limit);
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = self
                .query(redis::cmd("SCAN").arg(cursor).arg("COUNT").arg(limit.max(10)))
                .await?;
            keys.extend(batch);
            if next == 0 || keys.len() >= limit {
                break;
            }
            cursor = next;
        }
        keys.truncate(limit);
        Ok(keys)
    }

    async fn ttl_ms(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let pttl: i64 = self.query(redis::cmd("PTTL").arg(key)).await?;
        // -2: missing key, -1: no expiry
        Ok(u64::try_from(pttl).ok())
    }

    async fn config_set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.query::<()>(redis::cmd("CONFIG").arg("SET").arg(name).arg(value))
            .await
    }
}
