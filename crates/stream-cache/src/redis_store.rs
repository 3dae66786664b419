//! Redis-backed [`RecordStore`].

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::{CacheError, RecordStore, StreamerRecord, TOKEN_KEY, record_key, ttl_secs};

/// Redis store over a multiplexed [`ConnectionManager`].
///
/// The manager is cloned per call, so concurrent workers share one
/// auto-reconnecting connection without extra locking.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect and verify the server answers `PING`.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Unavailable(format!("invalid Redis URL: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        let store = Self { conn };
        store.ping().await?;
        tracing::info!("Connected to Redis");
        Ok(store)
    }

    async fn get_string(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn set_string(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs(ttl))
            .query_async(&mut conn)
            .await?;

        match reply.as_deref() {
            Some("OK") => Ok(()),
            _ => Err(CacheError::WriteRejected {
                key: key.to_string(),
            }),
        }
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn get_record(&self, channel_name: &str) -> Option<StreamerRecord> {
        let key = record_key(channel_name);
        let raw = self.get_string(&key).await?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cannot decode cached record, treating as miss");
                None
            }
        }
    }

    async fn put_record(&self, record: &StreamerRecord, ttl: Duration) -> Result<(), CacheError> {
        let key = record_key(&record.channel_name);
        let serialized = serde_json::to_string(record)?;
        self.set_string(&key, &serialized, ttl).await
    }

    async fn get_token(&self) -> Option<String> {
        self.get_string(TOKEN_KEY).await.filter(|t| !t.is_empty())
    }

    async fn put_token(&self, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.set_string(TOKEN_KEY, value, ttl).await
    }

    async fn delete_token(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(TOKEN_KEY).await?;
        Ok(())
    }
}
