//! In-process [`RecordStore`] for single-instance deployments and tests.
//!
//! Entries are stored serialized, like in Redis, so decode failures behave
//! the same way. Expiry is measured with `tokio::time::Instant`, which
//! follows a paused test clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{CacheError, RecordStore, StreamerRecord, TOKEN_KEY, record_key};

/// Map size past which a write first drops every expired entry.
const SWEEP_THRESHOLD: usize = 1024;

struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    unavailable: AtomicBool,
    record_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of successful `put_record` calls.
    pub fn record_writes(&self) -> usize {
        self.record_writes.load(Ordering::SeqCst)
    }

    /// Store a raw value under a record key, bypassing serialization.
    pub async fn insert_raw(&self, channel_name: &str, raw: &str, ttl: Duration) {
        self.set(record_key(channel_name), raw.to_string(), ttl).await;
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }

    async fn get(&self, key: &str) -> Option<String> {
        if self.is_unavailable() {
            tracing::warn!(key = %key, "Cache unavailable, treating as miss");
            return None;
        }
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: evict lazily.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: String, value: String, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if entries.len() >= SWEEP_THRESHOLD {
            let before = entries.len();
            entries.retain(|_, e| e.expires_at > now);
            tracing::debug!(evicted = before - entries.len(), "Swept expired cache entries");
        }
        entries.insert(
            key,
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.is_unavailable() {
            return Err(CacheError::Unavailable("memory store marked unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<(), CacheError> {
        self.check_available()
    }

    async fn get_record(&self, channel_name: &str) -> Option<StreamerRecord> {
        let key = record_key(channel_name);
        let raw = self.get(&key).await?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cannot decode cached record, treating as miss");
                None
            }
        }
    }

    async fn put_record(&self, record: &StreamerRecord, ttl: Duration) -> Result<(), CacheError> {
        self.check_available()?;
        let serialized = serde_json::to_string(record)?;
        self.set(record_key(&record.channel_name), serialized, ttl)
            .await;
        self.record_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_token(&self) -> Option<String> {
        self.get(TOKEN_KEY).await.filter(|t| !t.is_empty())
    }

    async fn put_token(&self, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.check_available()?;
        self.set(TOKEN_KEY.to_string(), value.to_string(), ttl).await;
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), CacheError> {
        self.check_available()?;
        self.entries.write().await.remove(TOKEN_KEY);
        Ok(())
    }
}
