//! Short-lived cache for resolved streamer records and the app access token.
//!
//! Two key namespaces share one backend: `streamer:<name>` holds a
//! JSON-serialized [`StreamerRecord`], and `token` holds the raw bearer token.

pub mod memory;
pub mod redis_store;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

pub const TOKEN_KEY: &str = "token";
const RECORD_PREFIX: &str = "streamer:";

/// Live stream snapshot for one channel, as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamerRecord {
    pub channel_name: String,
    pub game: String,
    pub viewers: u64,
    pub is_live: bool,
    pub thumbnail: String,
}

impl StreamerRecord {
    /// Build a record for a channel that is currently broadcasting.
    pub fn live(
        channel_name: impl Into<String>,
        game: impl Into<String>,
        viewers: u64,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            channel_name: channel_name.into(),
            game: game.into(),
            viewers,
            is_live: true,
            thumbnail: thumbnail.into(),
        }
    }

    /// Zero-viewer streams count as offline.
    pub fn is_servable(&self) -> bool {
        self.is_live && self.viewers > 0
    }
}

/// Cache key for a channel name. Names are case-folded so `Alice` and
/// `alice` share an entry.
pub fn record_key(channel_name: &str) -> String {
    format!("{RECORD_PREFIX}{}", channel_name.trim().to_lowercase())
}

/// Unified error type for the stream-cache crate.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cache write for {key} was not acknowledged")]
    WriteRejected { key: String },

    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store with per-entry expiry, safe for concurrent use.
///
/// Reads never fail: a miss, a backend error, and an undecodable entry all
/// come back as `None` (the latter two are logged).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), CacheError>;

    async fn get_record(&self, channel_name: &str) -> Option<StreamerRecord>;

    /// Store `record` under its channel name for `ttl`.
    async fn put_record(&self, record: &StreamerRecord, ttl: Duration) -> Result<(), CacheError>;

    async fn get_token(&self) -> Option<String>;

    async fn put_token(&self, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Drop the cached token so the next read misses.
    async fn delete_token(&self) -> Result<(), CacheError>;
}

/// Expiry in whole seconds; Redis rejects `EX 0`.
pub(crate) fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}
