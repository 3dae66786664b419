//! Cached app access token with single-flight refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use stream_cache::RecordStore;
use twitch_client::{AppToken, TwitchError};

use super::upstream::StreamerUpstream;

/// Hands out the shared bearer token, fetching it on a cache miss.
///
/// Concurrent misses are serialized behind `refresh_lock`; waiters re-read
/// the cache after acquiring it, so one miss triggers one fetch.
pub struct TokenProvider {
    store: Arc<dyn RecordStore>,
    upstream: Arc<dyn StreamerUpstream>,
    max_ttl: Duration,
    refresh_lock: Mutex<()>,
}

impl TokenProvider {
    pub fn new(
        store: Arc<dyn RecordStore>,
        upstream: Arc<dyn StreamerUpstream>,
        max_ttl: Duration,
    ) -> Self {
        Self {
            store,
            upstream,
            max_ttl,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn access_token(&self) -> Result<String, TwitchError> {
        if let Some(token) = self.store.get_token().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.store.get_token().await {
            tracing::debug!("Token refreshed by a concurrent worker");
            return Ok(token);
        }

        let token = self.upstream.fetch_token().await?;
        let ttl = cache_ttl(&token, self.max_ttl);
        if let Err(e) = self.store.put_token(&token.access_token, ttl).await {
            tracing::warn!(error = %e, "Failed to cache app token");
        }
        tracing::info!(ttl_secs = ttl.as_secs(), "App token refreshed");
        Ok(token.access_token)
    }

    /// Evict the cached token after the upstream rejected it.
    pub async fn invalidate(&self) {
        if let Err(e) = self.store.delete_token().await {
            tracing::warn!(error = %e, "Failed to evict rejected app token");
        }
    }
}

/// Cache for the shorter of the token's own lifetime and the configured cap.
fn cache_ttl(token: &AppToken, max_ttl: Duration) -> Duration {
    match token.expires_in_secs() {
        0 => max_ttl,
        secs => max_ttl.min(Duration::from_secs(secs)),
    }
}
