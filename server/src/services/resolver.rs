//! Cache-aside resolution of one streamer name to live stream data.

use std::sync::Arc;
use std::time::Duration;

use stream_cache::{RecordStore, StreamerRecord};
use twitch_client::TwitchError;

use super::token::TokenProvider;
use super::upstream::StreamerUpstream;

pub const THUMBNAIL_WIDTH: u32 = 640;
pub const THUMBNAIL_HEIGHT: u32 = 360;

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(StreamerRecord),
    /// The platform has no user with that login.
    NoProfile,
    /// The user exists but is offline or has zero viewers.
    NotLive,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("upstream authentication failed: {0}")]
    Auth(#[source] TwitchError),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] TwitchError),
}

pub struct StreamerResolver {
    store: Arc<dyn RecordStore>,
    upstream: Arc<dyn StreamerUpstream>,
    tokens: TokenProvider,
    record_ttl: Duration,
}

impl StreamerResolver {
    pub fn new(
        store: Arc<dyn RecordStore>,
        upstream: Arc<dyn StreamerUpstream>,
        token_ttl: Duration,
        record_ttl: Duration,
    ) -> Self {
        let tokens = TokenProvider::new(store.clone(), upstream.clone(), token_ttl);
        Self {
            store,
            upstream,
            tokens,
            record_ttl,
        }
    }

    pub async fn resolve(&self, name: &str) -> Result<Resolution, ResolveError> {
        if let Some(record) = self.store.get_record(name).await {
            tracing::debug!(streamer = %name, "Cache hit");
            if record.is_servable() {
                return Ok(Resolution::Found(record));
            }
            return Ok(Resolution::NotLive);
        }

        let token = self
            .tokens
            .access_token()
            .await
            .map_err(ResolveError::Auth)?;

        let profile = match self.upstream.resolve_profile(name, &token).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::info!(streamer = %name, "No data for user");
                return Ok(Resolution::NoProfile);
            }
            Err(e) => return Err(self.upstream_failure(e).await),
        };

        let stream = match self.upstream.fetch_live_status(&profile.id, &token).await {
            Ok(Some(stream)) if stream.viewer_count > 0 => stream,
            Ok(_) => {
                tracing::info!(streamer = %name, "No stream data for user");
                return Ok(Resolution::NotLive);
            }
            Err(e) => return Err(self.upstream_failure(e).await),
        };

        let record = StreamerRecord::live(
            profile.channel_name(),
            stream.game_name.clone(),
            stream.viewer_count,
            stream.thumbnail(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT),
        );

        if let Err(e) = self.store.put_record(&record, self.record_ttl).await {
            tracing::warn!(streamer = %name, error = %e, "Can't cache streamer record");
        }

        Ok(Resolution::Found(record))
    }

    /// A 401 means the cached token is stale; drop it so the next lookup
    /// re-authenticates. The failing request itself is not retried.
    async fn upstream_failure(&self, err: TwitchError) -> ResolveError {
        if err.is_unauthorized() {
            self.tokens.invalidate().await;
            return ResolveError::Auth(err);
        }
        ResolveError::Upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakeUpstream, resolver_with};
    use stream_cache::MemoryStore;

    #[tokio::test]
    async fn cache_hit_skips_upstream() {
        let store = Arc::new(MemoryStore::new());
        let cached = StreamerRecord::live("Alice", "Chess", 42, "thumb");
        store.put_record(&cached, Duration::from_secs(600)).await.unwrap();
        let upstream = Arc::new(FakeUpstream::new());
        let resolver = resolver_with(store, upstream.clone());

        let resolution = resolver.resolve("alice").await.unwrap();

        assert_eq!(resolution, Resolution::Found(cached));
        assert_eq!(upstream.total_calls(), 0);
    }

    #[tokio::test]
    async fn miss_fetches_and_writes_back() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(FakeUpstream::new().live("alice", "123", "Alice", "Chess", 42));
        let resolver = resolver_with(store.clone(), upstream.clone());

        let Resolution::Found(record) = resolver.resolve("alice").await.unwrap() else {
            panic!("expected a live record");
        };

        assert_eq!(record.channel_name, "Alice");
        assert_eq!(record.game, "Chess");
        assert_eq!(record.viewers, 42);
        assert!(record.is_live);
        assert_eq!(
            record.thumbnail,
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_alice-640x360.jpg"
        );
        assert_eq!(store.record_writes(), 1);
        assert_eq!(store.get_record("Alice").await, Some(record));
    }

    #[tokio::test]
    async fn unknown_profile_is_no_profile_without_write() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(FakeUpstream::new());
        let resolver = resolver_with(store.clone(), upstream.clone());

        assert_eq!(resolver.resolve("ghost").await.unwrap(), Resolution::NoProfile);
        assert_eq!(store.record_writes(), 0);
        assert_eq!(upstream.stream_calls(), 0);
    }

    #[tokio::test]
    async fn zero_viewers_is_not_live_without_write() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(FakeUpstream::new().live("bob", "7", "Bob", "Chess", 0));
        let resolver = resolver_with(store.clone(), upstream);

        assert_eq!(resolver.resolve("bob").await.unwrap(), Resolution::NotLive);
        assert_eq!(store.record_writes(), 0);
    }

    #[tokio::test]
    async fn offline_channel_is_not_live() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(FakeUpstream::new().offline("carol", "9", "Carol"));
        let resolver = resolver_with(store.clone(), upstream);

        assert_eq!(resolver.resolve("carol").await.unwrap(), Resolution::NotLive);
        assert_eq!(store.record_writes(), 0);
    }

    #[tokio::test]
    async fn cached_zero_viewer_record_is_not_live() {
        let store = Arc::new(MemoryStore::new());
        let stale = StreamerRecord::live("Dave", "Chess", 0, "");
        store.put_record(&stale, Duration::from_secs(600)).await.unwrap();
        let upstream = Arc::new(FakeUpstream::new());
        let resolver = resolver_with(store, upstream.clone());

        assert_eq!(resolver.resolve("dave").await.unwrap(), Resolution::NotLive);
        assert_eq!(upstream.total_calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_upstream_error() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(FakeUpstream::new().failing("alice"));
        let resolver = resolver_with(store.clone(), upstream);

        let err = resolver.resolve("alice").await.unwrap_err();
        assert!(matches!(err, ResolveError::Upstream(TwitchError::Timeout)));
        assert_eq!(store.record_writes(), 0);
    }

    #[tokio::test]
    async fn token_failure_is_auth_error() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(
            FakeUpstream::new()
                .live("alice", "123", "Alice", "Chess", 42)
                .failing_token(),
        );
        let resolver = resolver_with(store, upstream.clone());

        let err = resolver.resolve("alice").await.unwrap_err();
        assert!(matches!(err, ResolveError::Auth(_)));
        assert_eq!(upstream.profile_calls(), 0);
    }

    #[tokio::test]
    async fn unauthorized_evicts_cached_token() {
        let store = Arc::new(MemoryStore::new());
        store.put_token("stale", Duration::from_secs(600)).await.unwrap();
        let upstream = Arc::new(FakeUpstream::new().unauthorized("alice"));
        let resolver = resolver_with(store.clone(), upstream);

        let err = resolver.resolve("alice").await.unwrap_err();
        assert!(matches!(err, ResolveError::Auth(_)));
        assert!(store.get_token().await.is_none());
    }

    #[tokio::test]
    async fn failed_cache_write_still_returns_record() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(FakeUpstream::new().live("alice", "123", "Alice", "Chess", 42));
        let resolver = resolver_with(store.clone(), upstream);
        // Token gets cached first so only the record write hits the outage.
        resolver.tokens.access_token().await.unwrap();
        store.set_available(false);

        let resolution = resolver.resolve("alice").await.unwrap();

        assert!(matches!(resolution, Resolution::Found(_)));
        assert_eq!(store.record_writes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_record_triggers_fresh_fetch() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(FakeUpstream::new().live("alice", "123", "Alice", "Chess", 42));
        let resolver = resolver_with(store, upstream.clone());

        resolver.resolve("alice").await.unwrap();
        resolver.resolve("alice").await.unwrap();
        assert_eq!(upstream.profile_calls(), 1);

        tokio::time::advance(Duration::from_secs(601)).await;
        resolver.resolve("alice").await.unwrap();
        assert_eq!(upstream.profile_calls(), 2);
    }
}
