//! In-process upstream double for service and handler tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use stream_cache::MemoryStore;
use twitch_client::api::{StreamInfo, TwitchUser};
use twitch_client::{AppToken, TwitchError};

use super::resolver::StreamerResolver;
use super::upstream::StreamerUpstream;

pub const FAKE_TOKEN: &str = "fake-token";

#[derive(Default)]
pub struct FakeUpstream {
    channels: HashMap<String, (TwitchUser, Option<StreamInfo>)>,
    failing: HashSet<String>,
    unauthorized: HashSet<String>,
    failing_token: bool,
    latency_ms: (u64, u64),
    token_calls: AtomicUsize,
    profile_calls: AtomicUsize,
    stream_calls: AtomicUsize,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each call sleeps a random duration in `min_ms..=max_ms`.
    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = (min_ms, max_ms);
        self
    }

    pub fn live(mut self, login: &str, id: &str, display: &str, game: &str, viewers: u64) -> Self {
        let stream = StreamInfo {
            id: format!("stream-{id}"),
            user_id: id.into(),
            user_login: login.into(),
            user_name: display.into(),
            game_name: game.into(),
            title: format!("{display} live"),
            viewer_count: viewers,
            started_at: None,
            thumbnail_url: format!(
                "https://static-cdn.jtvnw.net/previews-ttv/live_user_{login}-{{width}}x{{height}}.jpg"
            ),
            stream_type: "live".into(),
        };
        self.channels
            .insert(login.to_lowercase(), (user(login, id, display), Some(stream)));
        self
    }

    pub fn offline(mut self, login: &str, id: &str, display: &str) -> Self {
        self.channels
            .insert(login.to_lowercase(), (user(login, id, display), None));
        self
    }

    /// Profile lookups for `login` time out.
    pub fn failing(mut self, login: &str) -> Self {
        self.failing.insert(login.to_lowercase());
        self
    }

    /// Profile lookups for `login` are rejected with a 401.
    pub fn unauthorized(mut self, login: &str) -> Self {
        self.unauthorized.insert(login.to_lowercase());
        self
    }

    pub fn failing_token(mut self) -> Self {
        self.failing_token = true;
        self
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.token_calls() + self.profile_calls() + self.stream_calls()
    }

    async fn delay(&self) {
        let (min, max) = self.latency_ms;
        if max == 0 {
            return;
        }
        let ms = rand::thread_rng().gen_range(min..=max);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

fn user(login: &str, id: &str, display: &str) -> TwitchUser {
    TwitchUser {
        id: id.into(),
        login: login.into(),
        display_name: display.into(),
        broadcaster_type: String::new(),
        description: String::new(),
        profile_image_url: String::new(),
        created_at: String::new(),
    }
}

#[async_trait]
impl StreamerUpstream for FakeUpstream {
    async fn fetch_token(&self) -> Result<AppToken, TwitchError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        if self.failing_token {
            return Err(TwitchError::TokenRequestFailed("invalid client".into()));
        }
        Ok(AppToken {
            access_token: FAKE_TOKEN.into(),
            token_type: "bearer".into(),
            expires_at: unix_now() + 3600,
        })
    }

    async fn resolve_profile(
        &self,
        login: &str,
        _access_token: &str,
    ) -> Result<Option<TwitchUser>, TwitchError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        let key = login.to_lowercase();
        if self.failing.contains(&key) {
            return Err(TwitchError::Timeout);
        }
        if self.unauthorized.contains(&key) {
            return Err(TwitchError::ApiError {
                status: 401,
                message: "Invalid OAuth token".into(),
            });
        }
        Ok(self.channels.get(&key).map(|(user, _)| user.clone()))
    }

    async fn fetch_live_status(
        &self,
        user_id: &str,
        _access_token: &str,
    ) -> Result<Option<StreamInfo>, TwitchError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        Ok(self
            .channels
            .values()
            .find(|(user, _)| user.id == user_id)
            .and_then(|(_, stream)| stream.clone()))
    }
}

pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Resolver over the given doubles with a 60s token cap and 600s record TTL.
pub fn resolver_with(store: Arc<MemoryStore>, upstream: Arc<FakeUpstream>) -> StreamerResolver {
    StreamerResolver::new(
        store,
        upstream,
        Duration::from_secs(60),
        Duration::from_secs(600),
    )
}
