//! Seam between the resolution logic and the Twitch API.

use async_trait::async_trait;

use twitch_client::api::{StreamInfo, TwitchApiClient, TwitchUser};
use twitch_client::auth::TwitchAuth;
use twitch_client::{AppToken, TwitchError};

use crate::config::AppConfig;

/// Upstream lookups needed to resolve a streamer.
///
/// Empty results (`Ok(None)`) mean "no such user" or "not live" and are
/// distinct from transport and decode failures.
#[async_trait]
pub trait StreamerUpstream: Send + Sync {
    async fn fetch_token(&self) -> Result<AppToken, TwitchError>;

    async fn resolve_profile(
        &self,
        login: &str,
        access_token: &str,
    ) -> Result<Option<TwitchUser>, TwitchError>;

    async fn fetch_live_status(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Option<StreamInfo>, TwitchError>;
}

/// Production upstream backed by the Helix API.
pub struct TwitchUpstream {
    auth: TwitchAuth,
    api: TwitchApiClient,
}

impl TwitchUpstream {
    pub fn new(auth: TwitchAuth, api: TwitchApiClient) -> Self {
        Self { auth, api }
    }

    /// Build both clients from config, sharing one timeout-bounded HTTP client.
    pub fn from_config(config: &AppConfig) -> Result<Self, TwitchError> {
        let http = twitch_client::build_http_client(config.request_timeout)?;
        let auth = TwitchAuth::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            http.clone(),
        )
        .with_token_url(config.oauth_token_url.clone());
        let api = TwitchApiClient::new(config.client_id.clone(), http)
            .with_base_url(config.helix_base_url.clone());
        Ok(Self::new(auth, api))
    }
}

#[async_trait]
impl StreamerUpstream for TwitchUpstream {
    async fn fetch_token(&self) -> Result<AppToken, TwitchError> {
        self.auth.fetch_app_token().await
    }

    async fn resolve_profile(
        &self,
        login: &str,
        access_token: &str,
    ) -> Result<Option<TwitchUser>, TwitchError> {
        self.api.get_user_by_login(access_token, login).await
    }

    async fn fetch_live_status(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Option<StreamInfo>, TwitchError> {
        self.api.get_live_stream(access_token, user_id).await
    }
}
