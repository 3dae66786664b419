//! Runtime application configuration loaded from the environment.

use std::time::Duration;

use anyhow::Context;

use super::CacheBackend;
use super::defaults::{get_default, required_keys};
use super::validation::{split_list, validate_setting};

/// Runtime configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub token_ttl: Duration,
    pub record_ttl: Duration,
    pub request_timeout: Duration,
    pub default_streamers: Vec<String>,
    pub helix_base_url: String,
    pub oauth_token_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8000,
            cache_backend: CacheBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".into(),
            client_id: String::new(),
            client_secret: String::new(),
            token_ttl: Duration::from_secs(4_320_000),
            record_ttl: Duration::from_secs(600),
            request_timeout: twitch_client::DEFAULT_REQUEST_TIMEOUT,
            default_streamers: Vec::new(),
            helix_base_url: twitch_client::api::HELIX_BASE.into(),
            oauth_token_url: twitch_client::auth::DEFAULT_TOKEN_URL.into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load configuration from `lookup`, falling back to defaults for unset or
    /// empty keys. Every resolved value is validated.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let value = lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| get_default(key).map(str::to_string))
                .unwrap_or_default();
            if !value.is_empty() {
                validate_setting(key, &value)
                    .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
            }
            Ok(value)
        };

        let secs = |key: &str| -> Result<Duration, anyhow::Error> {
            let raw = g(key)?;
            let secs: u64 = raw.parse().with_context(|| format!("{key} must be an integer"))?;
            Ok(Duration::from_secs(secs))
        };

        let config = Self {
            server_port: g("PORT")?.parse().context("PORT must be a port number")?,
            cache_backend: g("CACHE_BACKEND")?.parse()?,
            redis_url: g("REDIS_URL")?,
            client_id: g("CLIENT_ID")?,
            client_secret: g("CLIENT_SECRET")?,
            token_ttl: secs("TOKEN_EXPIRES_TIME")?,
            record_ttl: secs("STREAMER_DATA_EXPIRES_TIME")?,
            request_timeout: secs("REQUEST_TIMEOUT_SECS")?,
            default_streamers: split_list(&g("DEFAULT_STREAMERS")?)
                .map(str::to_string)
                .collect(),
            helix_base_url: g("HELIX_BASE_URL")?,
            oauth_token_url: g("OAUTH_TOKEN_URL")?,
        };

        let missing = config.missing_settings(&lookup);
        if !missing.is_empty() {
            tracing::warn!(?missing, "Twitch credentials not configured; upstream calls will fail");
        }

        Ok(config)
    }

    /// Required keys with no value in `lookup`.
    fn missing_settings(&self, lookup: &impl Fn(&str) -> Option<String>) -> Vec<&'static str> {
        required_keys()
            .filter(|&key| lookup(key).is_none_or(|v| v.trim().is_empty()))
            .collect()
    }

    pub fn twitch_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
