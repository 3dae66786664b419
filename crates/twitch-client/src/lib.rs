//! Twitch integration client library.
//!
//! Provides the app-access-token grant and the Helix lookups needed to
//! resolve a streamer login to live stream data.

pub mod api;
pub mod auth;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeout applied to every upstream request unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// App access token obtained through the client-credentials grant.
///
/// The caller is responsible for caching this (e.g. via stream-cache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: i64,
}

impl AppToken {
    /// Seconds until the token expires, never negative.
    pub fn expires_in_secs(&self) -> u64 {
        let remaining = self.expires_at - chrono::Utc::now().timestamp();
        remaining.max(0) as u64
    }
}

/// Unified error type for the twitch-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    #[error("Twitch API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl TwitchError {
    /// Classify a reqwest failure, separating timeouts from other transport errors.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TwitchError::Timeout
        } else {
            TwitchError::Http(err)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TwitchError::ApiError { status: 401, .. })
    }
}

/// Build the shared HTTP client with a per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, TwitchError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(client)
}
