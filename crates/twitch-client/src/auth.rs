//! App access token retrieval for Twitch authentication.
//!
//! Uses the OAuth client-credentials grant; the resulting token is scoped
//! to the application, not to any particular user.

use chrono::Utc;
use serde::Deserialize;

use crate::{AppToken, TwitchError};

pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Twitch OAuth token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    token_type: String,
}

/// Twitch OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

/// Exchanges client credentials for an app access token.
pub struct TwitchAuth {
    client_id: String,
    client_secret: String,
    token_url: String,
    http: reqwest::Client,
}

impl TwitchAuth {
    pub fn new(client_id: String, client_secret: String, http: reqwest::Client) -> Self {
        Self {
            client_id,
            client_secret,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            http,
        }
    }

    /// Point the grant at a different token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Request a fresh app access token.
    pub async fn fetch_app_token(&self) -> Result<AppToken, TwitchError> {
        tracing::info!("Requesting Twitch app access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(&self.token_url)
            .header("Client-Id", &self.client_id)
            .form(&params)
            .send()
            .await
            .map_err(TwitchError::from_transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TwitchError::from_transport)?;
        parse_token_response(status.as_u16(), &body)
    }
}

/// Longest lifetime accepted from the token endpoint.
const MAX_EXPIRES_IN: i64 = i32::MAX as i64;

/// Parse the token endpoint response into an [`AppToken`].
///
/// A missing or non-positive `expires_in` yields a token that is already
/// due, leaving the lifetime to the caller's cap.
pub fn parse_token_response(status: u16, body: &str) -> Result<AppToken, TwitchError> {
    if !(200..300).contains(&status) {
        let err: ErrorResponse = serde_json::from_str(body).unwrap_or(ErrorResponse {
            status: Some(status),
            message: Some(body.to_string()),
        });
        return Err(TwitchError::TokenRequestFailed(format!(
            "{}: {}",
            err.status.unwrap_or(status),
            err.message.unwrap_or_default()
        )));
    }

    let token_resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| TwitchError::TokenRequestFailed(format!("failed to parse response: {e}")))?;

    if token_resp.access_token.is_empty() {
        return Err(TwitchError::TokenRequestFailed(
            "response carried an empty access token".into(),
        ));
    }

    Ok(AppToken {
        access_token: token_resp.access_token,
        token_type: token_resp.token_type,
        expires_at: Utc::now()
            .timestamp()
            .saturating_add(token_resp.expires_in.clamp(0, MAX_EXPIRES_IN)),
    })
}
