use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

use super::*;

impl TwitchApiClient {
    pub fn new(client_id: String, http: reqwest::Client) -> Self {
        Self {
            http,
            client_id,
            base_url: HELIX_BASE.to_string(),
        }
    }

    /// Point the client at a different Helix root (e.g. a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build `{base}/{path}?{query}` with properly escaped query values.
    pub(super) fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, TwitchError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Ok(Url::parse_with_params(&raw, query)?)
    }

    /// Build auth headers from the given access token.
    fn auth_headers(&self, access_token: &str) -> Result<HeaderMap, TwitchError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| {
            TwitchError::TokenRequestFailed("access token is not a valid header value".into())
        })?;
        let client_id = HeaderValue::from_str(&self.client_id).map_err(|_| {
            TwitchError::TokenRequestFailed("client id is not a valid header value".into())
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Client-Id", client_id);
        Ok(headers)
    }

    /// Execute a GET request with auth headers. A 401 is surfaced to the caller;
    /// nothing is retried here.
    pub(super) async fn authenticated_get(
        &self,
        url: Url,
        access_token: &str,
    ) -> Result<String, TwitchError> {
        let headers = self.auth_headers(access_token)?;
        let resp = self
            .http
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(TwitchError::from_transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TwitchError::from_transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %url, "Got 401, cached token should be discarded");
        }

        if !status.is_success() {
            return Err(TwitchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}
