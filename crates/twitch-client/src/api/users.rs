use super::*;

impl TwitchApiClient {
    /// Get user profile by login name. An unknown login is `Ok(None)`, not an error.
    pub async fn get_user_by_login(
        &self,
        access_token: &str,
        login: &str,
    ) -> Result<Option<TwitchUser>, TwitchError> {
        let url = self.endpoint("users", &[("login", login)])?;
        let body = self.authenticated_get(url, access_token).await?;
        parse_first_user(&body)
    }
}

pub(super) fn parse_first_user(body: &str) -> Result<Option<TwitchUser>, TwitchError> {
    let resp: HelixResponse<TwitchUser> = serde_json::from_str(body)?;
    Ok(resp.data.into_iter().next())
}
