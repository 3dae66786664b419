use super::*;

impl TwitchApiClient {
    /// Get the live stream for a broadcaster. An offline channel is `Ok(None)`.
    pub async fn get_live_stream(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Option<StreamInfo>, TwitchError> {
        let url = self.endpoint("streams", &[("user_id", user_id)])?;
        let body = self.authenticated_get(url, access_token).await?;
        parse_first_stream(&body)
    }
}

pub(super) fn parse_first_stream(body: &str) -> Result<Option<StreamInfo>, TwitchError> {
    let resp: HelixResponse<StreamInfo> = serde_json::from_str(body)?;
    Ok(resp.data.into_iter().next())
}
