//! Twitch Helix REST API client.
//!
//! Provides typed access to the user and stream lookups with automatic
//! Bearer token + Client-ID header injection.

mod request;
mod streams;
mod users;

pub mod models;

pub use models::{HelixResponse, StreamInfo, TwitchUser};

use crate::TwitchError;

pub const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Twitch Helix API client with automatic auth header injection.
#[derive(Clone)]
pub struct TwitchApiClient {
    pub(super) http: reqwest::Client,
    pub(super) client_id: String,
    pub(super) base_url: String,
}
