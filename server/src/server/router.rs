use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use super::api;
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        // --- Streamers ---
        .route(
            "/streamers/",
            get(api::streamers::get_default_streamers).post(api::streamers::post_streamers),
        )
        .route("/streamers/{name}", get(api::streamers::get_streamer))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) async fn status_handler(State(state): State<SharedState>) -> Json<Value> {
    let cache = state.store().ping().await.is_ok();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cache": cache,
        "twitch_configured": state.config().twitch_configured(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::services::testing::FakeUpstream;
    use stream_cache::MemoryStore;

    #[tokio::test]
    async fn status_reports_cache_reachability() {
        let store = Arc::new(MemoryStore::new());
        let state = SharedState::new(
            AppConfig::default(),
            store.clone(),
            Arc::new(FakeUpstream::new()),
        );

        let Json(body) = status_handler(State(state.clone())).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cache"], true);
        assert_eq!(body["twitch_configured"], false);

        store.set_available(false);
        let Json(body) = status_handler(State(state)).await;
        assert_eq!(body["cache"], false);
    }
}
