//! Streamer lookup endpoints.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::Value;

use crate::app::SharedState;
use crate::services::aggregator::AggregateError;
use crate::services::resolver::Resolution;

use super::err_json;

type ApiResult = Result<Json<Value>, (axum::http::StatusCode, Json<Value>)>;

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub users: Vec<BatchUser>,
}

#[derive(Debug, Deserialize)]
pub struct BatchUser {
    pub username: String,
}

/// POST /streamers/
pub async fn post_streamers(
    State(state): State<SharedState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body.map_err(|e| {
        tracing::warn!(error = %e, "Rejected streamer batch body");
        err_json(500, &e.body_text())
    })?;
    let names = request.users.into_iter().map(|u| u.username).collect();
    aggregate(&state, names).await
}

/// GET /streamers/
pub async fn get_default_streamers(State(state): State<SharedState>) -> ApiResult {
    let names = state.config().default_streamers.clone();
    aggregate(&state, names).await
}

/// GET /streamers/{name}
pub async fn get_streamer(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult {
    let name = name.trim();
    match state.resolver().resolve(name).await {
        Ok(Resolution::Found(record)) => records_json(&record),
        Ok(Resolution::NoProfile) => Err(err_json(404, "Streamer not found")),
        Ok(Resolution::NotLive) => Err(err_json(404, "Streamer is not live")),
        Err(e) => {
            tracing::warn!(streamer = %name, error = %e, "Single lookup failed");
            Err(err_json(502, &e.to_string()))
        }
    }
}

async fn aggregate(state: &SharedState, names: Vec<String>) -> ApiResult {
    match state.aggregator().aggregate(names).await {
        Ok(records) => records_json(&records),
        Err(AggregateError::CacheUnavailable(e)) => {
            tracing::error!(error = %e, "Cache unreachable, rejecting batch");
            Err(err_json(500, "Cache unavailable"))
        }
    }
}

fn records_json<T: serde::Serialize + ?Sized>(value: &T) -> ApiResult {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| err_json(500, &e.to_string()))
}
