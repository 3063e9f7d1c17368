use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    core::types::{CheckRecord, Platform},
    server::{error::ApiError, AppState},
};

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub names: Option<Vec<String>>,
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub results: Vec<CheckRecord>,
}

/// `POST /check`
pub async fn check_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("rejected check body: {}", rejection.body_text());
        ApiError::bad_request("Send valid names array")
    })?;

    let names = match request.names {
        Some(names) if !names.is_empty() => names,
        _ => return Err(ApiError::bad_request("Send valid names array")),
    };

    let platforms = request
        .platforms
        .unwrap_or_default()
        .iter()
        .map(|p| p.parse::<Platform>())
        .collect::<Result<Vec<_>, _>>()?;

    let results = state.engine.probe_batch(&names, &platforms).await?;
    Ok(Json(CheckResponse { results }))
}

/// Plain `OPTIONS /check`; real preflights are answered by the CORS layer.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// `GET /health`
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
