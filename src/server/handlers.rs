use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::EvaluationContext;

/// Optional body of the evaluate endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateFlagRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateFlagResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    pub flag_key: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListFlagsParams {
    /// Comma-separated flag keys.
    pub keys: Option<String>,
}

/// GET /ping
pub async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({ "ping": "pong" }))
}

/// GET /flags
pub async fn list_flags(
    State(state): State<AppState>,
    Query(params): Query<ListFlagsParams>,
) -> Response {
    let Some(keys) = params.keys else {
        return Json(state.flags.list_flags().await).into_response();
    };

    let keys: Vec<String> = keys
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
        .collect();

    match state.flags.get_flags(&keys).await {
        Ok(flags) => Json(flags).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /flags/{flag_key}
pub async fn find_flag(State(state): State<AppState>, Path(flag_key): Path<String>) -> Response {
    match state.flags.find_flag_by_key(&flag_key).await {
        Some(flag) => Json(flag).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /flags/{flag_key}
pub async fn evaluate_flag(
    State(state): State<AppState>,
    Path(flag_key): Path<String>,
    body: Bytes,
) -> Response {
    let context = match evaluation_context(&body) {
        Ok(context) => context,
        Err(rejection) => return rejection,
    };

    let enabled = state
        .flags
        .is_flag_enabled(&flag_key, Some(&context))
        .await;

    Json(EvaluateFlagResponse {
        config_id: None,
        flag_key,
        enabled,
    })
    .into_response()
}

/// GET /configs/{config_id}
pub async fn find_config(State(state): State<AppState>, Path(config_id): Path<String>) -> Response {
    match state.flags.get_configuration(&config_id).await {
        Some(document) => Json(document).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /configs/{config_id}/flags/{flag_key}
pub async fn find_config_flag(
    State(state): State<AppState>,
    Path((config_id, flag_key)): Path<(String, String)>,
) -> Response {
    match state.flags.get_flag(&config_id, &flag_key).await {
        Ok(Some(flag)) => Json(flag).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /configs/{config_id}/flags/{flag_key}
pub async fn evaluate_config_flag(
    State(state): State<AppState>,
    Path((config_id, flag_key)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let context = match evaluation_context(&body) {
        Ok(context) => context,
        Err(rejection) => return rejection,
    };

    let enabled = state
        .flags
        .evaluate_flag(&config_id, &flag_key, Some(&context))
        .await;

    Json(EvaluateFlagResponse {
        config_id: Some(config_id),
        flag_key,
        enabled,
    })
    .into_response()
}

/// Requests always evaluate with a context. An empty body, or one without `customerId`, carries
/// an empty customer id: it passes flags without an allow-list and fails every non-empty one.
fn evaluation_context(body: &[u8]) -> Result<EvaluationContext, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(EvaluationContext::new(""));
    }

    let request: EvaluateFlagRequest = serde_json::from_slice(body).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("invalid request body: {err}") })),
        )
            .into_response()
    })?;

    Ok(EvaluationContext::new(request.customer_id.unwrap_or_default()))
}
