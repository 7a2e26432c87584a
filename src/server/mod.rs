//! HTTP entry layer.
//!
//! | Method | Path | Result |
//! |---|---|---|
//! | GET | `/ping` | `{"ping": "pong"}` |
//! | GET | `/flags` | all flags of the default profile |
//! | GET | `/flags?keys=a,b` | the listed flags, as an array |
//! | GET | `/flags/{flag_key}` | one flag of the default profile, or 404 |
//! | POST | `/flags/{flag_key}` | `{flagKey, enabled}` |
//! | GET | `/configs/{config_id}` | raw configuration document, or 404 if it cannot be fetched |
//! | GET | `/configs/{config_id}/flags/{flag_key}` | one flag fetched directly, or 404 |
//! | POST | `/configs/{config_id}/flags/{flag_key}` | `{configId, flagKey, enabled}` |
//!
//! The evaluate endpoints accept an optional `{"customerId": "..."}` body and always answer 200.
//! Without a customer id, flags restricted to a customer list evaluate as off.
use axum::{
    http::{
        header::{InvalidHeaderValue, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{Error, FlagRepository};

pub mod handlers;

/// Shared state of the router.
#[derive(Clone)]
pub struct AppState {
    pub flags: FlagRepository,
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/flags", get(handlers::list_flags))
        .route(
            "/flags/{flag_key}",
            get(handlers::find_flag).post(handlers::evaluate_flag),
        )
        .route("/configs/{config_id}", get(handlers::find_config))
        .route(
            "/configs/{config_id}/flags/{flag_key}",
            get(handlers::find_config_flag).post(handlers::evaluate_config_flag),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS layer answering with `Access-Control-Allow-Origin: allow_origin`. `"*"` allows any
/// origin.
pub fn cors_layer(allow_origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = if allow_origin == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(HeaderValue::from_str(allow_origin)?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}

/// Targeted fetch failures surface as 502: the agent, not this service, failed.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        log::warn!(target: "appconfig", "request failed: {}", self);
        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
