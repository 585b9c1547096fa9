//! Status Handler

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::infrastructure::driving_adapters::api_rest::AppState;

/// Create the router for the status endpoint
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(status))
}

/// GET /status - Liveness probe
async fn status() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
