use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;

use crate::AppState;

/// Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe: verifies the database connection
async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    match state.db.ping().await {
        Ok(()) => Ok(Json(json!({ "status": "ready" }))),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/ready", get(ready))
}
