//! Health probe.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::response::ApiResult;
use crate::state::AppState;

/// `GET /health` — liveness plus database reachability and queue depth.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    state.db.health_check().await?;
    let stats = state.queue.stats().await?;

    Ok(Json(json!({
        "status": "ok",
        "queue": stats,
        "live_connections": state.registry.connection_count(),
    })))
}
