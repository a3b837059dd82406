use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// GET /health — liveness probe with build and platform info.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "platform": state.provider.source_name(),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}
