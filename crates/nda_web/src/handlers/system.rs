use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "news-digest-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Unauthenticated liveness probe. Reports degraded with 503 when the
/// database is unreachable so orchestrators can restart or route around us.
/// Engine reachability is reported but does not fail the probe; workflow
/// endpoints surface that failure per call.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = if state.workflows.reachable().await {
        "reachable"
    } else {
        "unreachable"
    };

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected", "engine": engine })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "database": e.to_string(), "engine": engine })),
        ),
    }
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.store.stats().await?;
    Ok(Json(stats))
}
