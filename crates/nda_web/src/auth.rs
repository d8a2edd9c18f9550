use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Header-based API key check for everything under `/api` except the health
/// probe. A missing key is distinguished from a wrong one so clients can
/// tell a misconfigured header apart from a bad secret.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(key) = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        return Err(ApiError::MissingApiKey);
    };

    if key != state.config.api_key {
        return Err(ApiError::InvalidApiKey);
    }

    Ok(next.run(request).await)
}
