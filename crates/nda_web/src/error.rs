use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API-level failures, each mapped to exactly one status code. The body is
/// always `{"success": false, "error": "..."}` so clients never need to
/// branch on response shape.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Automation engine unreachable: {0}")]
    EngineUnreachable(String),
    #[error("Automation engine returned an error: {0}")]
    EngineFailed(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey => StatusCode::UNAUTHORIZED,
            ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EngineUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::EngineFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<nda_core::Error> for ApiError {
    fn from(err: nda_core::Error) -> Self {
        match err {
            nda_core::Error::NotFound(what) => ApiError::NotFound(what),
            nda_core::Error::Duplicate(what) => {
                ApiError::BadRequest(format!("{} already exists", what))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
