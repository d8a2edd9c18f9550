pub mod articles;
pub mod digest;
pub mod feeds;
pub mod recipients;
pub mod search_queries;
pub mod system;
pub mod workflows;
pub mod x_accounts;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;

/// Unwraps an optional JSON body. A request without a JSON body falls back
/// to the type's defaults; a body that is present but does not parse is a
/// client error and must not fall through to the defaults.
pub(crate) fn optional_body<T: Default>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

/// Shared query shape for the list endpoints that only filter on `enabled`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub enabled_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct EnabledBody {
    pub enabled: bool,
}
