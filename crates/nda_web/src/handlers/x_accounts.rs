use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use nda_core::models::{XAccountCreate, XAccountUpdate};

use super::{EnabledBody, ListParams};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_x_accounts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.store.list_x_accounts(params.enabled_only).await?;
    Ok(Json(accounts))
}

pub async fn create_x_account(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<XAccountCreate>,
) -> Result<impl IntoResponse, ApiError> {
    // Usernames are stored without the leading @ regardless of input.
    body.username = body.username.trim_start_matches('@').to_string();
    if body.username.is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".to_string()));
    }
    let account = state.store.create_x_account(&body).await?;
    info!("🐦 added X account @{}", account.username);
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn get_x_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .store
        .get_x_account(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("X account".to_string()))?;
    Ok(Json(account))
}

pub async fn update_x_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(mut body): Json<XAccountUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(username) = body.username.take() {
        let trimmed = username.trim_start_matches('@').to_string();
        if trimmed.is_empty() {
            return Err(ApiError::BadRequest("username must not be empty".to_string()));
        }
        body.username = Some(trimmed);
    }
    let account = state
        .store
        .update_x_account(id, &body)
        .await?
        .ok_or_else(|| ApiError::NotFound("X account".to_string()))?;
    Ok(Json(account))
}

pub async fn delete_x_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_x_account(id).await? {
        return Err(ApiError::NotFound("X account".to_string()));
    }
    Ok(Json(
        json!({ "success": true, "message": "X account deleted" }),
    ))
}

pub async fn toggle_x_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .store
        .toggle_x_account(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("X account".to_string()))?;
    Ok(Json(account))
}

pub async fn set_x_account_enabled(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<EnabledBody>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .store
        .set_x_account_enabled(id, body.enabled)
        .await?
        .ok_or_else(|| ApiError::NotFound("X account".to_string()))?;
    Ok(Json(account))
}
