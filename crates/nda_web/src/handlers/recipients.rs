use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use nda_core::models::{RecipientCreate, RecipientUpdate};

use super::{EnabledBody, ListParams};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_recipients(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = state.store.list_recipients(params.enabled_only).await?;
    Ok(Json(recipients))
}

pub async fn create_recipient(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecipientCreate>,
) -> Result<impl IntoResponse, ApiError> {
    if !body.email.contains('@') {
        return Err(ApiError::BadRequest("invalid email address".to_string()));
    }
    let recipient = state.store.create_recipient(&body).await?;
    info!("📬 added digest recipient {}", recipient.email);
    Ok((StatusCode::CREATED, Json(recipient)))
}

pub async fn get_recipient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = state
        .store
        .get_recipient(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipient".to_string()))?;
    Ok(Json(recipient))
}

pub async fn update_recipient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecipientUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(email) = &body.email {
        if !email.contains('@') {
            return Err(ApiError::BadRequest("invalid email address".to_string()));
        }
    }
    let recipient = state
        .store
        .update_recipient(id, &body)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipient".to_string()))?;
    Ok(Json(recipient))
}

pub async fn delete_recipient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_recipient(id).await? {
        return Err(ApiError::NotFound("Recipient".to_string()));
    }
    Ok(Json(
        json!({ "success": true, "message": "Recipient deleted" }),
    ))
}

pub async fn toggle_recipient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = state
        .store
        .toggle_recipient(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipient".to_string()))?;
    Ok(Json(recipient))
}

pub async fn set_recipient_enabled(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<EnabledBody>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = state
        .store
        .set_recipient_enabled(id, body.enabled)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipient".to_string()))?;
    Ok(Json(recipient))
}
