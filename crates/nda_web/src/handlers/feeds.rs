use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use nda_core::models::{FeedCreate, FeedUpdate};

use super::ListParams;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let feeds = state.store.list_feeds(params.enabled_only).await?;
    Ok(Json(feeds))
}

pub async fn create_feed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FeedCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state.store.create_feed(&body).await?;
    info!("📡 added feed {} ({})", feed.name, feed.url);
    Ok((StatusCode::CREATED, Json(feed)))
}

pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state
        .store
        .get_feed(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feed".to_string()))?;
    Ok(Json(feed))
}

pub async fn update_feed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<FeedUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state
        .store
        .update_feed(id, &body)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feed".to_string()))?;
    Ok(Json(feed))
}

pub async fn toggle_feed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state
        .store
        .get_feed(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feed".to_string()))?;
    let update = FeedUpdate {
        enabled: Some(!feed.enabled),
        ..Default::default()
    };
    let feed = state
        .store
        .update_feed(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feed".to_string()))?;
    Ok(Json(feed))
}

pub async fn delete_feed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_feed(id).await? {
        return Err(ApiError::NotFound("Feed".to_string()));
    }
    Ok(Json(json!({ "success": true, "message": "Feed deleted" })))
}
