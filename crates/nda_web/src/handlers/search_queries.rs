use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use nda_core::models::{SearchQueryCreate, SearchQueryUpdate};

use super::{EnabledBody, ListParams};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_search_queries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let queries = state.store.list_search_queries(params.enabled_only).await?;
    Ok(Json(queries))
}

pub async fn create_search_query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchQueryCreate>,
) -> Result<impl IntoResponse, ApiError> {
    if body.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    let query = state.store.create_search_query(&body).await?;
    info!("🔍 added search query {}", query.name);
    Ok((StatusCode::CREATED, Json(query)))
}

pub async fn get_search_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let query = state
        .store
        .get_search_query(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Search query".to_string()))?;
    Ok(Json(query))
}

pub async fn update_search_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<SearchQueryUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let query = state
        .store
        .update_search_query(id, &body)
        .await?
        .ok_or_else(|| ApiError::NotFound("Search query".to_string()))?;
    Ok(Json(query))
}

pub async fn delete_search_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_search_query(id).await? {
        return Err(ApiError::NotFound("Search query".to_string()));
    }
    Ok(Json(
        json!({ "success": true, "message": "Search query deleted" }),
    ))
}

pub async fn toggle_search_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let query = state
        .store
        .toggle_search_query(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Search query".to_string()))?;
    Ok(Json(query))
}

pub async fn set_search_query_enabled(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<EnabledBody>,
) -> Result<impl IntoResponse, ApiError> {
    let query = state
        .store
        .set_search_query_enabled(id, body.enabled)
        .await?
        .ok_or_else(|| ApiError::NotFound("Search query".to_string()))?;
    Ok(Json(query))
}
