use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use nda_core::models::ArticleFilter;

use crate::error::ApiError;
use crate::state::AppState;

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct ArticleQuery {
    pub source: Option<String>,
    pub processed: Option<bool>,
    pub sent: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArticleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.limit < 1 || query.limit > 500 {
        return Err(ApiError::BadRequest(
            "limit must be between 1 and 500".to_string(),
        ));
    }
    if query.offset < 0 {
        return Err(ApiError::BadRequest("offset must not be negative".to_string()));
    }

    let filter = ArticleFilter {
        source: query.source,
        processed: query.processed,
        sent: query.sent,
        limit: query.limit,
        offset: query.offset,
    };
    let articles = state.store.list_articles(&filter).await?;
    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .store
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Article".to_string()))?;
    Ok(Json(article))
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_article(id).await? {
        return Err(ApiError::NotFound("Article".to_string()));
    }
    Ok(Json(json!({ "success": true, "message": "Article deleted" })))
}
