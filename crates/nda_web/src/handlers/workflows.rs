use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummarizeQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeBody {
    #[serde(default)]
    pub article_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendDigestBody {
    #[serde(default)]
    pub recipient_ids: Vec<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct XPostingBody {
    pub raw_content: String,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverFeedsBody {
    pub message: String,
}

fn triggered(workflow: &str) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": format!("{} workflow triggered", workflow),
    }))
}

/// Kicks off the scraper workflow in the automation engine.
pub async fn trigger_scrape(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    state.workflows.trigger("scrape-articles", json!({})).await?;
    Ok(triggered("Scrape"))
}

/// Kicks off summarization for unprocessed articles, optionally capped or
/// restricted to an explicit id list.
pub async fn trigger_summarize(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummarizeQuery>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(limit) = query.limit {
        if !(0..=1000).contains(&limit) {
            return Err(ApiError::BadRequest(
                "limit must be between 0 and 1000".to_string(),
            ));
        }
    }
    let body = super::optional_body(body)?;

    let payload = json!({
        "limit": query.limit,
        "article_ids": body.article_ids,
    });
    state.workflows.trigger("summarize-articles", payload).await?;
    Ok(triggered("Summarize"))
}

/// Kicks off the digest send workflow. The engine fetches the digest data
/// and rendered HTML back from this API while it runs.
pub async fn trigger_send_digest(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SendDigestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = super::optional_body(body)?;
    let payload = json!({
        "recipient_ids": body.recipient_ids,
        "force": body.force,
    });
    state.workflows.trigger("send-digest", payload).await?;
    Ok(triggered("Send digest"))
}

/// Kicks off the LinkedIn posting workflow for the current digest batch.
pub async fn trigger_linkedin_posting(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .workflows
        .trigger("linkedin-posting", json!({}))
        .await?;
    Ok(triggered("LinkedIn posting"))
}

/// Kicks off the X posting workflow with raw content and an optional style.
pub async fn trigger_x_posting(
    State(state): State<Arc<AppState>>,
    Json(body): Json<XPostingBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.raw_content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "raw_content must not be empty".to_string(),
        ));
    }
    let payload = json!({
        "raw_content": body.raw_content,
        "style": body.style,
    });
    state.workflows.trigger("x-posting", payload).await?;
    Ok(triggered("X posting"))
}

/// Forwards a natural-language feed discovery request to the engine.
pub async fn trigger_discover_feeds(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DiscoverFeedsBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }
    state
        .workflows
        .trigger("discover-feeds", json!({ "message": body.message }))
        .await?;
    Ok(triggered("Feed discovery"))
}
