use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use nda_digest::{enrich_images, render_digest, subject_line, DigestArticle, RenderOptions};

use crate::error::ApiError;
use crate::state::AppState;

fn default_usecase() -> String {
    "daily_newsletter".to_string()
}

#[derive(Debug, Deserialize)]
pub struct DigestQuery {
    #[serde(default)]
    pub include_sent: bool,
}

/// Render payload as posted by the automation engine. Everything except the
/// article list is optional; the articles themselves tolerate missing
/// fields, see [`DigestArticle`].
#[derive(Debug, Deserialize)]
pub struct DigestRenderRequest {
    #[serde(default)]
    pub articles: Vec<DigestArticle>,
    #[serde(default)]
    pub total_candidates: i64,
    #[serde(default = "default_usecase")]
    pub usecase: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub recipient_emails: Vec<String>,
}

impl Default for DigestRenderRequest {
    fn default() -> Self {
        Self {
            articles: vec![],
            total_candidates: 0,
            usecase: default_usecase(),
            tagline: String::new(),
            recipient_emails: vec![],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DigestRenderResponse {
    pub html_content: String,
    pub article_count: usize,
    pub article_ids: Vec<String>,
    pub recipient_emails: Vec<String>,
    pub recipient_count: usize,
    pub subject: String,
}

/// Renders the digest email for a batch of curated articles. Images the
/// payload dropped are backfilled from the store before rendering.
pub async fn render(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DigestRenderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = super::optional_body(body)?;

    let articles = enrich_images(state.articles.as_ref(), &request.articles)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let date = Local::now().date_naive();
    let total_candidates = if request.total_candidates > 0 {
        request.total_candidates as usize
    } else {
        articles.len()
    };
    let opts = RenderOptions {
        total_candidates,
        tagline: request.tagline,
        date,
    };

    let html = render_digest(&articles, &opts).map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(
        "📰 rendered {} digest with {} articles",
        request.usecase,
        articles.len()
    );

    let article_ids = articles.iter().filter_map(|a| a.id.clone()).collect();
    let recipient_count = request.recipient_emails.len();
    Ok(Json(DigestRenderResponse {
        html_content: html,
        article_count: articles.len(),
        article_ids,
        recipient_emails: request.recipient_emails,
        recipient_count,
        subject: subject_line(date, articles.len()),
    }))
}

/// Browser preview of the digest as it would be sent right now, built from
/// the processed-but-unsent articles in the store.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DigestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state.store.list_digest_articles(query.include_sent).await?;
    // Same filter as the list so the intro line cannot disagree with the
    // cards shown.
    let total = state
        .store
        .count_digest_articles(query.include_sent)
        .await?;

    let articles: Vec<DigestArticle> = stored.iter().map(DigestArticle::from).collect();
    let opts = RenderOptions {
        total_candidates: total.max(0) as usize,
        tagline: String::new(),
        date: Local::now().date_naive(),
    };
    let html = render_digest(&articles, &opts).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Html(html))
}

#[derive(Debug, Serialize)]
pub struct DigestDataArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<String>,
    pub summary: Option<String>,
    pub sent: bool,
}

#[derive(Debug, Serialize)]
pub struct DigestDataResponse {
    pub articles: Vec<DigestDataArticle>,
    pub article_count: usize,
    pub include_sent: bool,
    pub generated_at: String,
}

/// Raw digest candidates for the send workflow, unsent articles only
/// unless `include_sent` is set.
pub async fn data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DigestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state.store.list_digest_articles(query.include_sent).await?;

    let articles: Vec<DigestDataArticle> = stored
        .iter()
        .map(|a| DigestDataArticle {
            id: a.id.to_string(),
            title: a.title.clone(),
            url: a.url.clone(),
            source: a.source.clone(),
            published_at: a.published_at.map(|ts| ts.to_rfc3339()),
            summary: a.summary.clone(),
            sent: a.sent,
        })
        .collect();

    let article_count = articles.len();
    Ok(Json(DigestDataResponse {
        articles,
        article_count,
        include_sent: query.include_sent,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }))
}
