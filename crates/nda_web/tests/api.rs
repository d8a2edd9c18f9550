use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use nda_core::models::Article;
use nda_core::Config;
use nda_storage::MemoryStore;
use nda_web::{create_app, AppState};

const API_KEY: &str = "test-api-key";

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        // Nothing listens on port 1, so workflow triggers fail fast.
        webhook_base_url: "http://127.0.0.1:1/webhook".to_string(),
        api_key: API_KEY.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
    }
}

fn app(store: Arc<MemoryStore>) -> Router {
    create_app(AppState::new(store, test_config()))
}

fn article(title: &str, processed: bool, sent: bool) -> Article {
    Article {
        id: Uuid::new_v4(),
        url: format!("https://example.com/{}", Uuid::new_v4()),
        title: title.to_string(),
        content: None,
        source: "heise".to_string(),
        published_at: Some(Utc::now()),
        summary: Some("Eine Zusammenfassung.".to_string()),
        image_url: None,
        category: Some("tech".to_string()),
        priority: None,
        topics: vec!["KI".to_string()],
        keywords: vec![],
        processed,
        sent,
        fetched_at: Utc::now(),
        created_at: Utc::now(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-api-key", API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn root_and_health_are_public() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    // No engine listens on the test webhook port.
    assert_eq!(body["engine"], "unreachable");
}

#[tokio::test]
async fn api_routes_reject_missing_and_wrong_keys() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/feeds")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A wrong key never reaches the renderer either.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/digest/render")
                .header("x-api-key", "wrong")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "articles": [] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body.get("html_content").is_none());
}

#[tokio::test]
async fn feed_crud_roundtrip() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/feeds",
            json!({ "name": "Heise", "url": "https://heise.de/rss" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let feed = body_json(response).await;
    assert_eq!(feed["language"], "de");
    let id = feed["id"].as_str().unwrap().to_string();

    // Same URL again is rejected.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/feeds",
            json!({ "name": "Heise again", "url": "https://heise.de/rss" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/feeds/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/feeds/{}", id))
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/feeds/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_the_store() {
    let app = app(Arc::new(MemoryStore::new()));
    let response = app.oneshot(get("/api/feeds/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn digest_render_backfills_images_from_the_store() {
    let store = Arc::new(MemoryStore::new());
    let mut stored = article("Mit Bild", true, false);
    stored.image_url = Some("https://img.example.com/a.jpg".to_string());
    let stored_id = stored.id.to_string();
    store.add_article(stored).await;
    let app = app(store);

    let response = app
        .oneshot(post_json(
            "/api/digest/render",
            json!({
                "articles": [
                    { "id": stored_id, "title": "Mit Bild", "url": "https://example.com/a" },
                    { "title": "Ohne Bild" }
                ],
                "total_candidates": 10
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["article_count"], 2);
    assert_eq!(body["article_ids"], json!([stored_id]));
    let html = body["html_content"].as_str().unwrap();
    assert!(html.contains("https://img.example.com/a.jpg"));
    assert!(html.contains("kuratiert aus 10 Artikeln"));
    let subject = body["subject"].as_str().unwrap();
    assert!(subject.starts_with("News Digest - "));
    assert!(subject.ends_with("(2 kuratierte Artikel)"));
}

#[tokio::test]
async fn digest_render_without_body_yields_empty_state() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/digest/render")
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["article_count"], 0);
    assert_eq!(body["recipient_count"], 0);
    let html = body["html_content"].as_str().unwrap();
    assert!(html.contains("Keine Artikel zum Anzeigen."));
}

#[tokio::test]
async fn digest_render_rejects_malformed_json() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/digest/render")
                .header("x-api-key", API_KEY)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not valid json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn digest_preview_renders_unsent_articles() {
    let store = Arc::new(MemoryStore::new());
    store.add_article(article("Ungesendet", true, false)).await;
    store.add_article(article("Schon gesendet", true, true)).await;
    let app = app(store);

    let response = app.oneshot(get("/api/digest/preview")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Ungesendet"));
    assert!(!html.contains("Schon gesendet"));
    assert!(html.contains("AI News Agent"));
    // The candidate total counts with the same filter as the cards, so the
    // already-sent article does not inflate it.
    assert!(html.contains("kuratiert aus 1 Artikeln"));
}

#[tokio::test]
async fn digest_data_lists_unsent_candidates() {
    let store = Arc::new(MemoryStore::new());
    store.add_article(article("Kandidat", true, false)).await;
    store.add_article(article("Unverarbeitet", false, false)).await;
    store.add_article(article("Verschickt", true, true)).await;
    let app = app(store);

    let response = app.clone().oneshot(get("/api/digest/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["article_count"], 1);
    assert_eq!(body["include_sent"], false);
    assert_eq!(body["articles"][0]["title"], "Kandidat");
    assert_eq!(body["articles"][0]["sent"], false);
    assert!(body["generated_at"].as_str().is_some());

    // The query flag is echoed and widens the candidate list.
    let response = app
        .oneshot(get("/api/digest/data?include_sent=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["article_count"], 2);
    assert_eq!(body["include_sent"], true);
}

#[tokio::test]
async fn unreachable_engine_maps_to_service_unavailable() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(post_json("/api/workflows/scrape", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn stats_reflect_seeded_articles() {
    let store = Arc::new(MemoryStore::new());
    store.add_article(article("Eins", true, false)).await;
    store.add_article(article("Zwei", false, false)).await;
    let app = app(store);

    let response = app.oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_articles"], 2);
    assert_eq!(body["processed_articles"], 1);
    assert_eq!(body["unsent_articles"], 1);
}

#[tokio::test]
async fn recipient_toggle_flips_enabled() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/recipients",
            json!({ "email": "a@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let recipient = body_json(response).await;
    let id = recipient["id"].as_str().unwrap().to_string();
    assert_eq!(recipient["enabled"], true);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/recipients/{}/toggle", id))
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let toggled = body_json(response).await;
    assert_eq!(toggled["enabled"], false);
}

#[tokio::test]
async fn summarize_rejects_out_of_range_limit() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(post_json("/api/workflows/summarize?limit=5000", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn workflow_bodies_must_parse_when_present() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/workflows/send-digest")
                .header("x-api-key", API_KEY)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{oops"))
                .unwrap(),
        )
        .await
        .unwrap();
    // Rejected before any engine call, so not a 503.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn x_posting_requires_content() {
    let app = app(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(post_json(
            "/api/workflows/x-posting",
            json!({ "raw_content": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
