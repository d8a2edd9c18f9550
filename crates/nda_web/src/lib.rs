use std::sync::Arc;

use axum::routing::{delete, get, patch, post, put};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;
pub mod workflows;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);
    let cors = CorsLayer::permissive();

    let protected = Router::new()
        .route("/api/feeds", get(handlers::feeds::list_feeds))
        .route("/api/feeds", post(handlers::feeds::create_feed))
        .route("/api/feeds/:id", get(handlers::feeds::get_feed))
        .route("/api/feeds/:id", put(handlers::feeds::update_feed))
        .route("/api/feeds/:id", delete(handlers::feeds::delete_feed))
        .route("/api/feeds/:id/toggle", patch(handlers::feeds::toggle_feed))
        .route("/api/articles", get(handlers::articles::list_articles))
        .route("/api/articles/:id", get(handlers::articles::get_article))
        .route(
            "/api/articles/:id",
            delete(handlers::articles::delete_article),
        )
        .route(
            "/api/recipients",
            get(handlers::recipients::list_recipients),
        )
        .route(
            "/api/recipients",
            post(handlers::recipients::create_recipient),
        )
        .route(
            "/api/recipients/:id",
            get(handlers::recipients::get_recipient),
        )
        .route(
            "/api/recipients/:id",
            put(handlers::recipients::update_recipient),
        )
        .route(
            "/api/recipients/:id",
            delete(handlers::recipients::delete_recipient),
        )
        .route(
            "/api/recipients/:id/toggle",
            patch(handlers::recipients::toggle_recipient),
        )
        .route(
            "/api/recipients/:id/enabled",
            put(handlers::recipients::set_recipient_enabled),
        )
        .route(
            "/api/search-queries",
            get(handlers::search_queries::list_search_queries),
        )
        .route(
            "/api/search-queries",
            post(handlers::search_queries::create_search_query),
        )
        .route(
            "/api/search-queries/:id",
            get(handlers::search_queries::get_search_query),
        )
        .route(
            "/api/search-queries/:id",
            put(handlers::search_queries::update_search_query),
        )
        .route(
            "/api/search-queries/:id",
            delete(handlers::search_queries::delete_search_query),
        )
        .route(
            "/api/search-queries/:id/toggle",
            patch(handlers::search_queries::toggle_search_query),
        )
        .route(
            "/api/search-queries/:id/enabled",
            put(handlers::search_queries::set_search_query_enabled),
        )
        .route(
            "/api/x-accounts",
            get(handlers::x_accounts::list_x_accounts),
        )
        .route(
            "/api/x-accounts",
            post(handlers::x_accounts::create_x_account),
        )
        .route(
            "/api/x-accounts/:id",
            get(handlers::x_accounts::get_x_account),
        )
        .route(
            "/api/x-accounts/:id",
            put(handlers::x_accounts::update_x_account),
        )
        .route(
            "/api/x-accounts/:id",
            delete(handlers::x_accounts::delete_x_account),
        )
        .route(
            "/api/x-accounts/:id/toggle",
            patch(handlers::x_accounts::toggle_x_account),
        )
        .route(
            "/api/x-accounts/:id/enabled",
            put(handlers::x_accounts::set_x_account_enabled),
        )
        .route(
            "/api/workflows/scrape",
            post(handlers::workflows::trigger_scrape),
        )
        .route(
            "/api/workflows/summarize",
            post(handlers::workflows::trigger_summarize),
        )
        .route(
            "/api/workflows/send-digest",
            post(handlers::workflows::trigger_send_digest),
        )
        .route(
            "/api/workflows/linkedin-posting",
            post(handlers::workflows::trigger_linkedin_posting),
        )
        .route(
            "/api/workflows/x-posting",
            post(handlers::workflows::trigger_x_posting),
        )
        .route(
            "/api/workflows/discover-feeds",
            post(handlers::workflows::trigger_discover_feeds),
        )
        .route("/api/digest/preview", get(handlers::digest::preview))
        .route("/api/digest/render", post(handlers::digest::render))
        .route("/api/digest/data", get(handlers::digest::data))
        .route("/api/stats", get(handlers::system::stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/", get(handlers::system::root))
        .route("/api/health", get(handlers::system::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use nda_core::{Config, Error, Result};
}
