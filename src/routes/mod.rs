//! Router assembly: HTTP endpoints, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod auth;
pub mod http;

/// Build the application router with:
/// - catalog reads under `/api/v1/catalog/...`
/// - per-language progress under `/api/v1/progress/:language/...`
/// - learner profile at `/api/v1/learner`
/// - CORS (allow any origin/method/headers); tighten for production
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(http::http_health))
        // Catalog
        .route("/api/v1/catalog/speaking", get(http::http_list_speaking))
        .route("/api/v1/catalog/speaking/random", get(http::http_random_speaking))
        .route("/api/v1/catalog/listening", get(http::http_list_listening))
        .route("/api/v1/catalog/listening/random", get(http::http_random_listening))
        // Progress
        .route("/api/v1/progress", get(http::http_list_progress))
        .route("/api/v1/progress/:language", get(http::http_get_progress))
        .route("/api/v1/progress/:language/statistics", get(http::http_get_statistics))
        .route(
            "/api/v1/progress/:language/lessons/:lesson_id/attempts",
            post(http::http_post_lesson_attempt),
        )
        .route("/api/v1/progress/:language/speaking/attempts", post(http::http_post_speaking_attempt))
        .route("/api/v1/progress/:language/listening/attempts", post(http::http_post_listening_attempt))
        .route("/api/v1/progress/:language/vocabulary/reviews", post(http::http_post_vocabulary_review))
        .route("/api/v1/progress/:language/vocabulary/due", get(http::http_get_due_words))
        .route("/api/v1/progress/:language/skills/:skill", post(http::http_post_skill_progress))
        .route("/api/v1/progress/:language/daily", post(http::http_post_daily_progress))
        .route("/api/v1/learner", get(http::http_get_learner))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}
