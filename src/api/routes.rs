use crate::api::{handlers, AppState};
use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health and metrics
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        // Search
        .route("/search/datadoc/", get(handlers::search_datadoc))
        .route("/search/datadoc", get(handlers::search_datadoc))
        .route("/search/tables/", get(handlers::search_tables))
        .route("/search/tables", get(handlers::search_tables))
        // Suggest
        .route("/suggest/:metastore_id/tables/", get(handlers::suggest_tables))
        .route("/suggest/:metastore_id/tables", get(handlers::suggest_tables))
        .route("/search/user/", get(handlers::suggest_user))
        .route("/search/user", get(handlers::suggest_user))
        .fallback(handlers::not_found)
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
