//! API layer - routes, handlers, and middleware

pub mod handlers;
pub mod middleware;
pub mod response;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    let api = Router::new()
        .route("/findings", get(handlers::list_findings))
        .route(
            "/security-checklist/checklist-table",
            get(handlers::checklist_table),
        )
        .route(
            "/security-checklist/checklist-table/:id",
            get(handlers::checklist_detail),
        )
        .route("/security-checklist/list-url", get(handlers::list_urls))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state)
        // Applied in reverse order
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::compression())
        .layer(middleware::cors(&cors_origins))
        .layer(middleware::trace())
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "findings-server"
    }))
}
