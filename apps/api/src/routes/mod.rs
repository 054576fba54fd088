pub mod docs;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/docs", get(docs::openapi_handler))
        .route(
            "/api/v1/competitor-analysis",
            post(handlers::handle_competitor_analysis),
        )
        .fallback(not_found)
        .with_state(state)
}
