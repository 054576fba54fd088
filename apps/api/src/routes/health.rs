use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness only: never touches the completion provider.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Competitor Analysis API",
        "docs": "/docs",
        "health": "/health"
    }))
}
