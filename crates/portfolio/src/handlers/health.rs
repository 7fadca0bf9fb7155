//! Banner and liveness endpoints.

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// GET / - Service banner.
pub async fn banner() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Portfolio backend",
    }))
}

/// GET /health - Liveness probe. Does not touch the store.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
