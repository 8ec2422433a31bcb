//! Liveness and API description endpoints.

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::openapi::ApiDoc;

/// Liveness probe. Does not touch the database.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The OpenAPI document for this server.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
