//! Health check handlers.

use axum::Json;
use serde::Serialize;

/// Liveness response for `GET /`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Human-readable message.
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Human-readable message.
    pub message: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Root liveness endpoint.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: "It's working!",
    })
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "API is running",
        service: "paydesk",
        version: env!("CARGO_PKG_VERSION"),
    })
}
