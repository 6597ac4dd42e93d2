//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{fulfillment, health, webhooks};
use crate::state::AppState;

/// Maximum concurrent fulfillment requests.
/// Each one runs several synchronous store lookups.
const FULFILLMENT_MAX_CONCURRENT_REQUESTS: usize = 64;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Liveness check
/// - `GET /health` - Health check
///
/// ## Dialogflow (concurrency-limited)
/// - `POST /webhook` - Fulfillment requests
///
/// ## Razorpay (signature verification)
/// - `POST /razorpay-webhook` - Payment events
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let fulfillment_routes = Router::new()
        .route("/webhook", post(fulfillment::dialogflow_webhook))
        .layer(ConcurrencyLimitLayer::new(
            FULFILLMENT_MAX_CONCURRENT_REQUESTS,
        ));

    Router::new()
        // Health (public, no rate limit)
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(fulfillment_routes)
        // Gateway webhooks (no rate limit - controlled by Razorpay)
        .route("/razorpay-webhook", post(webhooks::razorpay_webhook))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
