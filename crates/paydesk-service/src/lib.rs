//! Paydesk HTTP service.
//!
//! This crate provides the HTTP surface for paydesk:
//!
//! - Razorpay webhook ingestion (`POST /razorpay-webhook`)
//! - Dialogflow fulfillment (`POST /webhook`)
//! - Liveness and health checks
//!
//! # Authentication
//!
//! Razorpay webhooks are authenticated by an HMAC-SHA256 signature over the
//! raw body, keyed by the shared webhook secret. The fulfillment endpoint is
//! unauthenticated and only ever returns fixed texts or the caller's own
//! payment details.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for the router

pub mod catalog;
pub mod config;
pub mod crypto;
pub mod dialogflow;
pub mod error;
pub mod handlers;
pub mod intents;
pub mod razorpay;
pub mod routes;
pub mod state;

pub use catalog::{seed_catalog_from_file, SeedError};
pub use config::{ConfigError, ServiceConfig};
pub use error::{ApiError, FulfillmentError};
pub use routes::create_router;
pub use state::AppState;
