//! API error types and responses.
//!
//! Two surfaces, two error types:
//!
//! - [`ApiError`] answers the payment gateway with a status code and a
//!   `{"error": "..."}` body.
//! - [`FulfillmentError`] answers the conversational agent. The agent only
//!   understands fulfillment bodies, so every failure becomes a fixed reply
//!   text with HTTP 200.
//!
//! Neither ever puts internal detail in the response; details go to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use paydesk_store::StoreError;

use crate::dialogflow::FulfillmentResponse;

/// Gateway webhook error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The signature header is absent.
    #[error("signature missing")]
    MissingSignature,

    /// The signature does not match the body.
    #[error("invalid signature")]
    InvalidSignature,

    /// The authenticated body is not a usable webhook payload.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The store rejected a write.
    #[error("database error: {0}")]
    Database(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingSignature => (StatusCode::FORBIDDEN, "Signature missing"),
            Self::InvalidSignature => (StatusCode::FORBIDDEN, "Invalid signature"),
            Self::BadRequest(detail) => {
                tracing::warn!(error = %detail, "Rejected webhook payload");
                (StatusCode::BAD_REQUEST, "Invalid payload")
            }
            Self::Database(detail) => {
                tracing::error!(error = %detail, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Database(err.to_string())
    }
}

/// Reply text for a body that is not JSON at all.
pub const GENERIC_ERROR_TEXT: &str = "An error occurred.";

/// Reply text for a request the dispatcher could not process.
pub const PROCESSING_ERROR_TEXT: &str = "An error occurred while processing the request.";

/// Reply text for a failed catalog read while describing a subject.
pub const SUBJECT_ERROR_TEXT: &str = "An error occurred while fetching subject details.";

/// Fulfillment error type.
#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    /// The request body is not JSON.
    #[error("request body is not JSON: {0}")]
    InvalidJson(String),

    /// The body is JSON but lacks the fulfillment request shape.
    #[error("malformed fulfillment request: {0}")]
    MalformedRequest(String),

    /// The catalog could not be read while describing a subject.
    #[error("subject lookup failed: {0}")]
    SubjectLookup(#[from] StoreError),
}

impl FulfillmentError {
    /// The fixed text shown to the user for this error.
    #[must_use]
    pub fn reply_text(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => GENERIC_ERROR_TEXT,
            Self::MalformedRequest(_) => PROCESSING_ERROR_TEXT,
            Self::SubjectLookup(_) => SUBJECT_ERROR_TEXT,
        }
    }
}

impl IntoResponse for FulfillmentError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Fulfillment request failed");
        Json(FulfillmentResponse::text(self.reply_text())).into_response()
    }
}
