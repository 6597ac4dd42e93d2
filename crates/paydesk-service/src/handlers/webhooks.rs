//! Razorpay webhook handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use paydesk_store::Store;

use crate::crypto::verify_signature;
use crate::error::ApiError;
use crate::razorpay::WebhookEvent;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Outcome message.
    pub message: &'static str,
}

/// Handle Razorpay webhooks.
///
/// The signature is checked against the raw bytes before the body is
/// decoded. Only `payment.captured` events are stored; every other event is
/// acknowledged and ignored.
pub async fn razorpay_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            tracing::warn!("Razorpay webhook without signature");
            ApiError::MissingSignature
        })?;

    if !verify_signature(&state.config.webhook_secret, &body, signature) {
        tracing::warn!("Invalid Razorpay webhook signature");
        return Err(ApiError::InvalidSignature);
    }

    let event: WebhookEvent =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if !event.is_payment_captured() {
        tracing::debug!(event = %event.event, "Ignoring Razorpay event");
        return Ok((
            StatusCode::OK,
            Json(WebhookResponse {
                message: "Event ignored",
            }),
        ));
    }

    let record = event.payment().to_payment_record();
    state.store.put_payment(&record)?;

    tracing::info!(
        record_id = %record.id,
        payment_id = %record.payment_id,
        price = ?record.price,
        currency = %record.currency,
        "Payment stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(WebhookResponse {
            message: "Payment details stored successfully",
        }),
    ))
}
