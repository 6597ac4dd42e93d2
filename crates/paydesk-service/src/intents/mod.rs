//! Intent dispatch for Dialogflow fulfillment requests.
//!
//! The agent matches the user's utterance to an intent and posts it here.
//! Each supported intent has its own responder module; anything else gets a
//! fixed "not understood" reply.

pub mod subject_details;
pub mod verify_payment;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::dialogflow::{FulfillmentRequest, FulfillmentResponse};
use crate::error::FulfillmentError;
use crate::state::AppState;

/// Intent answered by [`verify_payment`].
pub const PAYMENT_VERIFICATION_INTENT: &str = "Payment Verification";

/// Intent answered by [`subject_details`] when enabled.
pub const SUBJECT_DETAILS_INTENT: &str = "Subject Details";

/// Reply for intents this service does not handle.
pub const NOT_UNDERSTOOD_TEXT: &str = "Sorry, I didn't understand your request.";

/// Decode a fulfillment request body and answer it.
///
/// `now` is the reference time for payment expiry.
///
/// # Errors
///
/// - [`FulfillmentError::InvalidJson`] if the body is not JSON
/// - [`FulfillmentError::MalformedRequest`] if it lacks `queryResult.intent`
/// - [`FulfillmentError::SubjectLookup`] if the catalog cannot be read
pub fn dispatch(
    state: &AppState,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<FulfillmentResponse, FulfillmentError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FulfillmentError::InvalidJson(e.to_string()))?;
    let request: FulfillmentRequest = serde_json::from_value(value)
        .map_err(|e| FulfillmentError::MalformedRequest(e.to_string()))?;

    let intent = request.intent_name();
    let parameters = request.parameters();

    // Parameter and payload values identify customers; only keys are logged.
    let platform = request.original_detect_intent_request.as_ref();
    tracing::info!(
        intent = %intent,
        parameters = ?parameters.names().collect::<Vec<_>>(),
        source = ?platform.and_then(|r| r.source.as_deref()),
        payload_keys = ?platform.map(|r| r.payload_keys().collect::<Vec<_>>()),
        "Fulfillment request received"
    );

    let store = state.store.as_ref();
    match intent {
        PAYMENT_VERIFICATION_INTENT => Ok(verify_payment::respond(
            store,
            parameters,
            now,
            state.config.access_window(),
        )),
        SUBJECT_DETAILS_INTENT if state.config.enable_subject_details => {
            subject_details::respond(store, parameters)
        }
        _ => {
            tracing::debug!(intent = %intent, "Unhandled intent");
            Ok(FulfillmentResponse::text(NOT_UNDERSTOOD_TEXT))
        }
    }
}
