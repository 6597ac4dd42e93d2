//! Dialogflow fulfillment handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use crate::intents;
use crate::state::AppState;

/// Handle a fulfillment request.
///
/// Always answers 200 with a fulfillment body; failures become fixed reply
/// texts (see [`crate::error::FulfillmentError`]).
pub async fn dialogflow_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match intents::dispatch(&state, &body, Utc::now()) {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => e.into_response(),
    }
}
