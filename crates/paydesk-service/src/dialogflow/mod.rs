//! Dialogflow ES fulfillment webhook wire format.
//!
//! Requests carry the matched intent and its parameters under `queryResult`;
//! responses carry plain text and/or a list of text messages.

pub mod types;

pub use types::*;
