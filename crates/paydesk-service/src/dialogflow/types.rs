//! Dialogflow request and response types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use paydesk_core::text_from_value;

/// Fulfillment webhook request (only the fields this service reads).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentRequest {
    /// Unique id of the detect-intent response.
    #[serde(default)]
    pub response_id: Option<String>,
    /// Conversation session path.
    #[serde(default)]
    pub session: Option<String>,
    /// Result of intent matching.
    pub query_result: QueryResult,
    /// The platform request that triggered the detect-intent call.
    #[serde(default)]
    pub original_detect_intent_request: Option<OriginalDetectIntentRequest>,
}

impl FulfillmentRequest {
    /// The matched intent's display name.
    #[must_use]
    pub fn intent_name(&self) -> &str {
        &self.query_result.intent.display_name
    }

    /// Parameters extracted from the user's utterance.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.query_result.parameters
    }
}

/// Intent matching result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// What the user said.
    #[serde(default)]
    pub query_text: Option<String>,
    /// Matched intent.
    pub intent: Intent,
    /// Extracted parameters; `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Parameters,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Matched intent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Intent resource name.
    #[serde(default)]
    pub name: Option<String>,
    /// Human-readable intent name used for dispatch.
    pub display_name: String,
}

/// Integration-specific payload (Telegram, web demo, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct OriginalDetectIntentRequest {
    /// Integration name.
    #[serde(default)]
    pub source: Option<String>,
    /// Raw payload from the integration.
    #[serde(default)]
    pub payload: Value,
}

impl OriginalDetectIntentRequest {
    /// Top-level keys of the integration payload (values are not logged).
    pub fn payload_keys(&self) -> impl Iterator<Item = &str> {
        self.payload
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }
}

/// Intent parameters keyed by parameter name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Read a parameter as cleaned text.
    ///
    /// Numbers are stringified and single-element lists unwrapped; empty
    /// values and `"null"` read as `None`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(text_from_value)
    }

    /// Names of the supplied parameters (values are not logged).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Fulfillment webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResponse {
    /// Plain reply text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_text: Option<String>,
    /// Rich reply messages, one text block each.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fulfillment_messages: Vec<Message>,
}

impl FulfillmentResponse {
    /// A single plain-text reply.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: Some(text.into()),
            fulfillment_messages: Vec::new(),
        }
    }

    /// One message per block, with the blocks also joined into the plain
    /// text for integrations that only read `fulfillmentText`.
    #[must_use]
    pub fn messages(blocks: Vec<String>) -> Self {
        let joined = blocks.join("\n\n");
        Self {
            fulfillment_text: Some(joined),
            fulfillment_messages: blocks.into_iter().map(Message::text).collect(),
        }
    }

    /// The plain reply text, or an empty string.
    #[must_use]
    pub fn reply(&self) -> &str {
        self.fulfillment_text.as_deref().unwrap_or_default()
    }
}

/// A rich response message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Text content.
    pub text: MessageText,
}

impl Message {
    /// A message with a single line of text.
    #[must_use]
    pub fn text(text: String) -> Self {
        Self {
            text: MessageText { text: vec![text] },
        }
    }
}

/// Text message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText {
    /// Alternative texts; Dialogflow shows one.
    pub text: Vec<String>,
}
