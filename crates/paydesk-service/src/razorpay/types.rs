//! Razorpay webhook types.

use serde::Deserialize;
use serde_json::Value;

use paydesk_core::{
    clean_text, format_capture_date, text_from_value, PaymentRecord, RecordId, DEFAULT_CURRENCY,
    NOT_AVAILABLE, NOT_PROVIDED,
};

/// The only event type that creates a payment record.
pub const EVENT_PAYMENT_CAPTURED: &str = "payment.captured";

/// Status stored when the gateway does not report one.
const UNKNOWN_STATUS: &str = "unknown";

/// Razorpay webhook envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEvent {
    /// Event type, e.g. `payment.captured`.
    #[serde(default)]
    pub event: String,
    /// Merchant account the event belongs to.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Entities referenced by the event.
    #[serde(default)]
    pub payload: EventPayload,
    /// Event creation time (Unix).
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl WebhookEvent {
    /// Whether this event reports a captured payment.
    #[must_use]
    pub fn is_payment_captured(&self) -> bool {
        self.event == EVENT_PAYMENT_CAPTURED
    }

    /// The payment entity, or an empty one when the payload carries none.
    #[must_use]
    pub fn payment(&self) -> &PaymentEntity {
        &self.payload.payment.entity
    }
}

/// Event payload container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    /// Payment wrapper.
    #[serde(default)]
    pub payment: PaymentWrapper,
}

/// Wrapper around the payment entity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentWrapper {
    /// The payment itself.
    #[serde(default)]
    pub entity: PaymentEntity,
}

/// Razorpay payment entity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentEntity {
    /// Payment ID (`pay_...`).
    #[serde(default)]
    pub id: Option<String>,
    /// Amount in paise.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Currency (e.g., "INR").
    #[serde(default)]
    pub currency: Option<String>,
    /// Status (captured, authorized, failed, etc.).
    #[serde(default)]
    pub status: Option<String>,
    /// Payment method (upi, card, netbanking, ...).
    #[serde(default)]
    pub method: Option<String>,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer phone number.
    #[serde(default)]
    pub contact: Option<String>,
    /// Acquirer-assigned references.
    #[serde(default)]
    pub acquirer_data: AcquirerData,
    /// Merchant notes. Razorpay sends `[]` instead of `{}` when empty.
    #[serde(default)]
    pub notes: Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// References assigned by the acquiring bank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcquirerData {
    /// Bank transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Retrieval reference number (UPI).
    #[serde(default)]
    pub rrn: Option<String>,
}

impl PaymentEntity {
    /// Read a merchant note as text. Missing notes and array-shaped notes
    /// yield `None`.
    #[must_use]
    pub fn note(&self, key: &str) -> Option<String> {
        self.notes.as_object()?.get(key).and_then(text_from_value)
    }

    /// Amount in whole currency units, rounded down.
    #[must_use]
    pub fn major_units(&self) -> i64 {
        self.amount.unwrap_or(0).div_euclid(100)
    }

    /// Convert the entity into the record the ingestor persists.
    #[must_use]
    pub fn to_payment_record(&self) -> PaymentRecord {
        let or = |value: &Option<String>, default: &str| {
            clean_text(value.as_deref()).unwrap_or_else(|| default.to_string())
        };

        PaymentRecord {
            id: RecordId::generate(),
            email: or(&self.email, NOT_PROVIDED),
            mobile_no: or(&self.contact, NOT_PROVIDED),
            payment_id: or(&self.id, NOT_AVAILABLE),
            transaction_id: or(&self.acquirer_data.transaction_id, NOT_AVAILABLE),
            rrn: clean_text(self.acquirer_data.rrn.as_deref()),
            date: format_capture_date(self.created_at),
            language: self.note("language"),
            subject: self.note("subject"),
            month: self.note("month"),
            price: Some(self.major_units()),
            currency: or(&self.currency, DEFAULT_CURRENCY),
            status: or(&self.status, UNKNOWN_STATUS),
        }
    }
}
