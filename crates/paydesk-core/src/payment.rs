//! Captured payment records and the lookup used to find them.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::normalize::{clean_text, deserialize_price, deserialize_text, fold_eq};

/// Layout of the human-readable payment date stored on every record.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date placeholder used when the gateway did not report a creation time.
pub const UNKNOWN_DATE: &str = "Unknown";

/// Placeholder for identifiers the gateway did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for contact details the customer did not enter.
pub const NOT_PROVIDED: &str = "not_provided";

/// Currency assumed when the gateway omits one.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Number of days a captured payment keeps granting access to its download.
pub const DEFAULT_ACCESS_WINDOW_DAYS: i64 = 7;

/// A captured payment, as persisted by the ingestor.
///
/// Records are immutable once written and never deleted by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Store key; also fixes the record's position in insertion order.
    pub id: RecordId,

    /// Customer email as entered at checkout.
    pub email: String,

    /// Customer phone number.
    pub mobile_no: String,

    /// Gateway payment id (`pay_...`).
    pub payment_id: String,

    /// Acquirer transaction id.
    pub transaction_id: String,

    /// Acquirer retrieval reference number (UPI payments).
    #[serde(default)]
    pub rrn: Option<String>,

    /// Capture time formatted with [`DATE_FORMAT`], or [`UNKNOWN_DATE`].
    pub date: String,

    /// Purchased language edition.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub language: Option<String>,

    /// Purchased subject.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub subject: Option<String>,

    /// Purchased month.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub month: Option<String>,

    /// Amount paid in major currency units.
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<i64>,

    /// ISO currency code.
    pub currency: String,

    /// Gateway payment status.
    pub status: String,
}

impl PaymentRecord {
    /// Parse the stored date back into a UTC timestamp.
    ///
    /// Returns `None` for [`UNKNOWN_DATE`] or anything else that does not
    /// follow [`DATE_FORMAT`].
    #[must_use]
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(self.date.trim(), DATE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Whether the access window for this payment has closed.
    ///
    /// Payments without a parseable date never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.captured_at()
            .is_some_and(|captured| now.signed_duration_since(captured) > window)
    }
}

/// Render a gateway `created_at` unix timestamp the way records store it.
///
/// Absent or zero timestamps become [`UNKNOWN_DATE`].
#[must_use]
pub fn format_capture_date(created_at: Option<i64>) -> String {
    created_at
        .filter(|ts| *ts != 0)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map_or_else(
            || UNKNOWN_DATE.to_string(),
            |dt| dt.format(DATE_FORMAT).to_string(),
        )
}

/// True for the placeholder values the ingestor writes when the gateway
/// omits a field. Placeholders are never searchable.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    value == NOT_AVAILABLE || value == NOT_PROVIDED
}

/// Render a price for customer-facing text.
#[must_use]
pub fn format_price(price: Option<i64>, currency: &str) -> String {
    match price {
        None => NOT_AVAILABLE.to_string(),
        Some(units) if currency.eq_ignore_ascii_case(DEFAULT_CURRENCY) => format!("₹{units}"),
        Some(units) => format!("{units} {}", currency.to_uppercase()),
    }
}

/// Identifying fields a customer can supply to find their payments.
///
/// A record matches when *any* supplied field matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentLookup {
    /// Customer email, compared case-insensitively.
    pub email: Option<String>,
    /// Gateway payment id.
    pub payment_id: Option<String>,
    /// Acquirer transaction id.
    pub transaction_id: Option<String>,
    /// Acquirer retrieval reference number.
    pub rrn: Option<String>,
}

impl PaymentLookup {
    /// Build a lookup, dropping empty, `"null"` and placeholder values.
    #[must_use]
    pub fn new(
        email: Option<&str>,
        payment_id: Option<&str>,
        transaction_id: Option<&str>,
        rrn: Option<&str>,
    ) -> Self {
        let clean = |value: Option<&str>| clean_text(value).filter(|v| !is_placeholder(v));
        Self {
            email: clean(email),
            payment_id: clean(payment_id),
            transaction_id: clean(transaction_id),
            rrn: clean(rrn),
        }
    }

    /// True when no identifying field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.payment_id.is_none()
            && self.transaction_id.is_none()
            && self.rrn.is_none()
    }

    /// Disjunctive match against a stored record.
    #[must_use]
    pub fn matches(&self, record: &PaymentRecord) -> bool {
        let email = self
            .email
            .as_deref()
            .is_some_and(|e| fold_eq(e, &record.email));
        let payment_id = self
            .payment_id
            .as_deref()
            .is_some_and(|p| p == record.payment_id);
        let transaction_id = self
            .transaction_id
            .as_deref()
            .is_some_and(|t| t == record.transaction_id);
        let rrn = self
            .rrn
            .as_deref()
            .is_some_and(|r| record.rrn.as_deref() == Some(r));

        email || payment_id || transaction_id || rrn
    }
}
