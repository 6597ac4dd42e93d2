//! Core types for paydesk.
//!
//! This crate holds the documents the fulfillment service stores and the
//! rules for matching them:
//!
//! - **Payments**: `PaymentRecord`, `PaymentLookup`, access-window expiry
//! - **Catalog**: `CatalogItem`, `CatalogQuery` and its fallback stages
//! - **Normalization**: lenient price and text parsing for hand-maintained data
//! - **Identifiers**: ULID store keys `RecordId`, `CatalogId`
//!
//! Prices are whole major currency units (rupees), stored as `i64`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod error;
pub mod ids;
pub mod normalize;
pub mod payment;

pub use catalog::{parse_catalog_seed, CatalogItem, CatalogQuery};
pub use error::{DeskError, Result};
pub use ids::{CatalogId, IdError, RecordId};
pub use normalize::{clean_text, fold_eq, normalize_price, text_from_value};
pub use payment::{
    format_capture_date, format_price, is_placeholder, PaymentLookup, PaymentRecord, DATE_FORMAT,
    DEFAULT_ACCESS_WINDOW_DAYS, DEFAULT_CURRENCY, NOT_AVAILABLE, NOT_PROVIDED, UNKNOWN_DATE,
};
