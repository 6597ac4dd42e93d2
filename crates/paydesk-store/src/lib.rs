//! `RocksDB` storage layer for paydesk.
//!
//! This crate persists the two document collections the service works
//! with: captured payments and the purchasable catalog.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `payments`: Payment records, keyed by `record_id` (ULID)
//! - `payments_by_email`, `payments_by_payment_id`,
//!   `payments_by_transaction_id`, `payments_by_rrn`: lookup indexes
//! - `catalog`: Catalog items, keyed by `catalog_id` (ULID)
//!
//! Because keys are ULIDs, every scan returns documents in insertion order,
//! which is what "first match" means for catalog resolution.
//!
//! # Example
//!
//! ```no_run
//! use paydesk_core::PaymentLookup;
//! use paydesk_store::{RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/paydesk-db").unwrap();
//! let lookup = PaymentLookup::new(Some("asha@example.com"), None, None, None);
//! let payments = store.find_payments(&lookup).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use paydesk_core::{CatalogItem, CatalogQuery, PaymentLookup, PaymentRecord, RecordId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer so handlers only depend on the
/// document operations they need.
pub trait Store: Send + Sync {
    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Insert a payment record together with its index entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_payment(&self, payment: &PaymentRecord) -> Result<()>;

    /// Get a payment by record ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_payment(&self, record_id: &RecordId) -> Result<Option<PaymentRecord>>;

    /// Find every payment matching any field of the lookup, oldest first.
    ///
    /// An empty lookup returns no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_payments(&self, lookup: &PaymentLookup) -> Result<Vec<PaymentRecord>>;

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Insert or replace a catalog item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_catalog_item(&self, item: &CatalogItem) -> Result<()>;

    /// Return the first catalog item (in insertion order) matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_catalog_item(&self, query: &CatalogQuery) -> Result<Option<CatalogItem>>;

    /// List all catalog items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_catalog(&self) -> Result<Vec<CatalogItem>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Insert the given items, skipping any that duplicate an existing
    /// listing. Returns the number of items written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn seed_catalog(&self, items: &[CatalogItem]) -> Result<usize>;
}
