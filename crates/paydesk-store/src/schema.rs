//! Column families backing the payment and catalog collections.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Payment records, keyed by `record_id` (ULID).
    pub const PAYMENTS: &str = "payments";

    /// Index: payments by lower-cased email, keyed by `email || 0x00 || record_id`.
    pub const PAYMENTS_BY_EMAIL: &str = "payments_by_email";

    /// Index: payments by gateway payment id.
    pub const PAYMENTS_BY_PAYMENT_ID: &str = "payments_by_payment_id";

    /// Index: payments by acquirer transaction id.
    pub const PAYMENTS_BY_TRANSACTION_ID: &str = "payments_by_transaction_id";

    /// Index: payments by acquirer retrieval reference number.
    pub const PAYMENTS_BY_RRN: &str = "payments_by_rrn";

    /// Catalog items, keyed by `catalog_id` (ULID).
    pub const CATALOG: &str = "catalog";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::PAYMENTS,
        cf::PAYMENTS_BY_EMAIL,
        cf::PAYMENTS_BY_PAYMENT_ID,
        cf::PAYMENTS_BY_TRANSACTION_ID,
        cf::PAYMENTS_BY_RRN,
        cf::CATALOG,
    ]
}
