//! Key encoding utilities for `RocksDB`.
//!
//! Secondary index keys have the form `value || 0x00 || record_id`, so a
//! prefix scan over `value || 0x00` yields every record carrying that value,
//! ordered by record id and therefore by insertion time.

use paydesk_core::{CatalogId, IdError, RecordId};

const SEPARATOR: u8 = 0x00;

/// Create a payment key from a record ID.
#[must_use]
pub fn payment_key(record_id: &RecordId) -> Vec<u8> {
    record_id.to_bytes().to_vec()
}

/// Create a catalog key from a catalog ID.
#[must_use]
pub fn catalog_key(catalog_id: &CatalogId) -> Vec<u8> {
    catalog_id.to_bytes().to_vec()
}

/// Emails are indexed folded so lookups ignore case.
#[must_use]
pub fn email_index_value(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create a secondary index key.
#[must_use]
pub fn index_key(value: &str, record_id: &RecordId) -> Vec<u8> {
    let mut key = index_prefix(value);
    key.extend_from_slice(&record_id.to_bytes());
    key
}

/// Create the prefix for scanning all records indexed under `value`.
#[must_use]
pub fn index_prefix(value: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(value.len() + 17);
    key.extend_from_slice(value.as_bytes());
    key.push(SEPARATOR);
    key
}

/// Extract the record ID from the tail of an index key.
///
/// # Errors
///
/// Returns an error if the key is shorter than a record ID.
pub fn record_id_from_index_key(key: &[u8]) -> Result<RecordId, IdError> {
    let start = key
        .len()
        .checked_sub(16)
        .ok_or(IdError::InvalidLength { actual: key.len() })?;
    RecordId::from_slice(&key[start..])
}
