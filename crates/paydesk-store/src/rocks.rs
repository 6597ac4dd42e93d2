//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use paydesk_core::{
    is_placeholder, CatalogItem, CatalogQuery, PaymentLookup, PaymentRecord, RecordId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Collect the record IDs filed under `value` in a secondary index.
    fn scan_index(
        &self,
        index: &'static str,
        value: &str,
        found: &mut BTreeSet<RecordId>,
    ) -> Result<()> {
        let cf = self.cf(index)?;
        let prefix = keys::index_prefix(value);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            let record_id =
                keys::record_id_from_index_key(&key).map_err(|_| StoreError::CorruptIndex { index })?;
            found.insert(record_id);
        }

        Ok(())
    }

    /// Decode every catalog item, oldest first.
    fn scan_catalog(&self) -> Result<Vec<CatalogItem>> {
        let cf = self.cf(cf::CATALOG)?;

        self.db
            .iterator_cf(&cf, IteratorMode::Start)
            .map(|item| {
                let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
                Self::deserialize(&value)
            })
            .collect()
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Payment Operations
    // =========================================================================

    fn put_payment(&self, payment: &PaymentRecord) -> Result<()> {
        let cf_payments = self.cf(cf::PAYMENTS)?;
        let cf_by_email = self.cf(cf::PAYMENTS_BY_EMAIL)?;
        let cf_by_payment_id = self.cf(cf::PAYMENTS_BY_PAYMENT_ID)?;
        let cf_by_transaction_id = self.cf(cf::PAYMENTS_BY_TRANSACTION_ID)?;
        let cf_by_rrn = self.cf(cf::PAYMENTS_BY_RRN)?;

        let key = keys::payment_key(&payment.id);
        let value = Self::serialize(payment)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_payments, &key, &value);

        // Index entries carry no value; placeholders are left out of the indexes.
        if !is_placeholder(&payment.email) {
            let email = keys::email_index_value(&payment.email);
            batch.put_cf(&cf_by_email, keys::index_key(&email, &payment.id), []);
        }
        if !is_placeholder(&payment.payment_id) {
            batch.put_cf(
                &cf_by_payment_id,
                keys::index_key(&payment.payment_id, &payment.id),
                [],
            );
        }
        if !is_placeholder(&payment.transaction_id) {
            batch.put_cf(
                &cf_by_transaction_id,
                keys::index_key(&payment.transaction_id, &payment.id),
                [],
            );
        }
        if let Some(rrn) = payment.rrn.as_deref().filter(|r| !is_placeholder(r)) {
            batch.put_cf(&cf_by_rrn, keys::index_key(rrn, &payment.id), []);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_payment(&self, record_id: &RecordId) -> Result<Option<PaymentRecord>> {
        let cf = self.cf(cf::PAYMENTS)?;
        let key = keys::payment_key(record_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn find_payments(&self, lookup: &PaymentLookup) -> Result<Vec<PaymentRecord>> {
        let mut record_ids = BTreeSet::new();

        if let Some(email) = &lookup.email {
            let email = keys::email_index_value(email);
            self.scan_index(cf::PAYMENTS_BY_EMAIL, &email, &mut record_ids)?;
        }
        if let Some(payment_id) = &lookup.payment_id {
            self.scan_index(cf::PAYMENTS_BY_PAYMENT_ID, payment_id, &mut record_ids)?;
        }
        if let Some(transaction_id) = &lookup.transaction_id {
            self.scan_index(cf::PAYMENTS_BY_TRANSACTION_ID, transaction_id, &mut record_ids)?;
        }
        if let Some(rrn) = &lookup.rrn {
            self.scan_index(cf::PAYMENTS_BY_RRN, rrn, &mut record_ids)?;
        }

        let mut payments = Vec::with_capacity(record_ids.len());
        for record_id in record_ids {
            match self.get_payment(&record_id)? {
                Some(payment) if lookup.matches(&payment) => payments.push(payment),
                Some(_) => {}
                None => {
                    tracing::warn!(record_id = %record_id, "Index entry points at a missing payment");
                }
            }
        }

        Ok(payments)
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    fn put_catalog_item(&self, item: &CatalogItem) -> Result<()> {
        let cf = self.cf(cf::CATALOG)?;
        let key = keys::catalog_key(&item.id);
        let value = Self::serialize(item)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn find_catalog_item(&self, query: &CatalogQuery) -> Result<Option<CatalogItem>> {
        let cf = self.cf(cf::CATALOG)?;

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let candidate: CatalogItem = Self::deserialize(&value)?;

            if query.matches(&candidate) {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }

    fn list_catalog(&self) -> Result<Vec<CatalogItem>> {
        self.scan_catalog()
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn seed_catalog(&self, items: &[CatalogItem]) -> Result<usize> {
        let cf = self.cf(cf::CATALOG)?;
        let mut known = self.scan_catalog()?;

        let mut batch = WriteBatch::default();
        let mut written = 0;

        for item in items {
            if known.iter().any(|existing| existing.same_listing(item)) {
                tracing::debug!(subject = ?item.subject, price = ?item.price, "Catalog item already present");
                continue;
            }

            batch.put_cf(&cf, keys::catalog_key(&item.id), Self::serialize(item)?);
            known.push(item.clone());
            written += 1;
        }

        // Write atomically
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(written)
    }
}
