//! Catalog seeding at startup.

use std::path::Path;

use paydesk_core::{parse_catalog_seed, DeskError};
use paydesk_store::{Store, StoreError};

/// Errors raised while seeding the catalog.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read catalog seed {path}: {source}")]
    Read {
        /// Seed file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The seed file is not a JSON array of catalog items.
    #[error(transparent)]
    Parse(#[from] DeskError),

    /// The store rejected a write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Load catalog items from a JSON file and insert the ones not already
/// listed. Returns the number of items written.
///
/// # Errors
///
/// Returns [`SeedError`] if the file is missing or malformed, or the store
/// write fails.
pub fn seed_catalog_from_file(store: &dyn Store, path: impl AsRef<Path>) -> Result<usize, SeedError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let items = parse_catalog_seed(&contents)?;
    let inserted = store.seed_catalog(&items)?;

    tracing::info!(
        path = %path.display(),
        listed = items.len(),
        inserted,
        "Catalog seeded"
    );
    Ok(inserted)
}
