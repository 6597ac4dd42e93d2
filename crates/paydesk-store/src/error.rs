//! Error types for paydesk storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An index entry did not end in a valid record key.
    #[error("corrupt index key in {index}")]
    CorruptIndex {
        /// Column family holding the bad entry.
        index: &'static str,
    },
}
