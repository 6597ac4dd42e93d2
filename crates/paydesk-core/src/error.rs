//! Error types for paydesk domain operations.

/// Result type for paydesk domain operations.
pub type Result<T> = std::result::Result<T, DeskError>;

/// Errors raised while building or reading domain documents.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// A catalog seed document could not be parsed.
    #[error("invalid catalog document: {0}")]
    InvalidCatalog(String),
}
