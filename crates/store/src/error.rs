use thiserror::Error;

/// Errors that can occur when interacting with the keyed store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this key already exists; `create` is insert-only.
    #[error("Duplicate key in {collection}: {key}")]
    DuplicateKey { collection: String, key: String },

    /// No record exists under this key.
    #[error("Not found in {collection}: {key}")]
    NotFound { collection: String, key: String },

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store failed.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true for the not-found case, which most callers treat as an
    /// ordinary absence rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
