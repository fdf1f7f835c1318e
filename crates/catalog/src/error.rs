use common::ProductKey;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product exists under this category and name.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductKey),

    /// A product with this key already exists.
    #[error("Product already exists: {0}")]
    ProductExists(ProductKey),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock for {key}: {available} available, {requested} requested")]
    InsufficientStock {
        key: ProductKey,
        available: u32,
        requested: u32,
    },

    /// Keyed store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Record decoding error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
