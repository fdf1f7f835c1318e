use catalog::CatalogError;
use common::ProductKey;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// A quantity delta of zero is not a mutation.
    #[error("Quantity delta must be non-zero")]
    InvalidQuantity,

    /// The referenced product does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductKey),

    /// The merged quantity would drop below zero.
    #[error("Resulting quantity for {key} would be negative")]
    NegativeQuantity { key: ProductKey },

    /// The merged quantity exceeds the product's available stock. The
    /// requested quantity is wider than a stock count so that oversized
    /// deltas are reported as supplied.
    #[error("Stock exceeded for {key}: {available} available, {requested} requested")]
    StockExceeded {
        key: ProductKey,
        available: u32,
        requested: u64,
    },

    /// Catalog read error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Keyed store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Record decoding error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
