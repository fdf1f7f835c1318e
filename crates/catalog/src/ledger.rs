//! Read and decrement access to per-product stock counters.

use common::ProductKey;
use domain::{Product, collections};
use store::{KeyLocks, KeyedStore, StoreError};

use crate::error::{CatalogError, Result};

/// Access glue over the product collections.
///
/// Decrements are read-modify-write sequences with no optimistic-concurrency
/// token in the store, so the ledger serializes them per product key.
/// Clones share the lock registry; construct one ledger per store and clone
/// it wherever product stock is touched.
#[derive(Clone)]
pub struct StockLedger<S> {
    store: S,
    locks: KeyLocks,
}

impl<S: KeyedStore> StockLedger<S> {
    /// Creates a ledger over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
        }
    }

    /// Reads a product record.
    pub async fn read(&self, key: &ProductKey) -> Result<Product> {
        let collection = collections::items(key.category);
        match self.store.read(&collection, &key.name).await {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(e) if e.is_not_found() => Err(CatalogError::ProductNotFound(key.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Inserts a new product; the key must not exist yet.
    #[tracing::instrument(skip(self, product), fields(key = %product.key()))]
    pub async fn create(&self, product: Product) -> Result<()> {
        let key = product.key();
        let collection = collections::items(key.category);
        let result = self
            .store
            .create(&collection, &key.name, serde_json::to_value(&product)?)
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(StoreError::DuplicateKey { .. }) => Err(CatalogError::ProductExists(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Decrements a product's available stock by a purchased quantity.
    ///
    /// Holds the product key lock across the read-modify-write so that
    /// concurrent decrements on the same product cannot lose an update. An
    /// underflow fails without writing, preserving `available_stock >= 0`.
    #[tracing::instrument(skip(self))]
    pub async fn decrement(&self, key: &ProductKey, quantity: u32) -> Result<Product> {
        let collection = collections::items(key.category);
        let _guard = self.locks.acquire(&format!("{collection}:{}", key.name)).await;

        let mut product = self.read(key).await?;
        product.available_stock = product
            .available_stock
            .checked_sub(quantity)
            .ok_or_else(|| CatalogError::InsufficientStock {
                key: key.clone(),
                available: product.available_stock,
                requested: quantity,
            })?;

        self.store
            .update(&collection, &key.name, serde_json::to_value(&product)?)
            .await?;
        tracing::debug!(stock = product.available_stock, "stock decremented");
        Ok(product)
    }
}
