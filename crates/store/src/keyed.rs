use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Contract for a keyed record store grouped by named collection.
///
/// `create` is insert-only and `update` is replace-only; the core relies on
/// both properties. Implementations need no internal locking beyond what is
/// required for their own consistency — per-resource-key serialization is
/// the caller's job.
#[async_trait]
pub trait KeyedStore: Send + Sync {
    /// Inserts a record; fails with [`StoreError::DuplicateKey`] if the key
    /// already exists.
    ///
    /// [`StoreError::DuplicateKey`]: crate::StoreError::DuplicateKey
    async fn create(&self, collection: &str, key: &str, record: Value) -> Result<()>;

    /// Reads a record; fails with [`StoreError::NotFound`] if absent.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn read(&self, collection: &str, key: &str) -> Result<Value>;

    /// Replaces an existing record; fails with [`StoreError::NotFound`] if
    /// the key is absent.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn update(&self, collection: &str, key: &str, record: Value) -> Result<()>;

    /// Deletes a record; fails with [`StoreError::NotFound`] if absent.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// Lists the keys currently present in a collection. An unknown
    /// collection lists as empty.
    async fn list(&self, collection: &str) -> Result<Vec<String>>;
}
