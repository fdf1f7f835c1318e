use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{KeyedStore, Result, StoreError};

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, BTreeMap<String, Value>>,
    fail_writes: HashSet<String>,
    fail_reads: HashSet<String>,
}

/// In-memory keyed store.
///
/// Backs the test suites and provides per-collection failure injection so
/// the checkout fan-out's partial-failure behavior can be exercised.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write (create/update/delete) against a collection fail
    /// with a backend error.
    pub async fn set_fail_writes(&self, collection: &str, fail: bool) {
        let mut state = self.state.write().await;
        if fail {
            state.fail_writes.insert(collection.to_string());
        } else {
            state.fail_writes.remove(collection);
        }
    }

    /// Makes every read against a collection fail with a backend error.
    pub async fn set_fail_reads(&self, collection: &str, fail: bool) {
        let mut state = self.state.write().await;
        if fail {
            state.fail_reads.insert(collection.to_string());
        } else {
            state.fail_reads.remove(collection);
        }
    }

    /// Returns the number of records in a collection.
    pub async fn record_count(&self, collection: &str) -> usize {
        let state = self.state.read().await;
        state.collections.get(collection).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl KeyedStore for MemoryStore {
    async fn create(&self, collection: &str, key: &str, record: Value) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_writes.contains(collection) {
            return Err(StoreError::Backend(format!(
                "write to {collection} refused"
            )));
        }
        let records = state.collections.entry(collection.to_string()).or_default();
        if records.contains_key(key) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }
        records.insert(key.to_string(), record);
        Ok(())
    }

    async fn read(&self, collection: &str, key: &str) -> Result<Value> {
        let state = self.state.read().await;
        if state.fail_reads.contains(collection) {
            return Err(StoreError::Backend(format!(
                "read from {collection} refused"
            )));
        }
        state
            .collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })
    }

    async fn update(&self, collection: &str, key: &str, record: Value) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_writes.contains(collection) {
            return Err(StoreError::Backend(format!(
                "write to {collection} refused"
            )));
        }
        let records = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;
        match records.get_mut(key) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            }),
        }
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_writes.contains(collection) {
            return Err(StoreError::Backend(format!(
                "write to {collection} refused"
            )));
        }
        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|records| records.remove(key));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            }),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<String>> {
        let state = self.state.read().await;
        if state.fail_reads.contains(collection) {
            return Err(StoreError::Backend(format!(
                "read from {collection} refused"
            )));
        }
        Ok(state
            .collections
            .get(collection)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default())
    }
}
