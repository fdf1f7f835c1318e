//! Keyed record store for the ordering core.
//!
//! Records are schema-less JSON blobs grouped by named collection. The store
//! guarantees only insert-only `create` and replace-only `update`; it has no
//! native locks, so mutating callers serialize themselves per resource key
//! with [`KeyLocks`].

pub mod error;
pub mod keyed;
pub mod locks;
pub mod memory;

pub use error::{Result, StoreError};
pub use keyed::KeyedStore;
pub use locks::KeyLocks;
pub use memory::MemoryStore;
