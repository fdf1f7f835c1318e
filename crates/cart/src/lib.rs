//! Cart aggregation for the ordering core.
//!
//! Merges quantity deltas into a user's cart, validated against catalog
//! stock at mutation time. All mutations of one user's cart are serialized
//! behind a per-cart key lock; carts of different users stay concurrent.

pub mod error;
pub mod service;

pub use error::CartError;
pub use service::CartService;
