//! Domain layer for the ordering core.
//!
//! The source store holds schema-less JSON blobs; this crate gives every
//! entity an explicit typed record (user, session token, product, cart line,
//! cart, order) plus the money type and the pure amount calculator.

pub mod collections;
pub mod money;
pub mod pricing;
pub mod records;

pub use money::Money;
pub use pricing::cart_total;
pub use records::{Cart, CartLine, Order, Product, SessionToken, UserRecord};
