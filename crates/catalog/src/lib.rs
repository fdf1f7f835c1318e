//! Stock ledger for the ordering core.
//!
//! The authoritative per-product available-quantity counter, read at cart
//! mutation and checkout re-validation time and decremented on fulfilled
//! purchases.

pub mod error;
pub mod ledger;

pub use error::CatalogError;
pub use ledger::StockLedger;
