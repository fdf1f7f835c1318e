//! Shared value types for the ordering core.
//!
//! Every identifier that crosses a crate boundary gets its own newtype so
//! that emails, token ids, and product keys cannot be mixed up.

mod types;

pub use types::{Category, Email, OrderId, ProductKey, TokenId, TOKEN_ID_LEN};
