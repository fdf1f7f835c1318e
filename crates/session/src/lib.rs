//! Session authority for the ordering core.
//!
//! Issues, verifies, extends and revokes opaque session tokens, and keeps
//! the account directory they authenticate against. Every protected
//! operation in the system goes through [`SessionAuthority`] first; all
//! verification fails closed.

pub mod authority;
pub mod config;
pub mod directory;
pub mod error;
pub mod hash;

pub use authority::SessionAuthority;
pub use config::SessionConfig;
pub use directory::{NewUser, UserChanges, UserDirectory, UserProfile};
pub use error::SessionError;
pub use hash::hash_password;
