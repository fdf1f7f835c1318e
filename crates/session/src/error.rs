use cart::CartError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during session and account operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The email/password pair did not match any stored credential.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No account exists with this email.
    #[error("No account with that email exists")]
    AccountNotFound,

    /// The token has already expired and cannot be extended.
    #[error("Token has already expired")]
    TokenExpired,

    /// No token exists with the given id.
    #[error("Token not found")]
    TokenNotFound,

    /// An account with this email is already registered.
    #[error("An account with that email already exists")]
    AccountExists,

    /// Malformed or missing input, detected before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cart error while cascading an account deletion.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Keyed store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Record decoding error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
