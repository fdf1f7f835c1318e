use cart::CartError;
use catalog::CatalogError;
use common::ProductKey;
use store::StoreError;
use thiserror::Error;

/// A cart line whose quantity exceeded the product's stock at
/// re-validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLine {
    pub key: ProductKey,
    pub available: u32,
    pub requested: u32,
}

/// Errors a payment or notification gateway can return.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway rejected the request.
    #[error("Declined: {0}")]
    Declined(String),

    /// The gateway could not be reached.
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Failures surfaced synchronously to the checkout caller.
///
/// Everything except an explicit decline is caller-retryable; no retry is
/// performed by the core itself. There is no idempotency key on the charge,
/// so a client-side retry of a checkout whose response was lost can produce
/// a duplicate charge — a known gap inherited from the original design.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more lines exceed current stock; nothing was charged.
    #[error("Insufficient stock for {} line(s)", .0.len())]
    InsufficientStock(Vec<ShortLine>),

    /// The gateway refused the charge; the cart is untouched.
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    /// The gateway could not be reached; the cart is untouched.
    #[error("Payment gateway error: {0}")]
    PaymentGatewayError(String),

    /// A non-empty cart produced no chargeable amount.
    #[error("No chargeable amount for a non-empty cart")]
    AmountUnavailable,

    /// A record lookup upstream of the charge failed.
    #[error("Internal read error: {0}")]
    InternalRead(String),

    /// Cart access error.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog access error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Keyed store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Record decoding error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<GatewayError> for CheckoutError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Declined(reason) => CheckoutError::PaymentDeclined(reason),
            GatewayError::Transport(reason) => CheckoutError::PaymentGatewayError(reason),
        }
    }
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
