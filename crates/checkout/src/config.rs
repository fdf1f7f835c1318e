//! Checkout configuration loaded from environment variables.

/// Charge parameters for the payment gateway.
///
/// Reads from environment variables:
/// - `CHECKOUT_CURRENCY` — settlement currency (default: `"usd"`)
/// - `CHECKOUT_SOURCE` — payment source token (default: `"tok_visa"`)
/// - `CHECKOUT_DESCRIPTION_PREFIX` — charge description prefix
///   (default: `"PizzaSite"`)
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub currency: String,
    pub source_token: String,
    pub description_prefix: String,
}

impl CheckoutConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            currency: std::env::var("CHECKOUT_CURRENCY").unwrap_or(default.currency),
            source_token: std::env::var("CHECKOUT_SOURCE").unwrap_or(default.source_token),
            description_prefix: std::env::var("CHECKOUT_DESCRIPTION_PREFIX")
                .unwrap_or(default.description_prefix),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: "usd".to_string(),
            source_token: "tok_visa".to_string(),
            description_prefix: "PizzaSite".to_string(),
        }
    }
}
