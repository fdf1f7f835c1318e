//! Session configuration loaded from environment variables.

use chrono::Duration;

/// Session authority configuration.
///
/// Reads from environment variables:
/// - `HASHING_SECRET` — secret mixed into credential hashes
///   (default: `"thisIsASecret"`)
///
/// The token time-to-live is fixed at one hour from issuance or extension.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub hashing_secret: String,
    pub token_ttl: Duration,
}

impl SessionConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            hashing_secret: std::env::var("HASHING_SECRET")
                .unwrap_or_else(|_| "thisIsASecret".to_string()),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hashing_secret: "thisIsASecret".to_string(),
            token_ttl: Duration::hours(1),
        }
    }
}
