//! Credential hashing.

use sha2::{Digest, Sha256};

/// Hashes a password with the configured secret: SHA-256 over the secret
/// followed by the password, hex-encoded.
pub fn hash_password(secret: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        use std::fmt::Write;
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_password("s", "pw"), hash_password("s", "pw"));
    }

    #[test]
    fn hash_depends_on_secret_and_password() {
        assert_ne!(hash_password("s1", "pw"), hash_password("s2", "pw"));
        assert_ne!(hash_password("s", "pw1"), hash_password("s", "pw2"));
    }

    #[test]
    fn hash_is_hex_encoded_sha256() {
        let hash = hash_password("s", "pw");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
