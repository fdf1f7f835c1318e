//! Session token issuance, verification and extension.

use chrono::Utc;
use common::{Email, TokenId};
use domain::{SessionToken, UserRecord, collections};
use store::KeyedStore;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::hash::hash_password;

/// Issues and checks session tokens.
///
/// Token lifecycle: Active → (time passes) → Expired, checked lazily and
/// never actively swept; `extend` resets the expiry but only while the token
/// is still active. Deletion is terminal from any state.
#[derive(Clone)]
pub struct SessionAuthority<S> {
    store: S,
    config: SessionConfig,
}

impl<S: KeyedStore> SessionAuthority<S> {
    /// Creates a session authority over the given store.
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Issues a fresh token for the given credentials.
    ///
    /// The credential hash is looked up in the regular user registry first
    /// and, if absent there, in the administrator registry. A missing
    /// account and a wrong password both fail with
    /// [`SessionError::InvalidCredentials`].
    #[tracing::instrument(skip(self, password))]
    pub async fn issue(&self, email: &Email, password: &str) -> Result<SessionToken> {
        let account = match self.lookup_account(collections::USERS, email).await? {
            Some(record) => record,
            None => self
                .lookup_account(collections::ADMINS, email)
                .await?
                .ok_or(SessionError::InvalidCredentials)?,
        };

        let supplied = hash_password(&self.config.hashing_secret, password);
        if supplied != account.hashed_password {
            return Err(SessionError::InvalidCredentials);
        }

        let token = SessionToken {
            id: TokenId::generate(),
            email: email.clone(),
            expires_at: Utc::now() + self.config.token_ttl,
        };
        self.store
            .create(
                collections::TOKENS,
                token.id.as_str(),
                serde_json::to_value(&token)?,
            )
            .await?;

        tracing::info!(token = %token.id, "session token issued");
        Ok(token)
    }

    /// Checks a caller-supplied bearer token.
    ///
    /// Fails closed: returns false unless the token id is well-formed, the
    /// token exists, is unexpired, and — when `email` is supplied — is bound
    /// to exactly that email. Store failures also verify as false.
    pub async fn verify(&self, token_id: &str, email: Option<&Email>) -> bool {
        let Some(token) = self.load_valid(token_id).await else {
            return false;
        };
        match email {
            Some(email) => &token.email == email,
            None => true,
        }
    }

    /// Checks that a bearer token belongs to a current administrator.
    ///
    /// Administrator membership is re-listed from the directory on every
    /// call, so revoking an administrator takes effect immediately.
    pub async fn verify_admin(&self, token_id: &str) -> bool {
        let Some(token) = self.load_valid(token_id).await else {
            return false;
        };
        let Ok(admins) = self.store.list(collections::ADMINS).await else {
            return false;
        };
        admins.iter().any(|key| key == token.email.as_str())
    }

    /// Pushes an active token's expiry one TTL into the future. A token
    /// already past expiry fails with [`SessionError::TokenExpired`] and is
    /// left unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn extend(&self, token_id: &TokenId) -> Result<SessionToken> {
        let mut token = self.load(token_id).await?;
        if token.is_expired(Utc::now()) {
            return Err(SessionError::TokenExpired);
        }

        token.expires_at = Utc::now() + self.config.token_ttl;
        let result = self
            .store
            .update(
                collections::TOKENS,
                token_id.as_str(),
                serde_json::to_value(&token)?,
            )
            .await;
        match result {
            Ok(()) => Ok(token),
            // A revoke can land between the read and the write
            Err(e) if e.is_not_found() => Err(SessionError::TokenNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a token. Terminal: the id can never be used again.
    #[tracing::instrument(skip(self))]
    pub async fn revoke(&self, token_id: &TokenId) -> Result<()> {
        match self.store.delete(collections::TOKENS, token_id.as_str()).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Err(SessionError::TokenNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads the token bound to a caller-supplied id, resolving its owning
    /// email. Used by protected operations that key state by user.
    pub async fn resolve(&self, token_id: &str) -> Option<SessionToken> {
        self.load_valid(token_id).await
    }

    async fn load(&self, token_id: &TokenId) -> Result<SessionToken> {
        match self.store.read(collections::TOKENS, token_id.as_str()).await {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(e) if e.is_not_found() => Err(SessionError::TokenNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Parses, loads and expiry-checks a raw token id, folding every failure
    /// into `None`.
    async fn load_valid(&self, token_id: &str) -> Option<SessionToken> {
        let id = TokenId::parse(token_id)?;
        let token = self.load(&id).await.ok()?;
        if token.is_expired(Utc::now()) {
            return None;
        }
        Some(token)
    }

    async fn lookup_account(&self, collection: &str, email: &Email) -> Result<Option<UserRecord>> {
        match self.store.read(collection, email.as_str()).await {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use store::MemoryStore;

    const PASSWORD: &str = "correct horse";

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    async fn seed_account(store: &MemoryStore, collection: &str, raw_email: &str) {
        let config = SessionConfig::default();
        let record = UserRecord {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email(raw_email),
            hashed_password: hash_password(&config.hashing_secret, PASSWORD),
            address: "1 Analytical Way".to_string(),
        };
        store
            .create(collection, raw_email, serde_json::to_value(&record).unwrap())
            .await
            .unwrap();
    }

    async fn setup() -> (SessionAuthority<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        seed_account(&store, collections::USERS, "ada@example.com").await;
        let authority = SessionAuthority::new(store.clone(), SessionConfig::default());
        (authority, store)
    }

    /// Writes a token record whose expiry is already in the past.
    async fn seed_expired_token(store: &MemoryStore, raw_email: &str) -> TokenId {
        let token = SessionToken {
            id: TokenId::generate(),
            email: email(raw_email),
            expires_at: Utc::now() - Duration::minutes(5),
        };
        store
            .create(
                collections::TOKENS,
                token.id.as_str(),
                serde_json::to_value(&token).unwrap(),
            )
            .await
            .unwrap();
        token.id
    }

    #[tokio::test]
    async fn issue_creates_a_one_hour_token() {
        let (authority, _) = setup().await;
        let before = Utc::now();
        let token = authority.issue(&email("ada@example.com"), PASSWORD).await.unwrap();

        assert_eq!(token.email, email("ada@example.com"));
        assert!(token.expires_at > before + Duration::minutes(59));
        assert!(token.expires_at <= Utc::now() + Duration::hours(1));
    }

    #[tokio::test]
    async fn issue_rejects_wrong_password_and_unknown_account() {
        let (authority, _) = setup().await;

        let err = authority
            .issue(&email("ada@example.com"), "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));

        let err = authority
            .issue(&email("nobody@example.com"), PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));
    }

    #[tokio::test]
    async fn issue_falls_back_to_the_admin_registry() {
        let store = MemoryStore::new();
        seed_account(&store, collections::ADMINS, "root@example.com").await;
        let authority = SessionAuthority::new(store, SessionConfig::default());

        let token = authority.issue(&email("root@example.com"), PASSWORD).await.unwrap();
        assert!(authority.verify_admin(token.id.as_str()).await);
    }

    #[tokio::test]
    async fn verify_checks_existence_expiry_and_binding() {
        let (authority, store) = setup().await;
        let token = authority.issue(&email("ada@example.com"), PASSWORD).await.unwrap();

        assert!(authority.verify(token.id.as_str(), None).await);
        assert!(
            authority
                .verify(token.id.as_str(), Some(&email("ada@example.com")))
                .await
        );
        // Bound to a different email
        assert!(
            !authority
                .verify(token.id.as_str(), Some(&email("eve@example.com")))
                .await
        );
        // Unknown but well-formed id
        assert!(!authority.verify(&"x".repeat(20), None).await);
        // Malformed id fails the same way
        assert!(!authority.verify("short", None).await);
        assert!(!authority.verify("", None).await);

        // Expired token fails even with the matching email
        let expired = seed_expired_token(&store, "ada@example.com").await;
        assert!(
            !authority
                .verify(expired.as_str(), Some(&email("ada@example.com")))
                .await
        );
    }

    #[tokio::test]
    async fn verify_fails_closed_on_store_errors() {
        let (authority, store) = setup().await;
        let token = authority.issue(&email("ada@example.com"), PASSWORD).await.unwrap();

        store.set_fail_reads(collections::TOKENS, true).await;
        assert!(!authority.verify(token.id.as_str(), None).await);
    }

    #[tokio::test]
    async fn admin_revocation_takes_effect_immediately() {
        let store = MemoryStore::new();
        seed_account(&store, collections::ADMINS, "root@example.com").await;
        let authority = SessionAuthority::new(store.clone(), SessionConfig::default());
        let token = authority.issue(&email("root@example.com"), PASSWORD).await.unwrap();

        assert!(authority.verify_admin(token.id.as_str()).await);

        store
            .delete(collections::ADMINS, "root@example.com")
            .await
            .unwrap();
        // No caching: the very next call re-derives membership
        assert!(!authority.verify_admin(token.id.as_str()).await);
    }

    #[tokio::test]
    async fn verify_admin_rejects_ordinary_users() {
        let (authority, _) = setup().await;
        let token = authority.issue(&email("ada@example.com"), PASSWORD).await.unwrap();
        assert!(!authority.verify_admin(token.id.as_str()).await);
    }

    #[tokio::test]
    async fn extend_resets_expiry_while_active() {
        let (authority, _) = setup().await;
        let token = authority.issue(&email("ada@example.com"), PASSWORD).await.unwrap();

        let extended = authority.extend(&token.id).await.unwrap();
        assert!(extended.expires_at >= token.expires_at);
        assert!(authority.verify(token.id.as_str(), None).await);
    }

    #[tokio::test]
    async fn extend_refuses_an_expired_token_and_leaves_it_unchanged() {
        let (authority, store) = setup().await;
        let expired_id = seed_expired_token(&store, "ada@example.com").await;

        let stored_before = store
            .read(collections::TOKENS, expired_id.as_str())
            .await
            .unwrap();

        let err = authority.extend(&expired_id).await.unwrap_err();
        assert!(matches!(err, SessionError::TokenExpired));

        let stored_after = store
            .read(collections::TOKENS, expired_id.as_str())
            .await
            .unwrap();
        assert_eq!(stored_before, stored_after);
    }

    /// Store whose token writes report the record as already gone, standing
    /// in for a revoke that lands between extend's read and its write.
    #[derive(Clone)]
    struct RevokeRacingStore {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl KeyedStore for RevokeRacingStore {
        async fn create(
            &self,
            collection: &str,
            key: &str,
            record: serde_json::Value,
        ) -> store::Result<()> {
            self.inner.create(collection, key, record).await
        }

        async fn read(&self, collection: &str, key: &str) -> store::Result<serde_json::Value> {
            self.inner.read(collection, key).await
        }

        async fn update(
            &self,
            collection: &str,
            key: &str,
            record: serde_json::Value,
        ) -> store::Result<()> {
            if collection == collections::TOKENS {
                return Err(store::StoreError::NotFound {
                    collection: collection.to_string(),
                    key: key.to_string(),
                });
            }
            self.inner.update(collection, key, record).await
        }

        async fn delete(&self, collection: &str, key: &str) -> store::Result<()> {
            self.inner.delete(collection, key).await
        }

        async fn list(&self, collection: &str) -> store::Result<Vec<String>> {
            self.inner.list(collection).await
        }
    }

    #[tokio::test]
    async fn extend_racing_a_revoke_is_token_not_found() {
        let inner = MemoryStore::new();
        seed_account(&inner, collections::USERS, "ada@example.com").await;
        let authority =
            SessionAuthority::new(RevokeRacingStore { inner }, SessionConfig::default());

        let token = authority.issue(&email("ada@example.com"), PASSWORD).await.unwrap();
        let err = authority.extend(&token.id).await.unwrap_err();
        assert!(matches!(err, SessionError::TokenNotFound));
    }

    #[tokio::test]
    async fn extend_unknown_token_is_not_found() {
        let (authority, _) = setup().await;
        let err = authority
            .extend(&TokenId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::TokenNotFound));
    }

    #[tokio::test]
    async fn revoke_is_terminal() {
        let (authority, _) = setup().await;
        let token = authority.issue(&email("ada@example.com"), PASSWORD).await.unwrap();

        authority.revoke(&token.id).await.unwrap();
        assert!(!authority.verify(token.id.as_str(), None).await);

        let err = authority.revoke(&token.id).await.unwrap_err();
        assert!(matches!(err, SessionError::TokenNotFound));
    }
}
