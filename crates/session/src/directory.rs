//! Account directory: registration, profile maintenance and credential
//! lookup.

use cart::CartService;
use common::Email;
use domain::{UserRecord, collections};
use store::{KeyedStore, StoreError};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::hash::hash_password;

/// Input for registering a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password: String,
    pub address: String,
}

/// Partial update for an existing account. A blank value counts as "not
/// supplied", matching the registration validation rules.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// Public view of an account. The credential hash never leaves this crate
/// through the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            address: record.address,
        }
    }
}

/// Directory of registered accounts, keyed by email.
#[derive(Clone)]
pub struct UserDirectory<S> {
    store: S,
    config: SessionConfig,
}

impl<S: KeyedStore> UserDirectory<S> {
    /// Creates a directory over the given store.
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Registers a new account. Registering an email that already exists
    /// fails with [`SessionError::AccountExists`]; all input validation
    /// happens before any side effect.
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: NewUser) -> Result<()> {
        if user.first_name.trim().is_empty() || user.last_name.trim().is_empty() {
            return Err(SessionError::Validation("missing name".to_string()));
        }
        if user.address.trim().is_empty() {
            return Err(SessionError::Validation("missing address".to_string()));
        }
        if user.password.is_empty() {
            return Err(SessionError::Validation("missing password".to_string()));
        }

        let record = UserRecord {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.clone(),
            hashed_password: hash_password(&self.config.hashing_secret, &user.password),
            address: user.address,
        };

        let result = self
            .store
            .create(
                collections::USERS,
                user.email.as_str(),
                serde_json::to_value(&record)?,
            )
            .await;
        match result {
            Ok(()) => {
                tracing::info!("account registered");
                Ok(())
            }
            Err(StoreError::DuplicateKey { .. }) => Err(SessionError::AccountExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a partial update to an existing account. At least one field
    /// must carry a non-blank value; a supplied password is re-hashed.
    #[tracing::instrument(skip(self, changes), fields(email = %email))]
    pub async fn update(&self, email: &Email, changes: UserChanges) -> Result<()> {
        let first_name = non_blank(changes.first_name);
        let last_name = non_blank(changes.last_name);
        let password = non_blank(changes.password);
        let address = non_blank(changes.address);
        if first_name.is_none() && last_name.is_none() && password.is_none() && address.is_none()
        {
            return Err(SessionError::Validation("missing fields to update".to_string()));
        }

        let mut record = self.load(email).await?.ok_or(SessionError::AccountNotFound)?;
        if let Some(first_name) = first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            record.last_name = last_name;
        }
        if let Some(password) = password {
            record.hashed_password = hash_password(&self.config.hashing_secret, &password);
        }
        if let Some(address) = address {
            record.address = address;
        }

        let result = self
            .store
            .update(
                collections::USERS,
                email.as_str(),
                serde_json::to_value(&record)?,
            )
            .await;
        match result {
            Ok(()) => {
                tracing::info!("account updated");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(SessionError::AccountNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes an account and, if one exists, its cart.
    ///
    /// The cart cascade goes through the cart service so the record is
    /// removed under the same per-cart lock every other cart mutation holds.
    #[tracing::instrument(skip(self, carts), fields(email = %email))]
    pub async fn delete(&self, email: &Email, carts: &CartService<S>) -> Result<()>
    where
        S: Clone,
    {
        match self.store.delete(collections::USERS, email.as_str()).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Err(SessionError::AccountNotFound),
            Err(e) => return Err(e.into()),
        }
        carts.clear(email).await?;
        tracing::info!("account deleted");
        Ok(())
    }

    /// Fetches an account profile, or `None` if the email is unknown.
    pub async fn get(&self, email: &Email) -> Result<Option<UserProfile>> {
        Ok(self.load(email).await?.map(UserProfile::from))
    }

    async fn load(&self, email: &Email) -> Result<Option<UserRecord>> {
        match self.store.read(collections::USERS, email.as_str()).await {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Trims an optional field value, treating a blank result as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
