//! Registration and login: turns a username/email + password into an account.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use flow_core::{DomainError, StoreError, UserId};

use crate::account::{Account, AccountStore, Registration, normalize_email};
use crate::password::{CredentialHasher, HashError, PasswordDigest};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Unknown handle/contact or wrong password. Never says which.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user with this email already exists")]
    EmailTaken,

    #[error("username already taken")]
    UsernameTaken,

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field: "email" } => Self::EmailTaken,
            StoreError::Duplicate { field: "username" } => Self::UsernameTaken,
            other => Self::Store(other),
        }
    }
}

/// How the caller identifies the account at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginHandle {
    Email(String),
    Username(String),
}

/// Credential verification service.
///
/// Blocking: hashing is CPU-bound, so async callers should run these methods
/// on a blocking thread.
pub struct Authenticator {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
    // Verified against when the handle is unknown so both failure paths cost a hash.
    decoy: OnceLock<Option<PasswordDigest>>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            store,
            hasher,
            decoy: OnceLock::new(),
        }
    }

    /// Create an account.
    ///
    /// Uniqueness of email, then username, is checked before the password is
    /// hashed. The store re-checks on insert to close the race window.
    pub fn register(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> Result<Account, CredentialError> {
        if self.store.find_by_email(registration.email())?.is_some() {
            return Err(CredentialError::EmailTaken);
        }
        if self.store.find_by_username(registration.username())?.is_some() {
            return Err(CredentialError::UsernameTaken);
        }

        let password_hash = self.hasher.hash(registration.password())?;

        let account = Account {
            id: UserId::new(),
            username: registration.username().to_string(),
            email: registration.email().to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(account.clone())?;

        tracing::info!(user_id = %account.id, "account registered");
        Ok(account)
    }

    /// Verify a login attempt.
    pub fn login(&self, handle: &LoginHandle, password: &str) -> Result<Account, CredentialError> {
        let found = match handle {
            LoginHandle::Email(email) => self.store.find_by_email(&normalize_email(email))?,
            LoginHandle::Username(username) => self.store.find_by_username(username.trim())?,
        };

        let Some(account) = found else {
            if let Some(decoy) = self.decoy() {
                let _ = self.hasher.verify(decoy, password);
            }
            tracing::info!("login rejected");
            return Err(CredentialError::InvalidCredentials);
        };

        if !self.hasher.verify(&account.password_hash, password) {
            tracing::info!("login rejected");
            return Err(CredentialError::InvalidCredentials);
        }

        tracing::info!(user_id = %account.id, "login succeeded");
        Ok(account)
    }

    /// Resolve an identity back to its credential record, if it still exists.
    pub fn account(&self, id: UserId) -> Result<Option<Account>, CredentialError> {
        Ok(self.store.find_by_id(id)?)
    }

    fn decoy(&self) -> Option<&PasswordDigest> {
        self.decoy
            .get_or_init(|| self.hasher.hash("decoy-password").ok())
            .as_ref()
    }
}

impl core::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}
