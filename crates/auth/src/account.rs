//! Credential records and the store port used to resolve them.
//!
//! Invariants:
//! - `username` and `email` are each unique across all accounts.
//! - The stored secret is only ever a [`PasswordDigest`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use flow_core::{DomainError, DomainResult, StoreResult, UserId};

use crate::password::{MAX_SECRET_BYTES, PasswordDigest};

pub const MIN_PASSWORD_LEN: usize = 6;

/// A stored credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: PasswordDigest,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Redacted view, safe to return to clients.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Identity summary without the stored digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Validated registration input.
#[derive(Clone)]
pub struct Registration {
    username: String,
    email: String,
    password: String,
}

impl Registration {
    /// Validate and normalize registration input.
    ///
    /// The username is trimmed; the email is trimmed and lower-cased.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> DomainResult<Self> {
        let username = username.into().trim().to_string();
        let email = normalize_email(&email.into());
        let password = password.into();

        if username.is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        if !is_plausible_email(&email) {
            return Err(DomainError::validation("invalid email format"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if password.len() > MAX_SECRET_BYTES {
            return Err(DomainError::validation(format!(
                "password must be at most {MAX_SECRET_BYTES} bytes"
            )));
        }

        Ok(Self {
            username,
            email,
            password,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Data-access port for credential records.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` means the store
/// itself failed.
pub trait AccountStore: Send + Sync {
    fn find_by_id(&self, id: UserId) -> StoreResult<Option<Account>>;
    fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>>;
    fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Persist a new account. Must fail with `StoreError::Duplicate` when the
    /// username or email is already taken, even under concurrent inserts.
    fn insert(&self, account: Account) -> StoreResult<()>;
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn find_by_id(&self, id: UserId) -> StoreResult<Option<Account>> {
        (**self).find_by_id(id)
    }

    fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        (**self).find_by_username(username)
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        (**self).find_by_email(email)
    }

    fn insert(&self, account: Account) -> StoreResult<()> {
        (**self).insert(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_normalizes_fields() {
        let r = Registration::new("  alice ", " A@X.com ", "pw123456").unwrap();
        assert_eq!(r.username(), "alice");
        assert_eq!(r.email(), "a@x.com");
    }

    #[test]
    fn registration_requires_username() {
        assert!(matches!(
            Registration::new("   ", "a@x.com", "pw123456"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn registration_rejects_bad_emails() {
        for email in ["", "alice", "@x.com", "a@", "a@b@c", "a b@x.com"] {
            assert!(Registration::new("alice", email, "pw123456").is_err(), "{email}");
        }
    }

    #[test]
    fn registration_enforces_min_password_length() {
        assert!(Registration::new("alice", "a@x.com", "12345").is_err());
        assert!(Registration::new("alice", "a@x.com", "123456").is_ok());
    }

    #[test]
    fn registration_rejects_passwords_bcrypt_would_truncate() {
        assert!(Registration::new("alice", "a@x.com", "p".repeat(MAX_SECRET_BYTES)).is_ok());
        assert!(matches!(
            Registration::new("alice", "a@x.com", "p".repeat(100)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn registration_debug_hides_password() {
        let r = Registration::new("alice", "a@x.com", "pw123456").unwrap();
        assert!(!format!("{r:?}").contains("pw123456"));
    }

    #[test]
    fn summary_omits_digest() {
        let account = Account {
            id: UserId::new(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: PasswordDigest::from_stored("$2b$04$abc"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(account.summary()).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
        assert_eq!(json["username"], "alice");
    }
}
