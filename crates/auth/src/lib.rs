//! `flow-auth` — credential authentication and per-resource authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage engines: stores
//! are consumed through the [`AccountStore`] port and the clock is always passed
//! in by the caller.

pub mod account;
pub mod authenticate;
pub mod authorize;
pub mod claims;
pub mod password;
pub mod token;

pub use account::{Account, AccountStore, AccountSummary, MIN_PASSWORD_LEN, Registration};
pub use authenticate::{Authenticator, CredentialError, LoginHandle};
pub use authorize::{AuthzError, authorize_owner, is_owner};
pub use claims::{Claims, TOKEN_LIFETIME_SECS, TokenValidationError, validate_claims};
pub use password::{BcryptHasher, CredentialHasher, HashError, MAX_SECRET_BYTES, PasswordDigest};
pub use token::{EmptySigningSecret, Hs256TokenCodec, SigningSecret, TokenError, TokenValidator};
