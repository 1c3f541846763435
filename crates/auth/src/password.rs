//! Credential hashing (salted, adaptive-cost, one-way).

use thiserror::Error;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt only reads this many bytes of a secret; longer ones are refused
/// rather than silently truncated.
pub const MAX_SECRET_BYTES: usize = 72;

/// One-way digest of a secret, in bcrypt's modular crypt format.
///
/// `Debug` never prints the digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest previously produced by a [`CredentialHasher`] and loaded
    /// from storage.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("invalid hash cost {0} (expected {min}..={max})", min = MIN_COST, max = MAX_COST)]
    InvalidCost(u32),

    #[error("secret exceeds {max} bytes", max = MAX_SECRET_BYTES)]
    SecretTooLong,
}

/// Hash and verify stored secrets.
///
/// A failed `hash` must abort the calling operation; nothing may be stored
/// unhashed.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, secret: &str) -> Result<PasswordDigest, HashError>;

    /// Compare `candidate` against `digest` without leaking partial matches
    /// through timing. A digest that cannot be parsed never verifies.
    fn verify(&self, digest: &PasswordDigest, candidate: &str) -> bool;
}

/// bcrypt-backed hasher with a configurable work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Result<Self, HashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, secret: &str) -> Result<PasswordDigest, HashError> {
        if secret.len() > MAX_SECRET_BYTES {
            return Err(HashError::SecretTooLong);
        }
        bcrypt::hash(secret, self.cost)
            .map(PasswordDigest)
            .map_err(|e| HashError::Hashing(e.to_string()))
    }

    fn verify(&self, digest: &PasswordDigest, candidate: &str) -> bool {
        // Past the limit a candidate could match on its prefix alone.
        if candidate.len() > MAX_SECRET_BYTES {
            return false;
        }
        // bcrypt compares the recomputed hash in constant time.
        bcrypt::verify(candidate, digest.as_str()).unwrap_or(false)
    }
}
