//! Domain and storage error models.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type returned by store collaborators.
pub type StoreResult<T> = Result<T, StoreError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// malformed ids). Infrastructure concerns belong in [`StoreError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Failure reported by a data-store collaborator.
///
/// Lookups that simply find nothing return `Ok(None)`; this type is for the
/// store itself misbehaving or rejecting a write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique field already holds this value.
    #[error("duplicate value for unique field '{field}'")]
    Duplicate { field: &'static str },

    /// The store could not serve the request (connection, poisoned lock, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
