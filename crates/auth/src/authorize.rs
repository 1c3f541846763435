use thiserror::Error;

use flow_core::{Owned, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: resource is owned by another user")]
    NotOwner,
}

/// Ownership check: does `requester` own a resource recorded as `owner`?
pub fn is_owner(requester: UserId, owner: UserId) -> bool {
    requester == owner
}

/// Authorize a read, update or delete of an owned resource.
///
/// - No IO
/// - No panics
/// - Creation never goes through here: new resources are stamped with the
///   creator as owner instead.
pub fn authorize_owner<R: Owned>(requester: UserId, resource: &R) -> Result<(), AuthzError> {
    if is_owner(requester, resource.owner()) {
        Ok(())
    } else {
        tracing::warn!(
            requester = %requester,
            owner = %resource.owner(),
            "ownership check denied"
        );
        Err(AuthzError::NotOwner)
    }
}
