//! Entity traits: identity, and ownership by a principal.

use crate::id::UserId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity that carries exactly one owner, fixed at creation time.
///
/// Implementors must not expose a way to change the owner after construction.
pub trait Owned: Entity {
    fn owner(&self) -> UserId;
}
