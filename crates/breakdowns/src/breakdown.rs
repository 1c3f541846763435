use std::sync::Arc;

use chrono::{DateTime, Utc};

use flow_core::{BreakdownId, DomainError, DomainResult, Entity, Owned, StoreResult, UserId};

/// Validated user input for creating or replacing a breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownDraft {
    name: String,
    description: String,
}

impl BreakdownDraft {
    pub fn new(name: impl Into<String>, description: Option<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        Ok(Self {
            name,
            description: description.unwrap_or_default(),
        })
    }
}

/// A breakdown document.
///
/// # Invariants
/// - `owner` is the creating identity and never changes.
/// - `name` is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    id: BreakdownId,
    owner: UserId,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Breakdown {
    /// New breakdown stamped with `owner` (always the requester).
    pub fn create(owner: UserId, draft: BreakdownDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: BreakdownId::new(),
            owner,
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields. Identity, owner and `created_at` are kept.
    pub fn revise(&mut self, draft: BreakdownDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.description = draft.description;
        self.updated_at = now;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Breakdown {
    type Id = BreakdownId;

    fn id(&self) -> &BreakdownId {
        &self.id
    }
}

impl Owned for Breakdown {
    fn owner(&self) -> UserId {
        self.owner
    }
}

/// Data-access port for breakdown documents.
pub trait BreakdownStore: Send + Sync {
    fn get(&self, id: BreakdownId) -> StoreResult<Option<Breakdown>>;
    fn list_by_owner(&self, owner: UserId) -> StoreResult<Vec<Breakdown>>;
    fn insert(&self, breakdown: Breakdown) -> StoreResult<()>;
    /// Overwrite an existing document. Returns `false` if it no longer exists.
    fn update(&self, breakdown: Breakdown) -> StoreResult<bool>;
    /// Returns `false` if nothing was deleted.
    fn delete(&self, id: BreakdownId) -> StoreResult<bool>;
}

impl<S> BreakdownStore for Arc<S>
where
    S: BreakdownStore + ?Sized,
{
    fn get(&self, id: BreakdownId) -> StoreResult<Option<Breakdown>> {
        (**self).get(id)
    }

    fn list_by_owner(&self, owner: UserId) -> StoreResult<Vec<Breakdown>> {
        (**self).list_by_owner(owner)
    }

    fn insert(&self, breakdown: Breakdown) -> StoreResult<()> {
        (**self).insert(breakdown)
    }

    fn update(&self, breakdown: Breakdown) -> StoreResult<bool> {
        (**self).update(breakdown)
    }

    fn delete(&self, id: BreakdownId) -> StoreResult<bool> {
        (**self).delete(id)
    }
}
