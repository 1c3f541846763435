use flow_breakdowns::{Breakdown, BreakdownStore};
use flow_core::{BreakdownId, Entity, Owned, StoreResult, UserId};

use super::document_store::InMemoryDocumentStore;

#[derive(Debug, Default)]
pub struct InMemoryBreakdownStore {
    docs: InMemoryDocumentStore<BreakdownId, Breakdown>,
}

impl InMemoryBreakdownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BreakdownStore for InMemoryBreakdownStore {
    fn get(&self, id: BreakdownId) -> StoreResult<Option<Breakdown>> {
        self.docs.get(&id)
    }

    fn list_by_owner(&self, owner: UserId) -> StoreResult<Vec<Breakdown>> {
        let mut items = self.docs.filter(|b| b.owner() == owner)?;
        items.sort_by_key(|b| (b.created_at(), *b.id().as_uuid()));
        Ok(items)
    }

    fn insert(&self, breakdown: Breakdown) -> StoreResult<()> {
        self.docs.with_write(|map| {
            map.insert(*breakdown.id(), breakdown);
            Ok(())
        })
    }

    fn update(&self, breakdown: Breakdown) -> StoreResult<bool> {
        self.docs.with_write(|map| match map.get_mut(breakdown.id()) {
            Some(slot) => {
                *slot = breakdown;
                Ok(true)
            }
            None => Ok(false),
        })
    }

    fn delete(&self, id: BreakdownId) -> StoreResult<bool> {
        self.docs.remove(&id)
    }
}
