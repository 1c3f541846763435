use flow_auth::{Account, AccountStore};
use flow_core::{StoreError, StoreResult, UserId};

use super::document_store::InMemoryDocumentStore;

/// In-memory credential record store.
///
/// Username and email uniqueness is enforced under the write lock, so two
/// concurrent registrations for the same handle cannot both be stored.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    docs: InMemoryDocumentStore<UserId, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn find_by_id(&self, id: UserId) -> StoreResult<Option<Account>> {
        self.docs.get(&id)
    }

    fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        self.docs.find(|a| a.username == username)
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.docs.find(|a| a.email == email)
    }

    fn insert(&self, account: Account) -> StoreResult<()> {
        self.docs.with_write(|map| {
            if map.values().any(|a| a.email == account.email) {
                return Err(StoreError::Duplicate { field: "email" });
            }
            if map.values().any(|a| a.username == account.username) {
                return Err(StoreError::Duplicate { field: "username" });
            }
            map.insert(account.id, account);
            Ok(())
        })
    }
}
