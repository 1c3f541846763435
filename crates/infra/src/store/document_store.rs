use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use flow_core::{StoreError, StoreResult};

/// In-memory keyed document collection for tests/dev.
///
/// A poisoned lock surfaces as `StoreError::Unavailable` rather than a panic.
#[derive(Debug)]
pub struct InMemoryDocumentStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryDocumentStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryDocumentStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryDocumentStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn get(&self, key: &K) -> StoreResult<Option<V>> {
        Ok(self.read()?.get(key).cloned())
    }

    /// First document matching `pred` (unordered).
    pub fn find(&self, pred: impl Fn(&V) -> bool) -> StoreResult<Option<V>> {
        Ok(self.read()?.values().find(|v| pred(v)).cloned())
    }

    /// All documents matching `pred` (unordered).
    pub fn filter(&self, pred: impl Fn(&V) -> bool) -> StoreResult<Vec<V>> {
        Ok(self.read()?.values().filter(|v| pred(v)).cloned().collect())
    }

    /// Run `f` with exclusive access, for check-then-write sequences that must
    /// be atomic.
    pub fn with_write<T>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> StoreResult<T>) -> StoreResult<T> {
        let mut map = self.write()?;
        f(&mut map)
    }

    pub fn remove(&self, key: &K) -> StoreResult<bool> {
        Ok(self.write()?.remove(key).is_some())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<K, V>>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<K, V>>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    tracing::error!("document store lock poisoned");
    StoreError::unavailable("document store lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_find_filter_remove() {
        let store: InMemoryDocumentStore<u32, &'static str> = InMemoryDocumentStore::new();
        store
            .with_write(|m| {
                m.insert(1, "one");
                m.insert(2, "two");
                m.insert(3, "three");
                Ok(())
            })
            .unwrap();

        assert_eq!(store.get(&2).unwrap(), Some("two"));
        assert_eq!(store.find(|v| v.starts_with("th")).unwrap(), Some("three"));
        assert_eq!(store.filter(|v| v.len() == 3).unwrap().len(), 2);
        assert!(store.remove(&1).unwrap());
        assert!(!store.remove(&1).unwrap());
        assert_eq!(store.filter(|_| true).unwrap().len(), 2);
    }

    #[test]
    fn with_write_error_is_propagated() {
        let store: InMemoryDocumentStore<u32, u32> = InMemoryDocumentStore::new();
        let res: StoreResult<()> = store.with_write(|_| Err(StoreError::Duplicate { field: "k" }));
        assert_eq!(res, Err(StoreError::Duplicate { field: "k" }));
        assert_eq!(store.get(&0).unwrap(), None);
        assert!(store.filter(|_| true).unwrap().is_empty());
    }
}
