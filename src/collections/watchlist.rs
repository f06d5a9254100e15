//! Watchlist collection.
//!
//! The durable base key is "wishlist" for compatibility with profiles
//! written under the feature's earlier name.

use super::models::{CachedField, WatchlistRecord};
use super::store::ScopedStore;
use crate::profile::{keys, StorageHandle};

pub struct WatchlistStore {
    inner: ScopedStore<WatchlistRecord>,
}

impl WatchlistStore {
    pub fn new(storage: StorageHandle) -> Self {
        Self {
            inner: ScopedStore::new(storage, keys::WATCHLIST_BASE),
        }
    }

    pub fn select_namespace(&self, namespace: Option<&str>) {
        self.inner.select_namespace(namespace);
    }

    pub fn add(&self, record: WatchlistRecord) -> bool {
        self.inner.add(record)
    }

    pub fn remove(&self, subject_id: u64) {
        self.inner.remove(subject_id);
    }

    pub fn contains(&self, subject_id: u64) -> bool {
        self.inner.contains(subject_id)
    }

    pub fn list(&self) -> Vec<WatchlistRecord> {
        self.inner.list()
    }

    pub fn get(&self, subject_id: u64) -> Option<WatchlistRecord> {
        self.inner.get(subject_id)
    }

    pub fn update_cached_field(&self, subject_id: u64, field: &CachedField) {
        self.inner.update_cached_field(subject_id, field);
    }

    pub fn reset(&self) {
        self.inner.reset();
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{MemoryStorage, StorageHub};
    use std::sync::Arc;

    #[test]
    fn test_persists_under_wishlist_key() {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        let handle = hub.handle();
        let store = WatchlistStore::new(hub.handle());

        store.select_namespace(Some("alice"));
        store.add(WatchlistRecord::new(1, "Dune".to_string(), None));

        assert!(handle.get("wishlist_alice").unwrap().is_some());
    }

    #[test]
    fn test_add_and_remove() {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        let store = WatchlistStore::new(hub.handle());

        assert!(store.add(WatchlistRecord::new(1, "Dune".to_string(), None)));
        assert!(!store.add(WatchlistRecord::new(1, "Dune".to_string(), None)));
        assert!(store.contains(1));

        store.remove(1);
        assert!(!store.contains(1));
    }
}
