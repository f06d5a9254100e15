//! Purchases collection.

use super::models::{CachedField, MediaKind, PurchaseRecord};
use super::store::ScopedStore;
use crate::profile::{keys, StorageHandle};

/// Default purchase price when the caller does not supply one.
pub const DEFAULT_PRICE: f64 = 4.99;

pub struct PurchasesStore {
    inner: ScopedStore<PurchaseRecord>,
}

impl PurchasesStore {
    pub fn new(storage: StorageHandle) -> Self {
        Self {
            inner: ScopedStore::new(storage, keys::PURCHASES_BASE),
        }
    }

    pub fn select_namespace(&self, namespace: Option<&str>) {
        self.inner.select_namespace(namespace);
    }

    /// Records a purchase. A subject can only be purchased once; a repeat
    /// purchase returns false and leaves the original untouched.
    pub fn add(&self, record: PurchaseRecord) -> bool {
        self.inner.add(record)
    }

    pub fn remove(&self, subject_id: u64) {
        self.inner.remove(subject_id);
    }

    pub fn contains(&self, subject_id: u64) -> bool {
        self.inner.contains(subject_id)
    }

    pub fn list(&self) -> Vec<PurchaseRecord> {
        self.inner.list()
    }

    pub fn get(&self, subject_id: u64) -> Option<PurchaseRecord> {
        self.inner.get(subject_id)
    }

    /// Purchases missing a poster path, in store order. These are the
    /// candidates for the catalog back-fill.
    pub fn missing_posters(&self) -> Vec<PurchaseRecord> {
        self.inner
            .list()
            .into_iter()
            .filter(|record| record.poster_path.is_none())
            .collect()
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

impl PurchaseRecord {
    /// A purchase at the standard price.
    pub fn at_default_price(
        subject_id: u64,
        title: String,
        poster_path: Option<String>,
        media_kind: MediaKind,
    ) -> Self {
        Self::new(subject_id, title, poster_path, DEFAULT_PRICE, media_kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{MemoryStorage, StorageHub};
    use std::sync::Arc;

    fn new_store() -> PurchasesStore {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        PurchasesStore::new(hub.handle())
    }

    #[test]
    fn test_default_price() {
        let record =
            PurchaseRecord::at_default_price(1, "Dune".to_string(), None, MediaKind::Movie);
        assert_eq!(record.price, 4.99);
    }

    #[test]
    fn test_subject_purchased_once() {
        let store = new_store();
        assert!(store.add(PurchaseRecord::at_default_price(
            1,
            "Dune".to_string(),
            None,
            MediaKind::Movie
        )));
        assert!(!store.add(PurchaseRecord::new(
            1,
            "Dune".to_string(),
            None,
            9.99,
            MediaKind::Movie
        )));
        assert_eq!(store.get(1).unwrap().price, 4.99);
    }

    #[test]
    fn test_missing_posters() {
        let store = new_store();
        store.add(PurchaseRecord::at_default_price(
            1,
            "Dune".to_string(),
            Some("/dune.jpg".to_string()),
            MediaKind::Movie,
        ));
        store.add(PurchaseRecord::at_default_price(
            2,
            "Severance".to_string(),
            None,
            MediaKind::Series,
        ));

        let missing = store.missing_posters();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].subject_id, 2);
    }
}
