//! Generic namespaced persistent collection.
//!
//! A `ScopedStore` keeps an ordered in-memory view of the records belonging
//! to the currently selected namespace, backed by one durable slot per
//! namespace. At most one record per subject. Every mutation serializes the
//! whole record set to the slot before returning; a missing slot is an empty
//! collection and a malformed one degrades to empty with a warning, never an
//! error to the caller.

use super::models::{CachedField, ScopedRecord};
use crate::profile::{keys, StorageHandle};
use std::sync::Mutex;
use tracing::warn;

struct ScopeState<R> {
    namespace: Option<String>,
    records: Vec<R>,
}

pub struct ScopedStore<R: ScopedRecord> {
    storage: StorageHandle,
    base_key: &'static str,
    state: Mutex<ScopeState<R>>,
}

impl<R: ScopedRecord> ScopedStore<R> {
    /// Creates a store pointed at the guest namespace and loads it.
    pub fn new(storage: StorageHandle, base_key: &'static str) -> Self {
        let store = Self {
            storage,
            base_key,
            state: Mutex::new(ScopeState {
                namespace: None,
                records: Vec::new(),
            }),
        };
        store.reload();
        store
    }

    /// Switches which namespace's records are loaded into memory.
    pub fn select_namespace(&self, namespace: Option<&str>) {
        {
            let mut state = self.state.lock().unwrap();
            state.namespace = namespace.map(|s| s.to_string());
        }
        self.reload();
    }

    /// Appends a record unless its subject is already present. Returns false
    /// and performs no mutation on a duplicate.
    pub fn add(&self, record: R) -> bool {
        let mut state = self.state.lock().unwrap();
        if state
            .records
            .iter()
            .any(|existing| existing.subject_id() == record.subject_id())
        {
            return false;
        }
        state.records.push(record);
        self.persist(&state);
        true
    }

    /// Removes the record for `subject_id`. Removing an absent subject is a
    /// silent no-op.
    pub fn remove(&self, subject_id: u64) {
        let mut state = self.state.lock().unwrap();
        let before = state.records.len();
        state.records.retain(|record| record.subject_id() != subject_id);
        if state.records.len() != before {
            self.persist(&state);
        }
    }

    pub fn contains(&self, subject_id: u64) -> bool {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .any(|record| record.subject_id() == subject_id)
    }

    /// Current records in insertion order.
    pub fn list(&self) -> Vec<R> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn get(&self, subject_id: u64) -> Option<R> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|record| record.subject_id() == subject_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Patches a late-arriving cached field (poster path, rating). No-op if
    /// the subject is absent; persists otherwise.
    pub fn update_cached_field(&self, subject_id: u64, field: &CachedField) {
        let mut state = self.state.lock().unwrap();
        let changed = state
            .records
            .iter_mut()
            .find(|record| record.subject_id() == subject_id)
            .map(|record| record.apply_cached(field))
            .unwrap_or(false);
        if changed {
            self.persist(&state);
        }
    }

    /// Clears the in-memory view and forgets the namespace pointer. Durable
    /// storage is untouched; used on sign-out.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.namespace = None;
        state.records.clear();
    }

    /// Destructive: erases the namespace's durable slot and the in-memory
    /// view.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.records.clear();
        let slot = keys::scoped_slot(self.base_key, state.namespace.as_deref());
        if let Err(err) = self.storage.remove(&slot) {
            warn!("Failed to clear slot {}: {}", slot, err);
        }
    }

    fn reload(&self) {
        let mut state = self.state.lock().unwrap();
        let slot = keys::scoped_slot(self.base_key, state.namespace.as_deref());
        state.records = match self.storage.get(&slot) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(records) => records,
                Err(err) => {
                    warn!("Malformed slot {}, treating as empty: {}", slot, err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Failed to read slot {}: {}", slot, err);
                Vec::new()
            }
        };
    }

    fn persist(&self, state: &ScopeState<R>) {
        let slot = keys::scoped_slot(self.base_key, state.namespace.as_deref());
        match serde_json::to_string(&state.records) {
            Ok(raw) => {
                if let Err(err) = self.storage.set(&slot, &raw) {
                    warn!("Failed to persist slot {}: {}", slot, err);
                }
            }
            Err(err) => warn!("Failed to serialize slot {}: {}", slot, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::models::FavoriteRecord;
    use crate::profile::{MemoryStorage, StorageHub};
    use std::sync::Arc;

    fn new_store() -> ScopedStore<FavoriteRecord> {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        ScopedStore::new(hub.handle(), keys::FAVORITES_BASE)
    }

    fn record(subject_id: u64, title: &str) -> FavoriteRecord {
        FavoriteRecord::new(subject_id, title.to_string(), None)
    }

    #[test]
    fn test_contains_reflects_net_effect_of_add_remove() {
        let store = new_store();

        assert!(store.add(record(42, "Dune")));
        assert!(store.contains(42));

        store.remove(42);
        assert!(!store.contains(42));

        // Add after remove re-adds
        assert!(store.add(record(42, "Dune")));
        assert!(store.contains(42));
    }

    #[test]
    fn test_duplicate_add_is_a_no_op() {
        let store = new_store();
        assert!(store.add(record(42, "Dune")));
        let original_added_at = store.get(42).unwrap().added_at;

        assert!(!store.add(record(42, "Dune again")));
        assert_eq!(store.len(), 1);

        // The existing record is untouched
        let kept = store.get(42).unwrap();
        assert_eq!(kept.title, "Dune");
        assert_eq!(kept.added_at, original_added_at);
    }

    #[test]
    fn test_remove_absent_is_silent() {
        let store = new_store();
        store.remove(999);
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = new_store();
        store.add(record(1, "A"));
        store.add(record(2, "B"));
        store.add(record(3, "C"));

        let titles: Vec<_> = store.list().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_namespace_round_trip_reproduces_state() {
        let store = new_store();

        store.select_namespace(Some("alice"));
        store.add(record(1, "Dune"));
        store.add(record(2, "Arrival"));
        store.remove(1);

        store.select_namespace(Some("bob"));
        assert!(store.is_empty());
        store.add(record(3, "Heat"));

        store.select_namespace(Some("alice"));
        let titles: Vec<_> = store.list().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Arrival"]);

        store.select_namespace(Some("bob"));
        assert!(store.contains(3));
    }

    #[test]
    fn test_malformed_slot_degrades_to_empty() {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        let handle = hub.handle();
        handle.set("favorites", "{definitely not an array").unwrap();

        let store: ScopedStore<FavoriteRecord> =
            ScopedStore::new(handle, keys::FAVORITES_BASE);
        assert!(store.is_empty());

        // The store is usable and the next mutation repairs the slot
        assert!(store.add(record(1, "Dune")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_wrong_shape_slot_degrades_to_empty() {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        let handle = hub.handle();
        // Valid JSON, wrong shape
        handle.set("favorites", r#"[{"foo": 1}]"#).unwrap();

        let store: ScopedStore<FavoriteRecord> =
            ScopedStore::new(handle, keys::FAVORITES_BASE);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_cached_field() {
        let store = new_store();
        store.add(record(42, "Dune"));

        store.update_cached_field(42, &CachedField::PosterPath("/dune.jpg".to_string()));
        assert_eq!(store.get(42).unwrap().poster_path.as_deref(), Some("/dune.jpg"));

        // Absent subject is a no-op
        store.update_cached_field(999, &CachedField::Rating(9.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reset_keeps_durable_storage() {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        let handle = hub.handle();
        let store: ScopedStore<FavoriteRecord> =
            ScopedStore::new(handle, keys::FAVORITES_BASE);

        store.select_namespace(Some("alice"));
        store.add(record(1, "Dune"));
        store.reset();
        assert!(store.is_empty());

        store.select_namespace(Some("alice"));
        assert!(store.contains(1));
    }

    #[test]
    fn test_clear_erases_durable_storage() {
        let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
        let store: ScopedStore<FavoriteRecord> =
            ScopedStore::new(hub.handle(), keys::FAVORITES_BASE);

        store.select_namespace(Some("alice"));
        store.add(record(1, "Dune"));
        store.clear();
        assert!(store.is_empty());

        store.select_namespace(Some("alice"));
        assert!(store.is_empty());
    }
}
