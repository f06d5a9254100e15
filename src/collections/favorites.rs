//! Favorites collection.

use super::models::{CachedField, FavoriteRecord};
use super::store::ScopedStore;
use crate::notifications::{InboxKind, NotificationCenter};
use crate::profile::{keys, StorageHandle};
use std::sync::Arc;

/// The favorites store. A successful add also drops an inbox item into the
/// current identity's inbox; duplicate adds stay silent.
pub struct FavoritesStore {
    inner: ScopedStore<FavoriteRecord>,
    notifications: Arc<NotificationCenter>,
}

impl FavoritesStore {
    pub fn new(storage: StorageHandle, notifications: Arc<NotificationCenter>) -> Self {
        Self {
            inner: ScopedStore::new(storage, keys::FAVORITES_BASE),
            notifications,
        }
    }

    pub fn select_namespace(&self, namespace: Option<&str>) {
        self.inner.select_namespace(namespace);
    }

    /// Adds a favorite. Returns false without side effects when the subject
    /// is already favorited.
    pub fn add(&self, record: FavoriteRecord) -> bool {
        let title = record.title.clone();
        if !self.inner.add(record) {
            return false;
        }
        self.notifications.add_item(
            "Added to Favorites",
            format!("\"{}\" has been added to your favorites list.", title),
            InboxKind::Favorite,
        );
        true
    }

    pub fn remove(&self, subject_id: u64) {
        self.inner.remove(subject_id);
    }

    pub fn contains(&self, subject_id: u64) -> bool {
        self.inner.contains(subject_id)
    }

    pub fn list(&self) -> Vec<FavoriteRecord> {
        self.inner.list()
    }

    pub fn get(&self, subject_id: u64) -> Option<FavoriteRecord> {
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
