//! Durable profile storage and cross-tab change notification.
//!
//! The profile is a flat string-key/string-value space, the desktop
//! rendition of a browser profile's local storage. A [`StorageHub`] wraps a
//! backend and fans out key-level change notifications; each "tab" holds its
//! own [`StorageHandle`] and observes only the writes made through *other*
//! handles, mirroring the platform rule that storage events never fire in
//! the tab that performed the write.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the change channel. A lagging watcher drops old changes and
/// keeps going; the inbox reload is wholesale anyway.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Flat key-value storage backend.
pub trait ProfileStorage: Send + Sync {
    /// Returns the value stored at `key`, or `Ok(None)` if the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the slot at `key`. Removing an absent slot is a no-op.
    fn remove(&self, key: &str) -> Result<()>;

    /// Returns all populated slot keys, unordered.
    fn keys(&self) -> Result<Vec<String>>;
}

/// A key-level mutation observed on the shared profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Tab id of the handle that performed the write.
    pub tab_id: u64,
    /// The mutated slot key.
    pub key: String,
}

/// Shared profile storage plus its change-notification channel.
pub struct StorageHub {
    backend: Arc<dyn ProfileStorage>,
    changes: broadcast::Sender<StorageChange>,
    next_tab_id: AtomicU64,
}

impl StorageHub {
    pub fn new(backend: Arc<dyn ProfileStorage>) -> Arc<Self> {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Arc::new(Self {
            backend,
            changes,
            next_tab_id: AtomicU64::new(1),
        })
    }

    /// Mints a handle with a fresh tab id. One handle per tab.
    pub fn handle(self: &Arc<Self>) -> StorageHandle {
        StorageHandle {
            hub: self.clone(),
            tab_id: self.next_tab_id.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// A single tab's view onto the shared profile storage.
///
/// Cloning a handle keeps the same tab id; use [`StorageHub::handle`] to
/// model a second tab.
#[derive(Clone)]
pub struct StorageHandle {
    hub: Arc<StorageHub>,
    tab_id: u64,
}

impl StorageHandle {
    pub fn tab_id(&self) -> u64 {
        self.tab_id
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.hub.backend.get(key)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.hub.backend.set(key, value)?;
        self.notify(key);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.hub.backend.remove(key)?;
        self.notify(key);
        Ok(())
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        self.hub.backend.keys()
    }

    /// Subscribes to changes made through other handles of the same hub.
    pub fn watch(&self) -> StorageWatcher {
        StorageWatcher {
            rx: self.hub.changes.subscribe(),
            tab_id: self.tab_id,
        }
    }

    fn notify(&self, key: &str) {
        // Send fails only when no watcher is subscribed, which is fine.
        let _ = self.hub.changes.send(StorageChange {
            tab_id: self.tab_id,
            key: key.to_string(),
        });
    }
}

/// Stream of storage changes originating from other tabs.
pub struct StorageWatcher {
    rx: broadcast::Receiver<StorageChange>,
    tab_id: u64,
}

impl StorageWatcher {
    /// Non-blocking poll. Returns the next foreign change, or `None` when
    /// the queue is drained. Lagged gaps are skipped silently.
    pub fn try_next(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.try_recv() {
                Ok(change) if change.tab_id == self.tab_id => continue,
                Ok(change) => return Some(change),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Awaits the next foreign change. Returns `None` once the hub is gone.
    pub async fn next(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) if change.tab_id == self.tab_id => continue,
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
