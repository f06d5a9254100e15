//! Notification center: ephemeral toasts, the durable per-identity inbox,
//! and cross-tab convergence.

use super::models::{InboxItem, InboxKind, Toast, ToastAction, ToastSeverity};
use crate::profile::{keys, StorageHandle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long an action-less toast stays up before self-dismissing.
pub const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(5);

struct InboxState {
    namespace: Option<String>,
    items: Vec<InboxItem>,
}

impl InboxState {
    fn slot_key(&self) -> String {
        keys::inbox_slot(self.namespace.as_deref())
    }
}

struct ToastSlot {
    current: Option<Toast>,
    seq: u64,
}

pub struct NotificationCenter {
    storage: StorageHandle,
    inbox: Mutex<InboxState>,
    toast: Mutex<ToastSlot>,
}

impl NotificationCenter {
    /// Creates a center pointed at the guest inbox.
    pub fn new(storage: StorageHandle) -> Arc<Self> {
        let center = Arc::new(Self {
            storage,
            inbox: Mutex::new(InboxState {
                namespace: None,
                items: Vec::new(),
            }),
            toast: Mutex::new(ToastSlot {
                current: None,
                seq: 0,
            }),
        });
        center.reload();
        center
    }

    // ── Toasts ──

    /// Replaces the currently displayed toast. A toast without an action
    /// self-dismisses after [`TOAST_AUTO_DISMISS`] unless a newer toast has
    /// taken its place by then; a toast with an action stays until
    /// [`dismiss`](Self::dismiss) or [`invoke_action`](Self::invoke_action).
    pub fn show(
        self: &Arc<Self>,
        message: impl Into<String>,
        severity: ToastSeverity,
        action: Option<ToastAction>,
    ) {
        let has_action = action.is_some();
        let seq = {
            let mut slot = self.toast.lock().unwrap();
            slot.seq += 1;
            slot.current = Some(Toast {
                message: message.into(),
                severity,
                action,
            });
            slot.seq
        };

        if !has_action {
            // Outside a runtime the host is expected to dismiss manually.
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let center = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(TOAST_AUTO_DISMISS).await;
                    center.dismiss_if_current(seq);
                });
            }
        }
    }

    /// The toast currently on display, if any.
    pub fn current_toast(&self) -> Option<Toast> {
        self.toast.lock().unwrap().current.clone()
    }

    pub fn dismiss(&self) {
        self.toast.lock().unwrap().current = None;
    }

    /// Runs the displayed toast's action, dismissing it first. No-op when
    /// the toast has no action. Returns the invoked action's label.
    pub fn invoke_action(&self) -> Option<String> {
        let action = {
            let mut slot = self.toast.lock().unwrap();
            let action = slot
                .current
                .as_ref()
                .and_then(|toast| toast.action.clone())?;
            slot.current = None;
            action
        };
        (action.callback)();
        Some(action.label)
    }

    fn dismiss_if_current(&self, seq: u64) {
        let mut slot = self.toast.lock().unwrap();
        // A newer toast owns the slot now; its own timer handles it.
        if slot.seq == seq {
            slot.current = None;
        }
    }

    // ── Inbox ──

    /// Points the inbox at another namespace and reloads from storage.
    pub fn select_namespace(&self, namespace: Option<&str>) {
        {
            let mut inbox = self.inbox.lock().unwrap();
            inbox.namespace = namespace.map(|s| s.to_string());
        }
        self.reload();
    }

    /// Clears the in-memory view and forgets the namespace. Durable storage
    /// is left untouched; used on sign-out.
    pub fn reset(&self) {
        let mut inbox = self.inbox.lock().unwrap();
        inbox.namespace = None;
        inbox.items.clear();
    }

    /// Inserts an item at the head of the current inbox and echoes it as a
    /// toast.
    pub fn add_item(
        self: &Arc<Self>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: InboxKind,
    ) -> InboxItem {
        let item = InboxItem::new(title.into(), message.into(), kind);
        {
            let mut inbox = self.inbox.lock().unwrap();
            inbox.items.insert(0, item.clone());
            self.persist(&inbox);
        }
        self.show(item.message.clone(), ToastSeverity::Info, None);
        item
    }

    /// Writes a system item directly into another identity's durable inbox
    /// slot, whether or not that identity is the current tab's session
    /// owner. When the target happens to be the current namespace the
    /// in-memory view and a toast update immediately; otherwise the write
    /// stays invisible to this tab until that namespace is selected or a
    /// cross-tab change is observed.
    pub fn add_item_for_other(
        self: &Arc<Self>,
        namespace: &str,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        let is_current = {
            let inbox = self.inbox.lock().unwrap();
            inbox.namespace.as_deref() == Some(namespace)
        };

        if is_current {
            self.add_item(title, message, InboxKind::System);
            return;
        }

        let slot = keys::inbox_slot(Some(namespace));
        let mut items = self.load_slot(&slot);
        items.insert(0, InboxItem::new(title.into(), message.into(), InboxKind::System));
        self.write_slot(&slot, &items);
    }

    /// Marks one item read. Read state only ever flips false to true.
    pub fn mark_read(&self, id: &str) {
        let mut inbox = self.inbox.lock().unwrap();
        if let Some(item) = inbox.items.iter_mut().find(|item| item.id == id) {
            if !item.read {
                item.read = true;
                self.persist(&inbox);
            }
        }
    }

    pub fn mark_all_read(&self) {
        let mut inbox = self.inbox.lock().unwrap();
        let mut changed = false;
        for item in inbox.items.iter_mut() {
            if !item.read {
                item.read = true;
                changed = true;
            }
        }
        if changed {
            self.persist(&inbox);
        }
    }

    pub fn delete(&self, id: &str) {
        let mut inbox = self.inbox.lock().unwrap();
        let before = inbox.items.len();
        inbox.items.retain(|item| item.id != id);
        if inbox.items.len() != before {
            self.persist(&inbox);
        }
    }

    /// Destroys every item in the current inbox, durable slot included.
    pub fn clear(&self) {
        let mut inbox = self.inbox.lock().unwrap();
        inbox.items.clear();
        let slot = inbox.slot_key();
        if let Err(err) = self.storage.remove(&slot) {
            warn!("Failed to clear inbox slot {}: {}", slot, err);
        }
    }

    /// Current inbox items, newest first.
    pub fn items(&self) -> Vec<InboxItem> {
        self.inbox.lock().unwrap().items.clone()
    }

    /// Derived unread count; recomputed, never stored.
    pub fn unread_count(&self) -> usize {
        self.inbox
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|item| !item.read)
            .count()
    }

    // ── Cross-tab convergence ──

    /// Reacts to a storage mutation observed from another tab. If the key is
    /// the currently selected inbox slot the in-memory view is replaced
    /// wholesale from storage — last writer wins at reload granularity, no
    /// merge is attempted.
    pub fn handle_storage_change(&self, key: &str) {
        let matches = {
            let inbox = self.inbox.lock().unwrap();
            inbox.slot_key() == key
        };
        if matches {
            debug!("Inbox slot {} changed in another tab, reloading", key);
            self.reload();
        }
    }

    /// A watcher over this center's storage handle; feed it back through
    /// [`pump_storage_events`](Self::pump_storage_events). The center's own
    /// writes are filtered out.
    pub fn watcher(&self) -> crate::profile::StorageWatcher {
        self.storage.watch()
    }

    /// Drains pending foreign changes from a watcher and applies the
    /// relevant ones. Synchronous; for event-loop hosts and tests.
    pub fn pump_storage_events(&self, watcher: &mut crate::profile::StorageWatcher) {
        while let Some(change) = watcher.try_next() {
            self.handle_storage_change(&change.key);
        }
    }

    /// Spawns a background task that applies foreign changes as they arrive.
    pub fn spawn_storage_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let center = self.clone();
        let mut watcher = self.storage.watch();
        tokio::spawn(async move {
            while let Some(change) = watcher.next().await {
                center.handle_storage_change(&change.key);
            }
        })
    }

    // ── Persistence ──

    fn reload(&self) {
        let mut inbox = self.inbox.lock().unwrap();
        let slot = inbox.slot_key();
        inbox.items = self.load_slot(&slot);
    }

    fn load_slot(&self, slot: &str) -> Vec<InboxItem> {
        match self.storage.get(slot) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    warn!("Malformed inbox slot {}, treating as empty: {}", slot, err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Failed to read inbox slot {}: {}", slot, err);
                Vec::new()
            }
        }
    }

    fn write_slot(&self, slot: &str, items: &[InboxItem]) {
        match serde_json::to_string(items) {
            Ok(raw) => {
                if let Err(err) = self.storage.set(slot, &raw) {
                    warn!("Failed to persist inbox slot {}: {}", slot, err);
                }
            }
            Err(err) => warn!("Failed to serialize inbox slot {}: {}", slot, err),
        }
    }

    fn persist(&self, inbox: &InboxState) {
        self.write_slot(&inbox.slot_key(), &inbox.items);
    }
}
