//! Notification data models: durable inbox items and ephemeral toasts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// What produced an inbox item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboxKind {
    Purchase,
    Favorite,
    System,
}

/// A durable per-identity inbox entry.
///
/// `read` flips false to true and never back; ordering is newest-first and
/// read-state changes never re-order items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxItem {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub kind: InboxKind,
}

impl InboxItem {
    pub fn new(title: String, message: String, kind: InboxKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            message,
            timestamp: Utc::now(),
            read: false,
            kind,
        }
    }
}

/// Severity of an ephemeral toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    Info,
    Success,
    Error,
}

/// An action attached to a toast. The callback belongs to the presentation
/// collaborator; invoking it through the center also dismisses the toast.
#[derive(Clone)]
pub struct ToastAction {
    pub label: String,
    pub callback: Arc<dyn Fn() + Send + Sync>,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            callback: Arc::new(callback),
        }
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// The currently displayed toast, if any.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: ToastSeverity,
    pub action: Option<ToastAction>,
}
