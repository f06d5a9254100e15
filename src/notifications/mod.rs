pub mod center;
pub mod models;

pub use center::{NotificationCenter, TOAST_AUTO_DISMISS};
pub use models::{InboxItem, InboxKind, Toast, ToastAction, ToastSeverity};
