//! Storage slot key derivation.
//!
//! Every durable slot key in the profile is derived here. Stores receive
//! their keys through these functions and never rebuild them from ambient
//! session state.

/// Slot base for the favorites collection.
pub const FAVORITES_BASE: &str = "favorites";

/// Slot base for the watchlist collection. The stored key says "wishlist"
/// for compatibility with profiles written by earlier releases.
pub const WATCHLIST_BASE: &str = "wishlist";

/// Slot base for the purchases collection.
pub const PURCHASES_BASE: &str = "purchases";

/// Slot holding all support tickets. Intentionally unscoped: an operator
/// consumer must see every author's tickets at once.
pub const REPORTS_SLOT: &str = "reports_data";

/// Slot holding all chat messages. Unscoped for the same reason as tickets.
pub const CHAT_MESSAGES_SLOT: &str = "chat_messages";

/// Session restoration keys.
pub const CURRENT_USER_KEY: &str = "current_user";
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Derive the slot key for a scoped collection: the bare base for the guest
/// namespace, `<base>_<identity>` for a signed-in identity.
pub fn scoped_slot(base: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(id) => format!("{}_{}", base, id),
        None => base.to_string(),
    }
}

/// Derive the inbox slot key. The guest inbox predates per-identity inboxes
/// and keeps its legacy `user_inbox` key.
pub fn inbox_slot(namespace: Option<&str>) -> String {
    match namespace {
        Some(id) => format!("inbox_{}", id),
        None => "user_inbox".to_string(),
    }
}
