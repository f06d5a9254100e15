//! Durable profile storage: the flat key-value space shared by every store,
//! plus cross-tab change notification.

pub mod keys;
mod memory;
mod sqlite;
mod storage;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use storage::{ProfileStorage, StorageChange, StorageHandle, StorageHub, StorageWatcher};
