mod common;

use common::fixtures::{Engine, StubGateway};
use reelvault::notifications::InboxKind;
use reelvault::profile::{MemoryStorage, StorageHub};
use std::sync::Arc;

#[tokio::test]
async fn test_inbox_is_newest_first() {
    let engine = Engine::in_memory();

    engine.notifications.add_item("X", "first", InboxKind::System);
    engine.notifications.add_item("Y", "second", InboxKind::System);
    engine.notifications.add_item("Z", "third", InboxKind::System);

    let titles: Vec<_> = engine
        .notifications
        .items()
        .into_iter()
        .map(|item| item.title)
        .collect();
    assert_eq!(titles, vec!["Z", "Y", "X"]);
}

#[tokio::test]
async fn test_read_state_never_reorders() {
    let engine = Engine::in_memory();

    engine.notifications.add_item("X", "first", InboxKind::System);
    let y = engine.notifications.add_item("Y", "second", InboxKind::System);
    engine.notifications.add_item("Z", "third", InboxKind::System);

    engine.notifications.mark_read(&y.id);

    let items = engine.notifications.items();
    assert_eq!(items[1].id, y.id);
    assert!(items[1].read);
    assert_eq!(engine.notifications.unread_count(), 2);

    engine.notifications.mark_all_read();
    assert_eq!(engine.notifications.unread_count(), 0);
}

#[tokio::test]
async fn test_add_item_for_other_targets_foreign_inbox() {
    let engine = Engine::in_memory();
    engine.notifications.select_namespace(Some("alice"));
    engine.notifications.add_item("A", "alice's own", InboxKind::System);

    engine
        .notifications
        .add_item_for_other("bob", "Support Update", "for bob");

    // Alice's view is unchanged
    let items = engine.notifications.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "A");

    // Selecting bob surfaces the pushed item
    engine.notifications.select_namespace(Some("bob"));
    let items = engine.notifications.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Support Update");
    assert_eq!(items[0].kind, InboxKind::System);
}

#[tokio::test]
async fn test_add_item_for_current_namespace_updates_immediately() {
    let engine = Engine::in_memory();
    engine.notifications.select_namespace(Some("alice"));

    engine
        .notifications
        .add_item_for_other("alice", "Support Update", "for alice");

    assert_eq!(engine.notifications.items().len(), 1);
    assert!(engine.notifications.current_toast().is_some());
}

#[tokio::test]
async fn test_cross_tab_inbox_convergence() {
    let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
    let tab_a = Engine::over_hub(hub.clone(), Arc::new(StubGateway::for_user("u1")));
    let tab_b = Engine::over_hub(hub, Arc::new(StubGateway::for_user("u1")));

    let mut watcher = tab_a.notifications.watcher();

    tab_b.notifications.add_item("From B", "hello", InboxKind::System);

    assert!(tab_a.notifications.items().is_empty());
    tab_a.notifications.pump_storage_events(&mut watcher);

    let items = tab_a.notifications.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "From B");
}

#[tokio::test]
async fn test_cross_tab_reload_ignores_unrelated_keys() {
    let hub = StorageHub::new(Arc::new(MemoryStorage::new()));
    let tab_a = Engine::over_hub(hub.clone(), Arc::new(StubGateway::for_user("u1")));
    let tab_b = Engine::over_hub(hub, Arc::new(StubGateway::for_user("u1")));

    tab_a.notifications.add_item("Mine", "local", InboxKind::System);
    let mut watcher = tab_a.notifications.watcher();

    // A foreign namespace write must not disturb tab A's view
    tab_b
        .notifications
        .add_item_for_other("bob", "Support Update", "for bob");
    tab_a.notifications.pump_storage_events(&mut watcher);

    let items = tab_a.notifications.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Mine");
}

#[tokio::test]
async fn test_clear_empties_inbox_durably() {
    let engine = Engine::in_memory();
    engine.notifications.add_item("X", "first", InboxKind::System);
    engine.notifications.add_item("Y", "second", InboxKind::System);

    engine.notifications.clear();
    assert!(engine.notifications.items().is_empty());

    // Reselecting the namespace reloads from storage
    engine.notifications.select_namespace(None);
    assert!(engine.notifications.items().is_empty());
}
