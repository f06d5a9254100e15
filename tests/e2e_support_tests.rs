mod common;

use common::fixtures::{Engine, SUPPORT_ID};
use reelvault::support::TicketStatus;

#[tokio::test]
async fn test_ticket_lifecycle_notifies_author() {
    let engine = Engine::in_memory();

    let ticket = engine.desk.submit(
        "u1",
        "u1@example.com",
        "User One",
        7,
        "Blade Runner",
        "playback",
        "stops at the intro",
    );
    assert_eq!(ticket.status, TicketStatus::Pending);

    assert!(engine
        .desk
        .advance_status(&ticket.id, TicketStatus::InProgress, Some("looking into it")));
    assert_eq!(
        engine.desk.ticket(&ticket.id).unwrap().status,
        TicketStatus::InProgress
    );

    assert!(engine.desk.resolve(&ticket.id, "fixed"));
    let resolved = engine.desk.ticket(&ticket.id).unwrap();
    assert_eq!(resolved.status, TicketStatus::Resolved);
    assert_eq!(resolved.resolution_note.as_deref(), Some("fixed"));

    // Two system items landed in the author's inbox, newest first
    engine.notifications.select_namespace(Some("u1"));
    let items = engine.notifications.items();
    assert_eq!(items.len(), 2);
    assert!(items[0].message.starts_with("Official response for Blade Runner:"));
    assert!(items[1].message.contains("looking into it"));
}

#[tokio::test]
async fn test_resolved_rejects_further_transitions() {
    let engine = Engine::in_memory();
    let ticket = engine
        .desk
        .submit("u1", "e", "n", 7, "Blade Runner", "r", "d");

    // pending -> resolved directly is allowed
    assert!(engine.desk.resolve(&ticket.id, "done"));

    // resolved is terminal
    assert!(!engine
        .desk
        .advance_status(&ticket.id, TicketStatus::InProgress, None));
    assert_eq!(
        engine.desk.ticket(&ticket.id).unwrap().status,
        TicketStatus::Resolved
    );
}

#[tokio::test]
async fn test_support_chat_relays_to_author() {
    let engine = Engine::in_memory();
    let ticket = engine
        .desk
        .submit("u1", "e", "n", 7, "Blade Runner", "r", "d");

    engine
        .desk
        .send_message(&ticket.id, "u1", SUPPORT_ID, "any update?")
        .unwrap();
    engine
        .desk
        .send_message(&ticket.id, SUPPORT_ID, "u1", "working on it")
        .unwrap();

    let thread = engine.desk.messages_for(&ticket.id);
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].body, "any update?");
    assert_eq!(thread[1].body, "working on it");

    // Only the support-sent message produced a notification
    engine.notifications.select_namespace(Some("u1"));
    let items = engine.notifications.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "New Message from Support");
    assert_eq!(items[0].message, "Regarding your ticket for Blade Runner");
}

#[tokio::test]
async fn test_tickets_are_shared_across_identities() {
    let engine = Engine::in_memory();

    engine.desk.submit("u1", "e1", "n1", 1, "Dune", "r", "d");
    engine.desk.submit("u2", "e2", "n2", 2, "Heat", "r", "d");

    // The desk is unscoped: switching session identity changes nothing
    engine.session.sign_in("u1@example.com", "pw").await.unwrap();
    assert_eq!(engine.desk.tickets().len(), 2);
}
