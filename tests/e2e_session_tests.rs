mod common;

use common::fixtures::Engine;
use reelvault::collections::FavoriteRecord;
use tempfile::TempDir;

#[tokio::test]
async fn test_session_restores_across_restart() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("profile.db");

    {
        let engine = Engine::on_file(&db);
        let profile = engine.session.sign_in("u1@example.com", "pw").await.unwrap();
        assert_eq!(profile.id, "u1");
        engine
            .favorites
            .add(FavoriteRecord::new(42, "Dune".to_string(), None));
    }

    // A new engine over the same profile restores the session and lands on
    // the identity's namespaces without a new sign-in
    let engine = Engine::on_file(&db);
    assert_eq!(engine.session.current_user().unwrap().id, "u1");
    assert!(engine.favorites.contains(42));
}

#[tokio::test]
async fn test_sign_out_is_non_destructive() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("profile.db");

    let engine = Engine::on_file(&db);
    engine.session.sign_in("u1@example.com", "pw").await.unwrap();
    engine
        .favorites
        .add(FavoriteRecord::new(42, "Dune".to_string(), None));

    engine.session.sign_out().await;

    assert!(engine.session.current_user().is_none());
    assert!(engine.favorites.list().is_empty());

    // The identity's data is still durable
    engine.session.sign_in("u1@example.com", "pw").await.unwrap();
    assert!(engine.favorites.contains(42));
}

#[tokio::test]
async fn test_delete_account_tears_down_session() {
    let engine = Engine::in_memory();
    engine.session.sign_in("u1@example.com", "pw").await.unwrap();

    engine.session.delete_account().await.unwrap();

    assert!(engine.session.current_user().is_none());
    assert!(engine
        .hub
        .handle()
        .get("current_user")
        .unwrap()
        .is_none());
    assert!(engine.hub.handle().get("access_token").unwrap().is_none());
}

#[tokio::test]
async fn test_bad_credentials_leave_guest_state_alone() {
    let engine = Engine::in_memory();
    engine
        .favorites
        .add(FavoriteRecord::new(42, "Dune".to_string(), None));

    assert!(engine.session.sign_in("nobody@example.com", "pw").await.is_err());

    assert!(engine.session.current_user().is_none());
    assert!(engine.favorites.contains(42));
}
