//! Sign-up / sign-in tests

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use biolink::auth::{
    LocalSessionProvider, SessionEvent, SessionProvider, StaticSecretAuthenticator, ViewRoute,
};
use biolink::blob::LocalBlobStore;
use biolink::errors::BiolinkError;
use biolink::services::{AccountService, ProfileLinkStore};
use biolink::storage::MemoryStorage;

fn accounts(blob_dir: &TempDir) -> (AccountService, Arc<LocalSessionProvider>, Arc<ProfileLinkStore>) {
    let profiles = Arc::new(ProfileLinkStore::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(StaticSecretAuthenticator::new("").unwrap()),
        Arc::new(LocalBlobStore::new(blob_dir.path(), "/uploads")),
    ));
    let sessions = Arc::new(LocalSessionProvider::new());
    let service = AccountService::new(sessions.clone(), profiles.clone());
    (service, sessions, profiles)
}

#[tokio::test]
async fn test_sign_up_creates_profile_and_routes_to_owner() {
    let dir = TempDir::new().unwrap();
    let (service, sessions, profiles) = accounts(&dir);
    let mut events = sessions.subscribe();

    assert_eq!(service.current_route().await, ViewRoute::Anonymous);

    let (session, profile) = service
        .sign_up("Alice@Example.com", "hunter2", "Alice")
        .await
        .unwrap();
    assert_eq!(session.email, "alice@example.com");
    assert_eq!(session.handle.as_deref(), Some("alice"));
    assert_eq!(profile.handle(), "alice");
    assert!(profiles.load("alice").await.is_ok());

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::SignedIn(session.clone())
    );
    assert_eq!(
        service.current_route().await,
        ViewRoute::Owner("alice".to_string())
    );
}

#[tokio::test]
async fn test_sign_up_rejects_taken_handle_without_creating_account() {
    let dir = TempDir::new().unwrap();
    let (service, _sessions, _profiles) = accounts(&dir);
    service.sign_up("a@example.com", "pw", "alice").await.unwrap();

    let taken = service.sign_up("b@example.com", "pw", "ALICE").await;
    assert!(matches!(taken, Err(BiolinkError::Conflict(_))));

    // 账号未被创建
    let sign_in = service.sign_in("b@example.com", "pw").await;
    assert!(matches!(sign_in, Err(BiolinkError::AuthDenied(_))));
}

#[tokio::test]
async fn test_sign_up_validates_handle() {
    let dir = TempDir::new().unwrap();
    let (service, _sessions, _profiles) = accounts(&dir);

    let result = service.sign_up("a@example.com", "pw", "no way!").await;
    assert!(matches!(result, Err(BiolinkError::Validation(_))));
}

#[tokio::test]
async fn test_sign_in_and_sign_out() {
    let dir = TempDir::new().unwrap();
    let (service, sessions, _profiles) = accounts(&dir);
    service.sign_up("a@example.com", "pw", "alice").await.unwrap();
    service.sign_out().await.unwrap();
    assert_eq!(service.current_route().await, ViewRoute::Anonymous);

    let wrong = service.sign_in("a@example.com", "nope").await;
    assert!(matches!(wrong, Err(BiolinkError::AuthDenied(_))));

    let mut events = sessions.subscribe();
    let session = service.sign_in("A@example.com", "pw").await.unwrap();
    assert_eq!(session.handle.as_deref(), Some("alice"));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::SignedIn(session)
    );

    service.sign_out().await.unwrap();
    assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);
}

#[tokio::test]
async fn test_route_follows_session_changes() {
    let dir = TempDir::new().unwrap();
    let (service, _sessions, _profiles) = accounts(&dir);
    let mut routes = service.watch_routes().await;
    assert_eq!(*routes.borrow(), ViewRoute::Anonymous);

    service.sign_up("a@example.com", "pw", "alice").await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), routes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*routes.borrow_and_update(), ViewRoute::Owner("alice".to_string()));

    service.sign_out().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), routes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*routes.borrow_and_update(), ViewRoute::Anonymous);
}
