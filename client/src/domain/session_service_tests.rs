//! Tests for the session manager.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    GatewayError, InMemoryTokenStore, MockAuthGateway, MockTokenStore,
};
use crate::domain::{AuthToken, ErrorCode, Role, UserDraft, UserId};

fn user(role: Role) -> User {
    User::new(UserDraft {
        id: UserId::new("u1").expect("id"),
        name: "Lucia".to_owned(),
        email: "lucia@example.com".to_owned(),
        role,
        confirmado: true,
        image: None,
    })
}

fn session(role: Role) -> Session {
    Session::new(user(role), AuthToken::new("tok-1").expect("token"))
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("lucia@example.com", "secret").expect("credentials")
}

#[tokio::test]
async fn login_persists_and_publishes_session() {
    let mut auth = MockAuthGateway::new();
    auth.expect_login()
        .times(1)
        .return_once(|_| Ok(session(Role::Paciente)));
    let store = Arc::new(InMemoryTokenStore::default());
    let manager = SessionManager::new(Arc::new(auth), store.clone());
    let mut changes = manager.subscribe();

    let started = manager.login(&credentials()).await.expect("login succeeds");

    assert_eq!(started.role(), Role::Paciente);
    assert!(changes.has_changed().expect("sender alive"));
    assert_eq!(changes.borrow_and_update().as_ref(), Some(&started));
    assert_eq!(store.load().await.expect("load"), Some(started.clone()));
    assert_eq!(manager.current(), Some(started));
}

#[tokio::test]
async fn failed_login_leaves_session_empty() {
    let mut auth = MockAuthGateway::new();
    auth.expect_login()
        .return_once(|_| Err(GatewayError::unauthorized("Contraseña incorrecta")));
    let mut store = MockTokenStore::new();
    store.expect_save().times(0);
    let manager = SessionManager::new(Arc::new(auth), Arc::new(store));

    let err = manager.login(&credentials()).await.expect_err("login fails");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Contraseña incorrecta");
    assert!(manager.current().is_none());
}

#[tokio::test]
async fn logout_clears_store_and_memory() {
    let mut auth = MockAuthGateway::new();
    auth.expect_login()
        .return_once(|_| Ok(session(Role::Doctor)));
    let store = Arc::new(InMemoryTokenStore::default());
    let manager = SessionManager::new(Arc::new(auth), store.clone());
    manager.login(&credentials()).await.expect("login");

    manager.logout().await.expect("logout");

    assert!(manager.current().is_none());
    assert!(store.load().await.expect("load").is_none());
}

#[tokio::test]
async fn rehydrate_restores_persisted_session_without_network() {
    let mut auth = MockAuthGateway::new();
    auth.expect_login().times(0);
    let store = Arc::new(InMemoryTokenStore::with_session(session(Role::Asistente)));
    let manager = SessionManager::new(Arc::new(auth), store);

    let restored = manager.rehydrate().await.expect("rehydrate");

    assert_eq!(restored.map(|s| s.role()), Some(Role::Asistente));
    assert_eq!(manager.current().map(|s| s.role()), Some(Role::Asistente));
}

#[tokio::test]
async fn rehydrate_discards_corrupt_record() {
    let mut store = MockTokenStore::new();
    store
        .expect_load()
        .return_once(|| Err(TokenStoreError::corrupt("expected value at line 1")));
    store.expect_clear().times(1).return_once(|| Ok(()));
    let manager = SessionManager::new(Arc::new(MockAuthGateway::new()), Arc::new(store));

    assert!(manager.rehydrate().await.expect("rehydrate").is_none());
}

#[tokio::test]
async fn rehydrate_surfaces_io_failures() {
    let mut store = MockTokenStore::new();
    store
        .expect_load()
        .return_once(|| Err(TokenStoreError::io("permission denied")));
    let manager = SessionManager::new(Arc::new(MockAuthGateway::new()), Arc::new(store));

    let err = manager.rehydrate().await.expect_err("io failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn unauthorized_results_expire_the_session() {
    let store = Arc::new(InMemoryTokenStore::with_session(session(Role::Paciente)));
    let manager = SessionManager::new(Arc::new(MockAuthGateway::new()), store.clone());
    manager.rehydrate().await.expect("rehydrate");

    let result: Result<(), Error> = manager
        .check(Err(Error::unauthorized("token expirado")))
        .await;

    assert!(result.is_err());
    assert!(manager.current().is_none());
    assert!(store.load().await.expect("load").is_none());
}

#[tokio::test]
async fn other_failures_keep_the_session() {
    let store = Arc::new(InMemoryTokenStore::with_session(session(Role::Paciente)));
    let manager = SessionManager::new(Arc::new(MockAuthGateway::new()), store);
    manager.rehydrate().await.expect("rehydrate");

    let result: Result<(), Error> = manager
        .check(Err(Error::service_unavailable("offline")))
        .await;

    assert!(result.is_err());
    assert!(manager.current().is_some());
}

#[tokio::test]
async fn expire_still_clears_memory_when_store_fails() {
    let mut store = MockTokenStore::new();
    store
        .expect_load()
        .return_once(|| Ok(Some(session(Role::Doctor))));
    store
        .expect_clear()
        .return_once(|| Err(TokenStoreError::io("read-only filesystem")));
    let manager = SessionManager::new(Arc::new(MockAuthGateway::new()), Arc::new(store));
    manager.rehydrate().await.expect("rehydrate");

    manager.expire().await;

    assert!(manager.current().is_none());
}

#[tokio::test]
async fn replace_user_keeps_token() {
    let store = Arc::new(InMemoryTokenStore::with_session(session(Role::Paciente)));
    let manager = SessionManager::new(Arc::new(MockAuthGateway::new()), store.clone());
    manager.rehydrate().await.expect("rehydrate");

    let renamed = User::new(UserDraft {
        id: UserId::new("u1").expect("id"),
        name: "Lucía Pérez".to_owned(),
        email: "lucia@example.com".to_owned(),
        role: Role::Paciente,
        confirmado: true,
        image: Some("uploads/lucia.png".to_owned()),
    });
    manager.replace_user(renamed).await.expect("replace");

    let current = manager.current().expect("session");
    assert_eq!(current.user().name(), "Lucía Pérez");
    assert_eq!(current.token().expose(), "tok-1");
    assert_eq!(store.load().await.expect("load"), Some(current));
}

#[test]
fn require_without_session_is_unauthorized() {
    let manager = SessionManager::new(
        Arc::new(MockAuthGateway::new()),
        Arc::new(InMemoryTokenStore::default()),
    );
    assert_eq!(
        manager.require().expect_err("no session").code(),
        ErrorCode::Unauthorized
    );
}
