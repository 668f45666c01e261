mod common;

use async_trait::async_trait;
use chrono::Local;
use common::ScriptedTransport;
use eventmates::api::ApiClient;
use eventmates::error::{ApiError, Result};
use eventmates::models::{Role, Session};
use eventmates::session::{
    mount_or_reload, CredentialStore, FilesystemCredentialStore, IdentitySource, SessionStore,
    SessionView, StoredCredentials,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::{Notify, OnceCell};

struct FakeIdentity {
    response: Mutex<Result<Session>>,
    fetches: AtomicUsize,
    hold: AtomicBool,
    release: Notify,
}

impl FakeIdentity {
    fn new(response: Result<Session>) -> Self {
        Self {
            response: Mutex::new(response),
            fetches: AtomicUsize::new(0),
            hold: AtomicBool::new(false),
            release: Notify::new(),
        }
    }

    fn respond_with(&self, response: Result<Session>) {
        *self.response.lock().unwrap() = response;
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentitySource for FakeIdentity {
    async fn fetch_session(&self) -> Result<Session> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        self.response.lock().unwrap().clone()
    }
}

fn admin() -> Session {
    Session {
        user_id: "u1".to_string(),
        role: Role::Admin,
        email: "a@x.com".to_string(),
    }
}

#[tokio::test]
async fn test_mount_loads_exactly_once() {
    let source = Arc::new(FakeIdentity::new(Ok(admin())));
    let store = SessionStore::mount(source.clone()).await;

    assert_eq!(source.fetch_count(), 1);
    assert_eq!(store.current_session().await, Some(admin()));
    assert!(!store.is_loading().await);
}

#[tokio::test]
async fn test_lazy_mount_fetches_identity_once() {
    let source = Arc::new(FakeIdentity::new(Ok(admin())));
    let cell = OnceCell::new();

    let store = mount_or_reload(&cell, || source.clone()).await;
    assert_eq!(source.fetch_count(), 1);
    assert_eq!(store.current_session().await, Some(admin()));

    source.respond_with(Ok(host()));
    let store = mount_or_reload(&cell, || source.clone()).await;
    assert_eq!(source.fetch_count(), 2);
    assert_eq!(store.current_session().await, Some(host()));
}

#[tokio::test]
async fn test_load_failure_clears_session() {
    let source = Arc::new(FakeIdentity::new(Ok(admin())));
    let store = SessionStore::mount(source.clone()).await;
    assert!(store.current_session().await.is_some());

    source.respond_with(Err(ApiError::http(401, "Unauthorized")));
    store.load().await;

    assert_eq!(store.current_session().await, None);
    assert!(!store.is_loading().await);
    assert_eq!(store.view().await, SessionView::Anonymous);
}

#[tokio::test]
async fn test_network_failure_also_clears_session() {
    let source = Arc::new(FakeIdentity::new(Err(ApiError::Network("offline".into()))));
    let store = SessionStore::mount(source).await;

    assert_eq!(store.current_session().await, None);
    assert!(!store.is_loading().await);
}

#[tokio::test]
async fn test_repeated_load_is_idempotent() {
    let source = Arc::new(FakeIdentity::new(Ok(admin())));
    let store = SessionStore::mount(source.clone()).await;

    store.load().await;
    let first = store.current_session().await;
    store.load().await;
    let second = store.current_session().await;

    assert_eq!(first, second);
    assert_eq!(second, Some(admin()));
    assert_eq!(source.fetch_count(), 3);
}

#[tokio::test]
async fn test_view_is_loading_while_reload_runs() {
    let source = Arc::new(FakeIdentity::new(Ok(admin())));
    let store = SessionStore::mount(source.clone()).await;

    source.hold.store(true, Ordering::SeqCst);
    let mut reload = Box::pin(store.load());
    assert!(futures::poll!(reload.as_mut()).is_pending());

    assert!(store.is_loading().await);
    assert_eq!(store.view().await, SessionView::Loading);
    assert!(!store.view().await.has_role(&[Role::Admin]));

    source.release.notify_one();
    reload.await;

    assert!(!store.is_loading().await);
    assert!(store.view().await.has_role(&[Role::Admin]));
}

/// Answers call `n` with `responses[n]`, optionally waiting for `release(n)`.
struct StaggeredIdentity {
    calls: AtomicUsize,
    responses: Vec<Result<Session>>,
    held: Vec<bool>,
    releases: Vec<Notify>,
}

impl StaggeredIdentity {
    fn new(steps: Vec<(Result<Session>, bool)>) -> Self {
        let releases: Vec<Notify> = steps.iter().map(|_| Notify::new()).collect();
        let (responses, held): (Vec<_>, Vec<_>) = steps.into_iter().unzip();
        Self {
            calls: AtomicUsize::new(0),
            responses,
            held,
            releases,
        }
    }

    fn release(&self, n: usize) {
        self.releases[n].notify_one();
    }
}

#[async_trait]
impl IdentitySource for StaggeredIdentity {
    async fn fetch_session(&self) -> Result<Session> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.held[n] {
            self.releases[n].notified().await;
        }
        self.responses[n].clone()
    }
}

fn host() -> Session {
    Session {
        user_id: "h1".to_string(),
        role: Role::Host,
        email: "h@x.com".to_string(),
    }
}

#[tokio::test]
async fn test_older_load_finishing_last_does_not_overwrite_newer() {
    let source = Arc::new(StaggeredIdentity::new(vec![
        (Ok(admin()), false),
        (Err(ApiError::http(401, "jwt expired")), true),
        (Ok(host()), false),
    ]));
    let store = SessionStore::mount(source.clone()).await;

    let mut older = Box::pin(store.load());
    assert!(futures::poll!(older.as_mut()).is_pending());

    store.load().await;
    assert_eq!(store.view().await, SessionView::Authenticated(host()));

    source.release(1);
    older.await;

    assert!(!store.is_loading().await);
    assert_eq!(store.view().await, SessionView::Authenticated(host()));
}

#[tokio::test]
async fn test_stays_loading_until_newest_load_finishes() {
    let source = Arc::new(StaggeredIdentity::new(vec![
        (Ok(admin()), false),
        (Ok(admin()), true),
        (Ok(host()), true),
    ]));
    let store = SessionStore::mount(source.clone()).await;

    let mut older = Box::pin(store.load());
    assert!(futures::poll!(older.as_mut()).is_pending());
    let mut newer = Box::pin(store.load());
    assert!(futures::poll!(newer.as_mut()).is_pending());

    source.release(1);
    older.await;
    assert!(store.is_loading().await);
    assert_eq!(store.view().await, SessionView::Loading);

    source.release(2);
    newer.await;
    assert!(!store.is_loading().await);
    assert_eq!(store.current_session().await, Some(host()));
}

#[tokio::test]
async fn test_api_client_maps_get_me_response() {
    let transport = ScriptedTransport::new().authenticated().responding(
        "/user/get-me",
        json!({
            "success": true,
            "message": "User retrieved",
            "data": {
                "_id": "u1",
                "name": "Ada",
                "role": "admin",
                "email": "a@x.com",
                "interests": ["chess"]
            }
        }),
    );
    let client = Arc::new(ApiClient::new(transport));

    let store = SessionStore::mount(client).await;

    assert_eq!(store.current_session().await, Some(admin()));
}

#[tokio::test]
async fn test_api_client_identity_with_unknown_role_is_anonymous() {
    let transport = ScriptedTransport::new().authenticated().responding(
        "/user/get-me",
        json!({
            "success": true,
            "data": { "_id": "u9", "role": "superuser", "email": "x@x.com" }
        }),
    );
    let store = SessionStore::mount(Arc::new(ApiClient::new(transport))).await;

    assert_eq!(store.current_session().await, None);
}

fn stored(base_url: &str, cookies: &str) -> StoredCredentials {
    StoredCredentials {
        base_url: base_url.to_string(),
        cookies: cookies.to_string(),
        saved_at: Local::now(),
    }
}

#[test]
fn test_save_and_load_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemCredentialStore::in_dir(temp_dir.path().join("eventmates"));

    store
        .save(&stored("http://localhost:5000/api/v1", "accessToken=a; refreshToken=r"))
        .unwrap();

    let found = store.load("http://localhost:5000/api/v1").unwrap();
    assert_eq!(found.cookies, "accessToken=a; refreshToken=r");
}

#[test]
fn test_credentials_for_other_backend_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemCredentialStore::in_dir(temp_dir.path());

    store
        .save(&stored("https://staging.example.com", "accessToken=a"))
        .unwrap();

    assert!(store.load("http://localhost:5000/api/v1").is_none());
}

#[test]
fn test_clear_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemCredentialStore::in_dir(temp_dir.path());

    store.save(&stored("http://api", "accessToken=a")).unwrap();
    store.clear().unwrap();

    assert!(store.load("http://api").is_none());
    // Clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn test_corrupt_credentials_file_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("credentials.json"), "{not json").unwrap();
    let store = FilesystemCredentialStore::in_dir(temp_dir.path());

    assert!(store.load("http://api").is_none());
}
