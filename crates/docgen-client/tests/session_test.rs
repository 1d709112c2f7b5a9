//! Session lifecycle against a mocked API.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST | `/api/auth/login` | `login_*` |
//! | GET  | `/api/users/profile` | `init_*` |
//! | POST | `/api/auth/logout` | `logout_*` |
//! | POST | `/api/auth/refresh` | `refresh_token_*` |
//! | any  | any, answering 401 | `unauthorized_*` |

use std::sync::Arc;

use docgen_client::storage::AUTH_TOKEN_KEY;
use docgen_client::{ApiError, AuthState, ClientConfig, Docgen, MemoryStore, Route, StateStore};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connect(server: &MockServer, store: Arc<dyn StateStore>) -> Docgen {
    let config = ClientConfig::new(&format!("{}/api", server.uri()));
    Docgen::connect(&config, store).unwrap()
}

async fn mount_login(server: &MockServer, token: &str, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": token,
            "user": {"id": 1, "email": "a@b.com", "role": role, "permissions": ["view_customers"]}
        })))
        .mount(server)
        .await;
}

fn empty_page() -> serde_json::Value {
    serde_json::json!({
        "items": [],
        "pagination": {"page": 1, "per_page": 20, "total": 0, "pages": 0, "has_prev": false, "has_next": false}
    })
}

// ── login ────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_then_requests_carry_bearer_exactly_once() {
    let server = MockServer::start().await;
    mount_login(&server, "t1", "user").await;
    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .expect(1)
        .mount(&server)
        .await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let docgen = connect(&server, store.clone());

    let user = docgen.session.login("a@b.com", "pw").await.unwrap();
    assert_eq!(user.role.as_str(), "user");
    assert!(docgen.session.is_authenticated());
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t1"));

    docgen.api.customers().list(&Default::default()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let customers = requests
        .iter()
        .find(|r| r.url.path() == "/api/customers")
        .unwrap();
    assert_eq!(customers.headers.get_all("authorization").iter().count(), 1);

    let login = requests
        .iter()
        .find(|r| r.url.path() == "/api/auth/login")
        .unwrap();
    assert!(login.headers.get("authorization").is_none());
}

#[tokio::test]
async fn login_accepts_nested_token_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Succesvol ingelogd",
            "user": {"id": "u-1", "role": "admin"},
            "tokens": {"access_token": "nested", "refresh_token": "r", "token_type": "Bearer"}
        })))
        .mount(&server)
        .await;

    let docgen = connect(&server, Arc::new(MemoryStore::new()));
    docgen.session.login("Admin@Bedrijf.nl", "pw").await.unwrap();
    assert_eq!(docgen.client().session().token().as_deref(), Some("nested"));
    assert!(docgen.session.has_permission("view_settings"));
}

#[tokio::test]
async fn login_rejected_credentials_leave_session_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Ongeldige inloggegevens"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docgen = connect(&server, Arc::new(MemoryStore::new()));
    docgen.session.init().await;

    let err = docgen.session.login("a@b.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::AuthFailed { .. }));
    assert_eq!(docgen.session.state(), AuthState::Anonymous);
    assert_eq!(docgen.session.last_error().as_deref(), Some("Invalid email or password"));
}

#[tokio::test]
async fn login_business_error_message_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": "Account is gedeactiveerd"
        })))
        .mount(&server)
        .await;

    let docgen = connect(&server, Arc::new(MemoryStore::new()));
    let err = docgen.session.login("a@b.com", "pw").await.unwrap_err();
    match err {
        ApiError::AuthFailed { reason } => assert_eq!(reason, "Account is gedeactiveerd"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn login_with_malformed_email_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let docgen = connect(&server, Arc::new(MemoryStore::new()));
    let err = docgen.session.login("not-an-email", "pw").await.unwrap_err();
    assert!(matches!(err, ApiError::AuthFailed { .. }));
}

// ── init ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn init_without_token_is_anonymous_without_calls() {
    let server = MockServer::start().await;
    let docgen = connect(&server, Arc::new(MemoryStore::new()));

    assert_eq!(docgen.session.state(), AuthState::Unknown);
    assert_eq!(docgen.session.init().await, AuthState::Anonymous);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn init_with_valid_persisted_token_restores_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .and(header("Authorization", "Bearer saved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {"id": 3, "role": "sales", "permissions": ["view_orders"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    store.set(AUTH_TOKEN_KEY, "saved").unwrap();
    let docgen = connect(&server, store);

    let state = docgen.session.init().await;
    assert!(state.is_authenticated());
    assert_eq!(docgen.session.current_user().unwrap().id, "3");
    assert!(docgen.session.has_permission("view_orders"));
    assert!(!docgen.session.has_permission("view_settings"));
}

#[tokio::test]
async fn init_with_rejected_token_clears_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    store.set(AUTH_TOKEN_KEY, "stale").unwrap();
    let docgen = connect(&server, store.clone());

    assert_eq!(docgen.session.init().await, AuthState::Anonymous);
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
}

// ── 401 policy ───────────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_response_ends_session_and_redirects() {
    let server = MockServer::start().await;
    mount_login(&server, "t1", "sales").await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Token expired"
        })))
        .mount(&server)
        .await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let docgen = connect(&server, store.clone());
    docgen.session.login("a@b.com", "pw").await.unwrap();
    docgen.navigator().navigate(Route::Orders);

    let err = docgen.api.orders().list(&Default::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(docgen.session.state(), AuthState::Anonymous);
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(docgen.navigator().current(), Route::Login);
}

// ── logout ───────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_locally_when_remote_fails() {
    let server = MockServer::start().await;
    mount_login(&server, "t1", "sales").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Database unavailable"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let docgen = connect(&server, store.clone());
    docgen.session.login("a@b.com", "pw").await.unwrap();

    docgen.session.logout().await;
    assert_eq!(docgen.session.state(), AuthState::Anonymous);
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(docgen.navigator().current(), Route::Login);
}

#[tokio::test]
async fn logout_clears_locally_when_server_unreachable() {
    let server = MockServer::start().await;
    mount_login(&server, "t1", "sales").await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let docgen = connect(&server, store.clone());
    docgen.session.login("a@b.com", "pw").await.unwrap();
    drop(server);

    docgen.session.logout().await;
    assert_eq!(docgen.session.state(), AuthState::Anonymous);
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn network_failure_is_reported_without_touching_session() {
    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let config = ClientConfig::new("http://127.0.0.1:9/api");
    let docgen = Docgen::connect(&config, store).unwrap();

    let err = docgen.api.dashboard().stats().await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkError(_)));
    assert_eq!(docgen.session.state(), AuthState::Unknown);
}

#[tokio::test]
async fn relogin_does_not_send_previous_token() {
    let server = MockServer::start().await;
    mount_login(&server, "t1", "user").await;

    let docgen = connect(&server, Arc::new(MemoryStore::new()));
    docgen.session.login("a@b.com", "pw").await.unwrap();
    docgen.session.login("a@b.com", "pw").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let logins: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/auth/login")
        .collect();
    assert_eq!(logins.len(), 2);
    assert!(logins.iter().all(|r| r.headers.get("authorization").is_none()));
}

// ── token refresh ────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_token_replaces_persisted_token_for_next_requests() {
    let server = MockServer::start().await;
    mount_login(&server, "t1", "user").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "t2"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .and(header("Authorization", "Bearer t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .expect(1)
        .mount(&server)
        .await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let docgen = connect(&server, store.clone());
    docgen.session.login("a@b.com", "pw").await.unwrap();

    docgen.session.refresh_token().await.unwrap();
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t2"));
    assert_eq!(docgen.session.current_user().unwrap().email.as_deref(), Some("a@b.com"));

    docgen.api.customers().list(&Default::default()).await.unwrap();
}

#[tokio::test]
async fn refresh_token_requires_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "t2"})))
        .expect(0)
        .mount(&server)
        .await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    store.set(AUTH_TOKEN_KEY, "stale").unwrap();
    let docgen = connect(&server, store.clone());

    let err = docgen.session.refresh_token().await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("stale"));
    assert!(!docgen.session.is_authenticated());
}

// ── disposal ─────────────────────────────────────────────────────────

#[tokio::test]
async fn dispose_releases_subscribers_and_keeps_persisted_token() {
    let server = MockServer::start().await;
    mount_login(&server, "t1", "user").await;

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let docgen = connect(&server, store.clone());
    docgen.session.login("a@b.com", "pw").await.unwrap();

    let mut rx = docgen.session.subscribe();
    let client = docgen.client().clone();
    let waiter = tokio::spawn(async move { rx.changed().await.is_err() });

    docgen.session.dispose();

    assert!(waiter.await.unwrap());
    assert!(client.session().is_closed());
    assert!(client.session().subscribe().changed().await.is_err());
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t1"));
}
