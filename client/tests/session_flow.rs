//! Session manager contro un server HTTP scriptato con wiremock

use client::session::{
    HOME_ROUTE, LOGIN_FALLBACK, NO_TOKEN, PROFILE_ROUTE, REGISTER_FALLBACK, REGISTERED_ROUTE,
    TOKEN_KEY,
};
use client::{ApiClient, MemoryTokenStore, RecordingNavigator, SessionManager, TokenStore};
use serde_json::json;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    session: SessionManager,
    tokens: Arc<MemoryTokenStore>,
    navigator: Arc<RecordingNavigator>,
}

fn harness(base_url: &str) -> Harness {
    let tokens = Arc::new(MemoryTokenStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let api = ApiClient::new(Url::parse(base_url).unwrap());
    let session = SessionManager::new(api, tokens.clone(), navigator.clone());
    Harness {
        session,
        tokens,
        navigator,
    }
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}

/// Indirizzo su cui nessuno è in ascolto
fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// ============================================================
// initialize
// ============================================================

#[tokio::test]
async fn initialize_without_token_makes_no_requests() {
    let server = MockServer::start().await;
    let h = harness(&server.uri());

    h.session.initialize().await;

    assert_eq!(h.session.current_user(), None);
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn initialize_with_valid_token_restores_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })))
        .expect(1)
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "abc").unwrap();

    h.session.initialize().await;

    assert_eq!(h.session.current_user(), Some(json!({ "id": 1 })));
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("abc"));
    assert!(h.navigator.visited().is_empty());
}

#[tokio::test]
async fn initialize_with_missing_user_field_is_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "abc").unwrap();

    h.session.initialize().await;

    assert!(!h.session.is_authenticated());
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("abc"));
}

#[tokio::test]
async fn initialize_with_rejected_token_discards_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .expect(1)
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "stale").unwrap();

    h.session.initialize().await;

    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.tokens.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn initialize_with_unparsable_body_keeps_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "abc").unwrap();

    h.session.initialize().await;

    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("abc"));
}

#[tokio::test]
async fn initialize_with_unreachable_server_keeps_token() {
    let h = harness(&unreachable_base_url());
    h.tokens.set(TOKEN_KEY, "abc").unwrap();

    h.session.initialize().await;

    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("abc"));
}

#[tokio::test]
async fn initialize_runs_only_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })))
        .expect(1)
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "abc").unwrap();

    h.session.initialize().await;
    h.session.initialize().await;

    assert_eq!(request_count(&server).await, 1);
}

// ============================================================
// login
// ============================================================

#[tokio::test]
async fn login_with_bad_credentials_returns_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "u", "password": "bad" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "bad creds" })))
        .expect(1)
        .mount(&server)
        .await;
    let h = harness(&server.uri());

    let result = h.session.login("u", "bad").await;

    assert_eq!(result, Err("bad creds".to_string()));
    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.tokens.get(TOKEN_KEY), None);
    assert!(h.navigator.visited().is_empty());
}

#[tokio::test]
async fn login_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;
    let h = harness(&server.uri());

    let result = h.session.login("u", "pw").await;

    assert_eq!(result, Err(LOGIN_FALLBACK.to_string()));
}

#[tokio::test]
async fn login_failure_leaves_existing_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "bad creds" })))
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "abc").unwrap();
    h.session.initialize().await;

    let result = h.session.login("u", "bad").await;

    assert!(result.is_err());
    assert_eq!(h.session.current_user(), Some(json!({ "id": 1 })));
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("abc"));
}

#[tokio::test]
async fn login_success_persists_token_and_loads_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "u", "password": "good" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })))
        .expect(1)
        .mount(&server)
        .await;
    let h = harness(&server.uri());

    let result = h.session.login("u", "good").await;

    assert_eq!(result, Ok(()));
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("abc"));
    assert_eq!(h.session.current_user(), Some(json!({ "id": 1 })));
    assert_eq!(h.navigator.visited(), vec![PROFILE_ROUTE]);
}

#[tokio::test]
async fn login_without_token_field_returns_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;
    let h = harness(&server.uri());

    let result = h.session.login("u", "good").await;

    assert_eq!(result, Err(NO_TOKEN.to_string()));
    assert_eq!(h.tokens.get(TOKEN_KEY), None);
    assert_eq!(h.session.current_user(), None);
    assert!(h.navigator.visited().is_empty());
    // nessun fetch del profilo dopo un login senza token
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn login_with_failing_profile_fetch_still_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "new" })))
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "old").unwrap();
    h.session.initialize().await;
    assert!(h.session.is_authenticated());

    // il secondo /user/me non ha più un mock: wiremock risponde 404
    let result = h.session.login("u", "good").await;

    assert_eq!(result, Ok(()));
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("new"));
    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.navigator.last().as_deref(), Some(PROFILE_ROUTE));
}

#[tokio::test]
async fn login_with_unreachable_server_returns_error() {
    let h = harness(&unreachable_base_url());

    let result = h.session.login("u", "pw").await;

    let message = result.unwrap_err();
    assert!(!message.is_empty());
    assert_eq!(h.tokens.get(TOKEN_KEY), None);
    assert!(h.navigator.visited().is_empty());
}

// ============================================================
// logout
// ============================================================

#[tokio::test]
async fn logout_after_login_clears_everything() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })))
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    let mut updates = h.session.subscribe();
    h.session.login("u", "good").await.unwrap();

    h.session.logout();

    assert_eq!(h.tokens.get(TOKEN_KEY), None);
    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.navigator.visited(), vec![PROFILE_ROUTE, HOME_ROUTE]);
    assert!(updates.has_changed().unwrap());
    assert_eq!(*updates.borrow_and_update(), None);
}

#[tokio::test]
async fn logout_when_anonymous_still_navigates_home() {
    let server = MockServer::start().await;
    let h = harness(&server.uri());

    h.session.logout();

    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.navigator.visited(), vec![HOME_ROUTE]);
    assert_eq!(request_count(&server).await, 0);
}

// ============================================================
// register
// ============================================================

#[tokio::test]
async fn register_success_navigates_without_logging_in() {
    let server = MockServer::start().await;
    let payload = json!({ "username": "newbie", "password": "Password123", "email": "n@x.io" });
    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "user": { "id": 9 } })))
        .expect(1)
        .mount(&server)
        .await;
    let h = harness(&server.uri());

    let result = h.session.register(&payload).await;

    assert_eq!(result, Ok(()));
    assert_eq!(h.navigator.visited(), vec![REGISTERED_ROUTE]);
    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.tokens.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn register_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;
    let h = harness(&server.uri());

    let result = h.session.register(&json!({ "username": "x" })).await;

    assert_eq!(result, Err(REGISTER_FALLBACK.to_string()));
    assert!(h.navigator.visited().is_empty());
}

#[tokio::test]
async fn register_failure_returns_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Username already exists" })),
        )
        .mount(&server)
        .await;
    let h = harness(&server.uri());
    h.tokens.set(TOKEN_KEY, "keep-me").unwrap();

    let result = h.session.register(&json!({ "username": "alice" })).await;

    assert_eq!(result, Err("Username already exists".to_string()));
    assert_eq!(h.tokens.get(TOKEN_KEY).as_deref(), Some("keep-me"));
}
