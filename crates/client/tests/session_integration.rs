//! Session lifecycle tests: login, registration, logout.

use std::sync::Arc;
use std::time::Duration;

use drivehub_auth::testing::RecordingNavigator;
use drivehub_auth::{
    HttpRefreshClient, MemoryTokenStore, RefreshCoordinator, RefreshCoordinatorConfig, TokenPair,
    TokenStore,
};
use drivehub_client::{
    ApiClient, ApiClientConfig, ClientError, RegistrationRequest, SessionManager,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn build_session(server: &MockServer, store: Arc<MemoryTokenStore>) -> SessionManager {
    let refresh = Arc::new(HttpRefreshClient::new(format!("{}/auth/refresh", server.uri())));
    let coordinator = Arc::new(RefreshCoordinator::new(
        refresh,
        store.clone(),
        Arc::new(RecordingNavigator::new("/")),
        RefreshCoordinatorConfig::default(),
    ));

    let client = Arc::new(
        ApiClient::new(
            ApiClientConfig { base_url: server.uri(), timeout: Duration::from_secs(5) },
            store.clone(),
            coordinator,
        )
        .expect("client should build"),
    );

    SessionManager::new(client, store)
}

#[tokio::test]
async fn login_persists_the_delivered_pair() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "buyer@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh.access.token",
            "refresh_token": "fresh.refresh.token",
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = build_session(&server, store.clone());

    session.login("buyer@example.com", "hunter2").await.expect("login");

    let stored = store.load().await.expect("load").expect("tokens present");
    assert_eq!(stored.access_token, "fresh.access.token");
    assert_eq!(stored.refresh_token.as_deref(), Some("fresh.refresh.token"));
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn login_rejects_a_malformed_access_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "not-a-real-token",
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = build_session(&server, store.clone());

    let err = session.login("buyer@example.com", "hunter2").await.expect_err("must fail");
    assert!(matches!(err, ClientError::Auth(_)));
    assert!(store.load().await.expect("load").is_none());
}

#[tokio::test]
async fn failed_login_surfaces_the_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = build_session(&server, store.clone());

    let err = session.login("buyer@example.com", "wrong").await.expect_err("must fail");
    assert!(matches!(err, ClientError::Auth(_)));
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn register_persists_the_delivered_pair() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "access_token": "fresh.access.token",
            "refresh_token": "fresh.refresh.token",
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = build_session(&server, store.clone());

    let request = RegistrationRequest {
        email: "seller@example.com".to_string(),
        password: "hunter2".to_string(),
        display_name: Some("Seller".to_string()),
    };
    session.register(&request).await.expect("register");

    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn logout_clears_tokens_even_when_the_backend_call_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_tokens(TokenPair::new(
        "old.access.token".to_string(),
        Some("old.refresh.token".to_string()),
    )));
    let session = build_session(&server, store.clone());

    session.logout().await.expect("logout");

    assert!(store.load().await.expect("load").is_none());
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn logout_invalidates_the_backend_session_when_reachable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_tokens(TokenPair::new(
        "old.access.token".to_string(),
        Some("old.refresh.token".to_string()),
    )));
    let session = build_session(&server, store.clone());

    session.logout().await.expect("logout");
    assert!(store.load().await.expect("load").is_none());
}
