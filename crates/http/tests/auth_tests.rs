//! Login and logout against a mocked backend

use depot_core::{
    FileSessionStore, FileUserStore, MemoryNotifier, MemorySessionStore, MemoryUserStore,
    Notification, Session, SessionStore, UserStore,
};
use depot_http::client::auth::LOGIN_SUCCESS_MESSAGE;
use depot_http::types::LoginRequest;
use depot_http::{ApiClient, AuthPipeline, AuthService, ClientError};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    auth: AuthService,
    sessions: Arc<MemorySessionStore>,
    users: Arc<MemoryUserStore>,
    notifier: Arc<MemoryNotifier>,
}

fn harness(server: &MockServer) -> Harness {
    let sessions = Arc::new(MemorySessionStore::new());
    let users = Arc::new(MemoryUserStore::new());
    let notifier = Arc::new(MemoryNotifier::new());

    let pipeline = AuthPipeline::builder(ApiClient::new(server.uri()).unwrap())
        .session_store(sessions.clone())
        .user_store(users.clone())
        .notifier(notifier.clone())
        .build();

    Harness {
        auth: AuthService::new(pipeline),
        sessions,
        users,
        notifier,
    }
}

async fn mount_login_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"emailOrPhone": "ops@example.lk", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {
            "accessToken": "A1",
            "refreshToken": "R1",
            "_id": "u-7",
            "name": "Operations",
            "email": "ops@example.lk",
            "role": "MANAGER"
        }})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_stores_session_and_user() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;

    let h = harness(&server);
    let user = h
        .auth
        .login(&LoginRequest::new("ops@example.lk", "secret"))
        .await
        .unwrap();

    assert_eq!(user.id.as_deref(), Some("u-7"));
    assert_eq!(user.role.as_deref(), Some("MANAGER"));
    assert_eq!(h.sessions.get().await.unwrap(), Some(Session::new("A1", "R1")));
    assert_eq!(h.users.get().await.unwrap(), Some(user));
    assert!(h.auth.is_authenticated().await.unwrap());
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::success(LOGIN_SUCCESS_MESSAGE)]
    );
}

#[tokio::test]
async fn test_login_failure_notifies_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let h = harness(&server);
    let err = h
        .auth
        .login(&LoginRequest::new("ops@example.lk", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::BadRequest(_)));
    assert!(h.sessions.get().await.unwrap().is_none());
    assert!(h.users.get().await.unwrap().is_none());
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::error("Invalid credentials")]
    );
}

#[tokio::test]
async fn test_login_unauthorized_does_not_attempt_renewal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Account locked"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server);
    let err = h
        .auth
        .login(&LoginRequest::new("0771234567", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::AuthenticationFailed(_)));
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::error("Account locked")]
    );
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;

    let h = harness(&server);
    h.auth
        .login(&LoginRequest::new("ops@example.lk", "secret"))
        .await
        .unwrap();
    h.auth.logout().await.unwrap();

    assert!(h.sessions.get().await.unwrap().is_none());
    assert!(h.auth.current_user().await.unwrap().is_none());
    assert!(!h.auth.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn test_login_persists_across_file_stores() {
    let server = MockServer::start().await;
    mount_login_success(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let session_file = temp_dir.path().join("session.json");
    let user_file = temp_dir.path().join("user.json");

    let pipeline = AuthPipeline::builder(ApiClient::new(server.uri()).unwrap())
        .session_store(Arc::new(FileSessionStore::new(&session_file)))
        .user_store(Arc::new(FileUserStore::new(&user_file)))
        .notifier(Arc::new(MemoryNotifier::new()))
        .build();
    AuthService::new(pipeline)
        .login(&LoginRequest::new("ops@example.lk", "secret"))
        .await
        .unwrap();

    // A fresh process would open the same files
    let sessions = FileSessionStore::new(&session_file);
    let users = FileUserStore::new(&user_file);
    assert_eq!(sessions.access_token().await.unwrap().as_deref(), Some("A1"));
    assert_eq!(
        users.get().await.unwrap().and_then(|u| u.name),
        Some("Operations".to_string())
    );
}
