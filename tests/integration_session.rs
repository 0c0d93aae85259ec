mod common;

use std::sync::Arc;

use common::{MockBackend, client_with_storage, generate_unique_email, tokens, unreachable_url, user};
use serde_json::json;
use storyline_auth::{
    ACCESS_TOKEN_KEY, FileStorage, MemoryStorage, REFRESH_TOKEN_KEY, TokenStorage,
};
use storyline_config::ApiConfig;
use storyline_core::ApiError;
use storyline_models::Role;
use storyline::modules::SessionManager;

const LOGIN: &str = "/api/auth/login";
const REGISTER: &str = "/api/auth/register";
const REFRESH: &str = "/api/auth/refresh";
const ME: &str = "/api/auth/me";

#[tokio::test]
async fn test_login_success_persists_tokens() {
    storyline_observability::init_test_logging();
    let backend = MockBackend::start().await;
    let email = generate_unique_email();
    backend
        .on_json("POST", LOGIN, 200, tokens("T1", Some("R1")))
        .on_json("GET", ME, 200, user(&email, "instructor"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let client = client_with_storage(backend.config(), Arc::new(FileStorage::new(&path)));

    let signed_in = SessionManager::login(client.api(), &email, "password123")
        .await
        .unwrap();

    assert_eq!(signed_in.email, email);
    assert_eq!(signed_in.role, Role::Instructor);
    assert_eq!(client.session().user().unwrap().email, email);

    let login = &backend.requests_to(LOGIN)[0];
    assert_eq!(login.body, json!({"email": email, "password": "password123"}));
    assert_eq!(login.header("authorization"), None);
    assert_eq!(
        backend.requests_to(ME)[0].header("authorization"),
        Some("Bearer T1")
    );

    let reopened = FileStorage::new(&path);
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("T1"));
    assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_login_bad_credentials_reports_server_message() {
    let backend = MockBackend::start().await;
    backend.on_json("POST", LOGIN, 401, json!({"detail": "Invalid email or password"}));

    let storage = Arc::new(MemoryStorage::new());
    storage.set(REFRESH_TOKEN_KEY, "R-old");
    let client = client_with_storage(backend.config(), storage);

    let err = SessionManager::login(client.api(), &generate_unique_email(), "wrong")
        .await
        .unwrap_err();

    match err {
        ApiError::Auth { status, message } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(backend.count(REFRESH), 0);
    assert_eq!(backend.count(ME), 0);
}

#[tokio::test]
async fn test_login_validation_never_reaches_network() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let err = SessionManager::login(client.api(), "not-an-email", "")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_register_stores_returned_pair() {
    let backend = MockBackend::start().await;
    let email = generate_unique_email();
    backend
        .on_json("POST", REGISTER, 201, tokens("T1", Some("R1")))
        .on_json("GET", ME, 200, user(&email, "student"));

    let client = backend.client();
    let created = SessionManager::register(client.api(), &email, "password123", Some(" Robin "))
        .await
        .unwrap();

    assert_eq!(created.email, email);
    assert_eq!(
        backend.requests_to(REGISTER)[0].body,
        json!({"email": email, "password": "password123", "display_name": "Robin"})
    );
    assert_eq!(client.session().access_token().as_deref(), Some("T1"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_register_conflict_is_auth_error() {
    let backend = MockBackend::start().await;
    backend.on_json("POST", REGISTER, 400, json!({"error": "Email already exists"}));

    let err = SessionManager::register(
        backend.client().api(),
        &generate_unique_email(),
        "password123",
        None,
    )
    .await
    .unwrap_err();

    assert_eq!(err.user_message(), "Email already exists");
}

#[tokio::test]
async fn test_logout_is_local_and_idempotent() {
    let backend = MockBackend::start().await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(ACCESS_TOKEN_KEY, "T1");
    storage.set(REFRESH_TOKEN_KEY, "R1");
    let client = client_with_storage(backend.config(), storage.clone());

    SessionManager::logout(client.api());
    SessionManager::logout(client.api());

    assert!(!client.session().is_authenticated());
    assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
    assert_eq!(storage.get(REFRESH_TOKEN_KEY), None);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_only_latest_access_token_is_stored() {
    let backend = MockBackend::start().await;
    let email = generate_unique_email();
    backend
        .on_json("POST", LOGIN, 200, tokens("T1", Some("R1")))
        .on_json("POST", LOGIN, 200, tokens("T3", Some("R3")))
        .on_json("POST", REFRESH, 200, tokens("T2", None))
        .on_json("GET", ME, 200, user(&email, "student"));

    let storage = Arc::new(MemoryStorage::new());
    let client = client_with_storage(backend.config(), storage.clone());

    SessionManager::login(client.api(), &email, "password123")
        .await
        .unwrap();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("T1"));

    SessionManager::refresh(client.api()).await.unwrap();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("T2"));
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));

    SessionManager::login(client.api(), &email, "password123")
        .await
        .unwrap();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("T3"));
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R3"));
}

#[tokio::test]
async fn test_refresh_without_token_is_session_expired() {
    let backend = MockBackend::start().await;

    let err = SessionManager::refresh(backend.client().api())
        .await
        .unwrap_err();

    assert!(err.is_session_expired());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_current_user_unauthorized_is_auth_error() {
    let backend = MockBackend::start().await;
    backend
        .require_bearer(ME, "NEVER")
        .on_json("POST", REFRESH, 200, tokens("T2", None));

    let storage = Arc::new(MemoryStorage::new());
    storage.set(ACCESS_TOKEN_KEY, "T1");
    storage.set(REFRESH_TOKEN_KEY, "R1");
    let client = client_with_storage(backend.config(), storage);

    let err = SessionManager::current_user(client.api())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Auth { .. }));
    assert!(err.is_unauthorized());
    assert_eq!(backend.count(REFRESH), 0);
}

#[tokio::test]
async fn test_restore_without_tokens_makes_no_calls() {
    let backend = MockBackend::start().await;

    let restored = SessionManager::restore(backend.client().api())
        .await
        .unwrap();

    assert!(restored.is_none());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_restore_with_refresh_token_only() {
    let backend = MockBackend::start().await;
    let email = generate_unique_email();
    backend
        .on_json("POST", REFRESH, 200, tokens("T2", None))
        .on_json("GET", ME, 200, user(&email, "student"));

    let storage = Arc::new(MemoryStorage::new());
    storage.set(REFRESH_TOKEN_KEY, "R1");
    let client = client_with_storage(backend.config(), storage);

    let restored = SessionManager::restore(client.api()).await.unwrap().unwrap();

    assert_eq!(restored.email, email);
    let paths: Vec<_> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec![REFRESH.to_string(), ME.to_string()]);
    assert_eq!(
        backend.requests_to(ME)[0].header("authorization"),
        Some("Bearer T2")
    );
}

#[tokio::test]
async fn test_restore_refreshes_expired_access_token_once() {
    let backend = MockBackend::start().await;
    let email = generate_unique_email();
    backend
        .require_bearer(ME, "T2")
        .on_json("GET", ME, 200, user(&email, "student"))
        .on_json("POST", REFRESH, 200, tokens("T2", None));

    let storage = Arc::new(MemoryStorage::new());
    storage.set(ACCESS_TOKEN_KEY, "T1");
    storage.set(REFRESH_TOKEN_KEY, "R1");
    let client = client_with_storage(backend.config(), storage);

    let restored = SessionManager::restore(client.api()).await.unwrap();

    assert_eq!(restored.unwrap().email, email);
    assert_eq!(backend.count(ME), 2);
    assert_eq!(backend.count(REFRESH), 1);
}

#[tokio::test]
async fn test_restore_with_revoked_refresh_token_signs_out() {
    let backend = MockBackend::start().await;
    backend.on_json("POST", REFRESH, 401, json!({"detail": "Refresh token revoked"}));

    let storage = Arc::new(MemoryStorage::new());
    storage.set(REFRESH_TOKEN_KEY, "R1");
    let client = client_with_storage(backend.config(), storage.clone());

    let restored = SessionManager::restore(client.api()).await.unwrap();

    assert!(restored.is_none());
    assert_eq!(storage.get(REFRESH_TOKEN_KEY), None);
    assert_eq!(backend.count(ME), 0);
}

#[tokio::test]
async fn test_restore_offline_keeps_tokens() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(ACCESS_TOKEN_KEY, "T1");
    storage.set(REFRESH_TOKEN_KEY, "R1");
    let config = ApiConfig::with_base_url(&unreachable_url().await);
    let client = client_with_storage(config, storage.clone());

    let err = SessionManager::restore(client.api()).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("T1"));
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_demo_token_sends_demo_user() {
    let backend = MockBackend::start().await;
    backend.on_json("POST", "/api/auth/token", 200, tokens("DEMO", None));

    let client = backend.client();
    SessionManager::issue_demo_token(client.api(), Some("demo-learner"))
        .await
        .unwrap();

    let call = &backend.requests_to("/api/auth/token")[0];
    assert_eq!(call.header("x-demo-user"), Some("demo-learner"));
    assert_eq!(client.session().access_token().as_deref(), Some("DEMO"));
    assert_eq!(client.session().refresh_token(), None);
}

#[tokio::test]
async fn test_login_with_refused_identity_discards_tokens() {
    let backend = MockBackend::start().await;
    backend
        .on_json("POST", LOGIN, 200, tokens("T1", Some("R1")))
        .on_json("GET", ME, 403, json!({"detail": "Account disabled"}));

    let storage = Arc::new(MemoryStorage::new());
    let client = client_with_storage(backend.config(), storage.clone());
    let state = client.session().subscribe();

    let err = SessionManager::login(client.api(), &generate_unique_email(), "password123")
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Account disabled");
    assert!(!client.session().is_authenticated());
    assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
    assert_eq!(storage.get(REFRESH_TOKEN_KEY), None);
    assert_eq!(*state.borrow(), storyline_auth::AuthState::Anonymous);
}
