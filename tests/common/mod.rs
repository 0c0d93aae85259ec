use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use fake::Fake;
use fake::faker::internet::en::Username;
use parking_lot::Mutex;
use serde_json::{Value, json};
use storyline::ApiClient;
use storyline_auth::{MemoryStorage, TokenStorage};
use storyline_config::ApiConfig;
use uuid::Uuid;

/// A request as the mock backend received it.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Lower-cased header names.
    pub headers: HashMap<String, String>,
    pub body: Value,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: Value,
    text: bool,
}

#[allow(dead_code)]
impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            text: false,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: Value::String(body.to_string()),
            text: true,
        }
    }
}

#[derive(Default)]
struct MockState {
    /// Scripted responses per `METHOD path`. The last one repeats.
    routes: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    /// Paths answering 401 unless this bearer token is sent.
    guards: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// An axum server on an ephemeral port that answers with scripted
/// responses and records every request it receives.
pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Queues a response for `method path`.
    pub fn on(&self, method: &str, path: &str, response: MockResponse) -> &Self {
        self.state
            .routes
            .lock()
            .entry(route_key(method, path))
            .or_default()
            .push_back(response);
        self
    }

    pub fn on_json(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.on(method, path, MockResponse::json(status, body))
    }

    /// Makes `path` answer 401 unless `Authorization: Bearer <token>` is sent.
    pub fn require_bearer(&self, path: &str, token: &str) -> &Self {
        self.state
            .guards
            .lock()
            .insert(path.to_string(), token.to_string());
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::with_base_url(&self.base_url)
    }

    pub fn client(&self) -> ApiClient {
        client_for(self.config())
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_ascii_lowercase(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let authorization = recorded.header("authorization").map(str::to_string);
    state.requests.lock().push(recorded);

    if let Some(token) = state.guards.lock().get(&path) {
        if authorization.as_deref() != Some(format!("Bearer {}", token).as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({"detail": "Token expired"})),
            )
                .into_response();
        }
    }

    let scripted = {
        let mut routes = state.routes.lock();
        routes
            .get_mut(&route_key(method.as_str(), &path))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
    };

    match scripted {
        Some(MockResponse {
            status,
            body: Value::String(content),
            text: true,
        }) => (status, [(header::CONTENT_TYPE, "text/plain")], content).into_response(),
        Some(MockResponse { status, body, .. }) => (status, axum::Json(body)).into_response(),
        None => (StatusCode::NOT_FOUND, axum::Json(json!({"detail": "Not Found"}))).into_response(),
    }
}

fn route_key(method: &str, path: &str) -> String {
    format!("{} {}", method.to_ascii_uppercase(), path)
}

/// Client with process-local token storage.
pub fn client_for(config: ApiConfig) -> ApiClient {
    ApiClient::with_storage(config, Arc::new(MemoryStorage::new())).unwrap()
}

#[allow(dead_code)]
pub fn client_with_storage(config: ApiConfig, storage: Arc<dyn TokenStorage>) -> ApiClient {
    ApiClient::with_storage(config, storage).unwrap()
}

/// Base URL nothing is listening on.
#[allow(dead_code)]
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[allow(dead_code)]
pub fn tokens(access: &str, refresh: Option<&str>) -> Value {
    match refresh {
        Some(refresh) => json!({"access_token": access, "refresh_token": refresh, "token_type": "bearer"}),
        None => json!({"access_token": access, "token_type": "bearer"}),
    }
}

#[allow(dead_code)]
pub fn user(email: &str, role: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "email": email,
        "display_name": "Test Reader",
        "role": role,
    })
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    let name: String = Username().fake();
    format!(
        "{}-{}@test.com",
        name.to_ascii_lowercase(),
        Uuid::new_v4().simple()
    )
}
