//! Resilient request execution.
//!
//! Every outbound call goes through [`RequestExecutor::execute`]:
//!
//! 1. headers are built: JSON content type unless the body is multipart,
//!    `X-Demo-User` when configured, `Authorization: Bearer <token>` when the
//!    session holds an access token and the caller set none;
//! 2. the call is issued and the body parsed (JSON or text, `Null` on failure);
//! 3. a 401 on a retryable request with a refresh token available triggers one
//!    refresh followed by exactly one reissue of the original request with
//!    retry disabled;
//! 4. anything else that is not a success becomes [`ApiError::Http`].
//!
//! Refreshes are serialized through a gate. A call that lost the race to a
//! concurrent refresh reuses the new token instead of refreshing again. A
//! caller-supplied `Authorization` header always gets a real refresh and is
//! resent unchanged on the retry.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use storyline_auth::Session;
use storyline_config::ApiConfig;
use storyline_core::{ApiError, ApiResult, RefreshFailure, server_message};
use storyline_models::{RefreshTokenRequest, TokenResponse};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::request::{ApiRequest, RequestBody};
use super::response::{ApiResponse, parse_body};

/// Header carrying the configured demo identity.
pub const DEMO_USER_HEADER: &str = "x-demo-user";

pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Where the `Authorization` header of a dispatched request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SentToken {
    None,
    /// Set by the caller; never compared against the session.
    Caller,
    Session(String),
}

struct Dispatched {
    status: StatusCode,
    data: Value,
    sent: SentToken,
}

impl Dispatched {
    fn into_result(self) -> ApiResult<ApiResponse> {
        if self.status.is_success() {
            Ok(ApiResponse {
                data: self.data,
                status: self.status,
            })
        } else {
            Err(ApiError::http(self.status, self.data))
        }
    }
}

#[derive(Debug)]
pub struct RequestExecutor {
    http: Client,
    config: ApiConfig,
    session: Arc<Session>,
    refresh_gate: Mutex<()>,
}

impl RequestExecutor {
    pub fn new(config: ApiConfig, session: Arc<Session>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http,
            config,
            session,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Issues `request`, refreshing and retrying once on 401.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let first = self.dispatch(request).await?;

        let retryable = first.status == StatusCode::UNAUTHORIZED
            && request.retry_on_unauthorized
            && self.session.refresh_token().is_some();
        if !retryable {
            return first.into_result();
        }

        if !self.refresh_after(&first.sent).await {
            return first.into_result();
        }

        info!("Retrying request with refreshed access token");
        self.dispatch(request).await?.into_result()
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// A 4xx answer from the refresh endpoint destroys the session; transport
    /// failures and 5xx answers leave it untouched.
    pub async fn refresh(&self) -> Result<TokenResponse, RefreshFailure> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_after(&self, sent: &SentToken) -> bool {
        let _gate = self.refresh_gate.lock().await;

        let current = self.session.access_token();
        let replaced = match sent {
            SentToken::Caller => false,
            SentToken::Session(token) => current.is_some_and(|c| &c != token),
            SentToken::None => current.is_some(),
        };
        if replaced {
            debug!("Access token already replaced by a concurrent refresh");
            return true;
        }

        match self.refresh_locked().await {
            Ok(_) => true,
            Err(failure) => {
                warn!(error = %failure, "Token refresh failed, surfacing original response");
                false
            }
        }
    }

    async fn refresh_locked(&self) -> Result<TokenResponse, RefreshFailure> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(RefreshFailure::MissingToken)?;

        let request = ApiRequest::post(REFRESH_PATH)
            .anonymous()
            .no_retry()
            .json(&RefreshTokenRequest { refresh_token })
            .map_err(|e| RefreshFailure::InvalidResponse(e.to_string()))?;

        let response = self
            .dispatch(&request)
            .await
            .map_err(|e| RefreshFailure::Network(e.to_string()))?;

        if response.status.is_server_error() {
            warn!(status = response.status.as_u16(), "Refresh endpoint failed");
            return Err(RefreshFailure::Network(format!(
                "server error {}",
                response.status.as_u16()
            )));
        }

        if !response.status.is_success() {
            let message = server_message(&response.data).unwrap_or_else(|| {
                response
                    .status
                    .canonical_reason()
                    .unwrap_or("refresh rejected")
                    .to_string()
            });
            warn!(
                status = response.status.as_u16(),
                "Refresh token rejected, clearing session"
            );
            self.session.clear();
            return Err(RefreshFailure::Rejected {
                status: response.status,
                message,
            });
        }

        let tokens: TokenResponse = serde_json::from_value(response.data)
            .map_err(|e| RefreshFailure::InvalidResponse(e.to_string()))?;
        self.session.rotate(&tokens);
        info!(
            rotated = tokens.refresh_token.is_some(),
            "Access token refreshed"
        );

        Ok(tokens)
    }

    async fn dispatch(&self, request: &ApiRequest) -> ApiResult<Dispatched> {
        let (headers, sent) = self.build_headers(request)?;
        let url = self.config.url(&request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(value)?),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    form = form.part(part.name.clone(), part.to_part()?);
                }
                builder.multipart(form)
            }
        };

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before a response arrived");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let data = match response.bytes().await {
            Ok(bytes) => parse_body(&response_headers, &bytes),
            Err(e) => {
                warn!(error = %e, "Failed to read response body");
                Value::Null
            }
        };

        debug!(
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        Ok(Dispatched { status, data, sent })
    }

    fn build_headers(&self, request: &ApiRequest) -> ApiResult<(HeaderMap, SentToken)> {
        let mut headers = request.headers.clone();

        if request.is_multipart() {
            // The multipart encoder supplies the boundary-bearing content type.
            headers.remove(CONTENT_TYPE);
        } else if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(demo_user) = &self.config.demo_user {
            if !headers.contains_key(DEMO_USER_HEADER) {
                headers.insert(
                    HeaderName::from_static(DEMO_USER_HEADER),
                    header_value(demo_user)?,
                );
            }
        }

        let sent = if headers.contains_key(AUTHORIZATION) {
            SentToken::Caller
        } else if !request.attach_token {
            SentToken::None
        } else {
            match self.session.access_token() {
                Some(token) => {
                    headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
                    SentToken::Session(token)
                }
                None => SentToken::None,
            }
        };

        Ok((headers, sent))
    }
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::invalid_request(format!("invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::FormPart;
    use storyline_models::TokenResponse;

    fn executor(config: ApiConfig) -> RequestExecutor {
        RequestExecutor::new(config, Arc::new(Session::in_memory())).unwrap()
    }

    fn login(executor: &RequestExecutor, access: &str) {
        executor.session().begin(&TokenResponse {
            access_token: access.to_string(),
            refresh_token: Some("R1".to_string()),
            token_type: None,
        });
    }

    #[test]
    fn test_json_content_type_by_default() {
        let executor = executor(ApiConfig::default());
        let (headers, sent) = executor
            .build_headers(&ApiRequest::get("/api/stories"))
            .unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get(DEMO_USER_HEADER).is_none());
        assert_eq!(sent, SentToken::None);
    }

    #[test]
    fn test_multipart_has_no_json_content_type() {
        let executor = executor(ApiConfig::default());
        let request = ApiRequest::post("/upload")
            .header("content-type", "application/json")
            .unwrap()
            .multipart(vec![FormPart::text("a", "b")]);
        let (headers, _) = executor.build_headers(&request).unwrap();
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_demo_user_header() {
        let executor = executor(ApiConfig::default().with_demo_user("demo-learner"));
        let (headers, _) = executor.build_headers(&ApiRequest::get("/health")).unwrap();
        assert_eq!(headers.get(DEMO_USER_HEADER).unwrap(), "demo-learner");
    }

    #[test]
    fn test_bearer_attached_from_session() {
        let executor = executor(ApiConfig::default());
        login(&executor, "T1");
        let (headers, sent) = executor
            .build_headers(&ApiRequest::get("/api/progress"))
            .unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer T1");
        assert_eq!(sent, SentToken::Session("T1".into()));
    }

    #[test]
    fn test_caller_authorization_wins() {
        let executor = executor(ApiConfig::default());
        login(&executor, "T1");
        let request = ApiRequest::get("/api/progress").bearer("CALLER").unwrap();
        let (headers, sent) = executor.build_headers(&request).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer CALLER");
        assert_eq!(sent, SentToken::Caller);
    }

    #[test]
    fn test_anonymous_request_has_no_bearer() {
        let executor = executor(ApiConfig::default());
        login(&executor, "T1");
        let (headers, _) = executor
            .build_headers(&ApiRequest::post(REFRESH_PATH).anonymous())
            .unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails_fast() {
        let executor = executor(ApiConfig::with_base_url("http://127.0.0.1:9"));
        let result = executor.refresh().await;
        assert_eq!(result.unwrap_err(), RefreshFailure::MissingToken);
    }
}
