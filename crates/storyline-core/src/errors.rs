//! Client error taxonomy.
//!
//! Every fallible client operation returns [`ApiError`]. The variants map
//! onto how a caller is expected to react:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`ApiError::Network`] | The request never produced a response |
//! | [`ApiError::Http`] | Non-success status; [`HttpError::unauthorized`] marks a 401 |
//! | [`ApiError::Auth`] | Login, registration or identity lookup was refused |
//! | [`ApiError::Refresh`] | The refresh token was missing or rejected (terminal) |
//! | [`ApiError::Validation`] | Client-side form checks failed, nothing was sent |
//! | [`ApiError::Decode`] | A success body did not match the expected shape |

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

pub type ApiResult<T> = Result<T, ApiError>;

/// A non-success HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    pub status: StatusCode,
    /// Parsed response body (`Value::Null` when it could not be parsed).
    pub body: Value,
    /// Set when the status was exactly 401.
    pub unauthorized: bool,
}

impl HttpError {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            unauthorized: status == StatusCode::UNAUTHORIZED,
        }
    }

    /// Message the server attached to the response, or the status reason.
    pub fn message(&self) -> String {
        server_message(&self.body).unwrap_or_else(|| reason(self.status))
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status.as_u16(), self.message())
    }
}

impl std::error::Error for HttpError {}

/// Why a token refresh could not produce a new access token.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RefreshFailure {
    #[error("no refresh token available")]
    MissingToken,

    #[error("refresh rejected ({}): {message}", .status.as_u16())]
    Rejected { status: StatusCode, message: String },

    #[error("refresh request failed: {0}")]
    Network(String),

    #[error("refresh response was malformed: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    #[error(transparent)]
    Http(HttpError),

    #[error("authentication failed ({}): {message}", .status.as_u16())]
    Auth { status: StatusCode, message: String },

    #[error(transparent)]
    Refresh(#[from] RefreshFailure),

    #[error("{}", format_errors(.0))]
    Validation(#[from] ValidationErrors),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn http(status: StatusCode, body: Value) -> Self {
        Self::Http(HttpError::new(status, body))
    }

    pub fn auth<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Converts an HTTP failure into an [`ApiError::Auth`] carrying the
    /// server's message. Other variants pass through untouched.
    pub fn into_auth(self) -> Self {
        match self {
            Self::Http(err) => Self::Auth {
                message: err.message(),
                status: err.status,
            },
            other => other,
        }
    }

    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(err) => Some(err.status),
            Self::Auth { status, .. } => Some(*status),
            Self::Refresh(RefreshFailure::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// True for 401 responses, including identity lookups and refresh rejections.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Http(err) => err.unauthorized,
            _ => self.status() == Some(StatusCode::UNAUTHORIZED),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Backend unreachable or failing: a transport error or a 5xx response.
    pub fn is_outage(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http(err) => err.status.is_server_error(),
            _ => false,
        }
    }

    /// True when the session can no longer be recovered without a new login.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Self::Refresh(RefreshFailure::MissingToken | RefreshFailure::Rejected { .. })
        )
    }

    /// Short, human readable text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the server. Check your connection.".to_string(),
            Self::Http(err) => err.message(),
            Self::Auth { message, .. } => message.clone(),
            Self::Refresh(_) => "Your session has expired. Please sign in again.".to_string(),
            Self::Validation(errors) => format_errors(errors),
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::InvalidRequest(message) => message.clone(),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self::Http(err)
    }
}

/// Extracts the human readable message from an error body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}`,
/// `{"error": "..."}`, `{"message": "..."}` and plain-text bodies.
pub fn server_message(body: &Value) -> Option<String> {
    match body {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Object(map) => {
            for key in ["detail", "error", "message"] {
                match map.get(key) {
                    Some(Value::String(text)) if !text.is_empty() => return Some(text.clone()),
                    Some(Value::Array(items)) => {
                        let joined = items
                            .iter()
                            .filter_map(|item| {
                                item.get("msg")
                                    .and_then(Value::as_str)
                                    .or_else(|| item.as_str())
                            })
                            .collect::<Vec<_>>()
                            .join(", ");
                        if !joined.is_empty() {
                            return Some(joined);
                        }
                    }
                    Some(nested @ Value::Object(_)) => {
                        if let Some(text) = server_message(nested) {
                            return Some(text);
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>();
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_flags_unauthorized() {
        let err = HttpError::new(StatusCode::UNAUTHORIZED, Value::Null);
        assert!(err.unauthorized);

        let err = HttpError::new(StatusCode::FORBIDDEN, Value::Null);
        assert!(!err.unauthorized);
    }

    #[test]
    fn test_http_error_message_prefers_server_detail() {
        let err = HttpError::new(
            StatusCode::BAD_REQUEST,
            json!({"detail": "Email already registered"}),
        );
        assert_eq!(err.message(), "Email already registered");
        assert_eq!(err.to_string(), "HTTP 400: Email already registered");
    }

    #[test]
    fn test_http_error_message_falls_back_to_reason() {
        let err = HttpError::new(StatusCode::NOT_FOUND, Value::Null);
        assert_eq!(err.message(), "Not Found");
    }

    #[test]
    fn test_server_message_shapes() {
        assert_eq!(
            server_message(&json!({"error": "Invalid email or password"})),
            Some("Invalid email or password".to_string())
        );
        assert_eq!(
            server_message(&json!({"message": "nope"})),
            Some("nope".to_string())
        );
        assert_eq!(
            server_message(&json!({"detail": [{"msg": "field required"}, {"msg": "too short"}]})),
            Some("field required, too short".to_string())
        );
        assert_eq!(
            server_message(&json!("  plain text  ")),
            Some("plain text".to_string())
        );
        assert_eq!(server_message(&json!({"other": 1})), None);
        assert_eq!(server_message(&Value::Null), None);
    }

    #[test]
    fn test_into_auth_carries_server_message() {
        let err = ApiError::http(StatusCode::UNAUTHORIZED, json!({"detail": "Bad credentials"}));
        match err.into_auth() {
            ApiError::Auth { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Bad credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(ApiError::http(StatusCode::UNAUTHORIZED, Value::Null).is_unauthorized());
        assert!(ApiError::auth(StatusCode::UNAUTHORIZED, "expired").is_unauthorized());
        assert!(!ApiError::http(StatusCode::INTERNAL_SERVER_ERROR, Value::Null).is_unauthorized());
        assert!(!ApiError::Refresh(RefreshFailure::MissingToken).is_unauthorized());
    }

    #[test]
    fn test_session_expired_kinds() {
        assert!(ApiError::Refresh(RefreshFailure::MissingToken).is_session_expired());
        assert!(
            ApiError::Refresh(RefreshFailure::Rejected {
                status: StatusCode::UNAUTHORIZED,
                message: "revoked".into(),
            })
            .is_session_expired()
        );
        assert!(!ApiError::Refresh(RefreshFailure::Network("timeout".into())).is_session_expired());
    }

    #[test]
    fn test_is_outage() {
        assert!(ApiError::http(StatusCode::BAD_GATEWAY, Value::Null).is_outage());
        assert!(!ApiError::http(StatusCode::NOT_FOUND, Value::Null).is_outage());
        assert!(!ApiError::auth(StatusCode::UNAUTHORIZED, "no").is_outage());
    }

    #[test]
    fn test_refresh_failure_display() {
        let failure = RefreshFailure::Rejected {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid refresh token".into(),
        };
        assert_eq!(
            failure.to_string(),
            "refresh rejected (401): Invalid refresh token"
        );
    }
}
