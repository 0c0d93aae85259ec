//! Outbound request description.
//!
//! An [`ApiRequest`] owns everything needed to send it, so the executor can
//! rebuild and reissue it after a token refresh.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use storyline_core::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart form data; sent without the JSON content type.
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file<N: Into<String>, F: Into<String>>(name: N, file_name: F, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                mime: None,
                bytes,
            },
        }
    }

    pub fn with_mime<M: Into<String>>(mut self, mime: M) -> Self {
        if let FormValue::File { mime: slot, .. } = &mut self.value {
            *slot = Some(mime.into());
        }
        self
    }

    pub(crate) fn to_part(&self) -> ApiResult<reqwest::multipart::Part> {
        match &self.value {
            FormValue::Text(text) => Ok(reqwest::multipart::Part::text(text.clone())),
            FormValue::File {
                file_name,
                mime,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                match mime {
                    Some(mime) => part
                        .mime_str(mime)
                        .map_err(|e| ApiError::invalid_request(format!("invalid mime type: {}", e))),
                    None => Ok(part),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute API path, e.g. `/api/stories`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
    /// Attach the session's bearer token when the caller set none.
    pub attach_token: bool,
    /// Allow the one-shot refresh and retry on 401.
    pub retry_on_unauthorized: bool,
}

impl ApiRequest {
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            attach_token: true,
            retry_on_unauthorized: true,
        }
    }

    pub fn get<P: Into<String>>(path: P) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post<P: Into<String>>(path: P) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch<P: Into<String>>(path: P) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete<P: Into<String>>(path: P) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> ApiResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::invalid_request(format!("invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::invalid_request(format!("invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Sends an explicit bearer token instead of the session's.
    pub fn bearer(self, token: &str) -> ApiResult<Self> {
        self.header(AUTHORIZATION.as_str(), &format!("Bearer {}", token))
    }

    /// Never attach the session's bearer token.
    pub fn anonymous(mut self) -> Self {
        self.attach_token = false;
        self
    }

    /// Surface a 401 directly instead of refreshing and retrying.
    pub fn no_retry(mut self) -> Self {
        self.retry_on_unauthorized = false;
        self
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, RequestBody::Multipart(_))
    }
}
