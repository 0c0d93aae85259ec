use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use serde_json::Value;
use storyline_core::ApiResult;

/// A successful response: parsed body plus status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = Value> {
    pub data: T,
    pub status: StatusCode,
}

impl ApiResponse<Value> {
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        Ok(serde_json::from_value(self.data)?)
    }

    /// Decodes a collection that may arrive bare (`[...]`) or wrapped
    /// (`{"<key>": [...]}`, `{"items": [...]}`, `{"data": [...]}`).
    pub fn decode_list<T: DeserializeOwned>(self, key: &str) -> ApiResult<Vec<T>> {
        decode_list(self.data, key)
    }
}

pub(crate) fn decode_list<T: DeserializeOwned>(data: Value, key: &str) -> ApiResult<Vec<T>> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => {
            let inner = [key, "items", "data", "results"]
                .iter()
                .find_map(|k| map.remove(*k))
                .unwrap_or(Value::Array(Vec::new()));
            Ok(serde_json::from_value(inner)?)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}

/// Parses a body by declared content type. Unparseable bodies become `Null`.
pub(crate) fn parse_body(headers: &HeaderMap, bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    } else {
        std::str::from_utf8(bytes)
            .map(|text| Value::String(text.to_string()))
            .unwrap_or(Value::Null)
    }
}
