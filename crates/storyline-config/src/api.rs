//! Backend connection configuration.
//!
//! # Environment Variables
//!
//! - `STORYLINE_API_URL`: Base URL of the backend (default: `http://localhost:8000`)
//! - `STORYLINE_DEMO_USER`: Value sent as `X-Demo-User` on every request (default: unset)
//! - `STORYLINE_TIMEOUT_SECS`: Per-request timeout in seconds (default: `15`)
//! - `STORYLINE_OFFLINE_FALLBACK`: Serve the built-in demo stories when the
//!   backend is unreachable (default: `true`)

use std::env;
use std::time::Duration;

use crate::parse_bool;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,

    /// Optional demo identity attached as `X-Demo-User`.
    pub demo_user: Option<String>,

    pub timeout: Duration,

    /// Substitute demo content for read-only listings on network failure.
    pub offline_fallback: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            demo_user: None,
            timeout: Duration::from_secs(15),
            offline_fallback: true,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("STORYLINE_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| normalize_base_url(&v))
                .unwrap_or(defaults.base_url),
            demo_user: env::var("STORYLINE_DEMO_USER")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            timeout: env::var("STORYLINE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            offline_fallback: env::var("STORYLINE_OFFLINE_FALLBACK")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.offline_fallback),
        }
    }

    /// Config pointing at `base_url` with every other field defaulted.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    pub fn with_demo_user<S: Into<String>>(mut self, demo_user: S) -> Self {
        self.demo_user = Some(demo_user.into());
        self
    }

    pub fn with_offline_fallback(mut self, enabled: bool) -> Self {
        self.offline_fallback = enabled;
        self
    }

    /// Joins an absolute API path (`/api/...`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
