//! # Storyline Config
//!
//! Configuration types for the Storyline client.
//!
//! Every structure is loaded from environment variables (after `.env` has been
//! read by the binary) and falls back to development defaults:
//!
//! - [`api`]: backend location, demo identity, timeouts, offline fallback
//! - [`storage`]: where the session tokens are persisted
//! - [`logging`]: log level and optional log directory
//!
//! # Example
//!
//! ```ignore
//! use storyline_config::{ApiConfig, LogConfig, StorageConfig};
//!
//! let api = ApiConfig::from_env();
//! let storage = StorageConfig::from_env();
//! let logging = LogConfig::from_env();
//! ```

pub mod api;
pub mod logging;
pub mod storage;

// Re-export commonly used types at crate root
pub use api::ApiConfig;
pub use logging::LogConfig;
pub use storage::StorageConfig;

/// Interprets common truthy/falsy spellings. Unknown values yield `None`.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
