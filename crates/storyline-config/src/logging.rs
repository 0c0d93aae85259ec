//! Logging configuration.
//!
//! # Environment Variables
//!
//! - `LOG_LEVEL`: Level for the Storyline crates when `RUST_LOG` is unset (default: `info`)
//! - `LOG_DIR`: When set, structured JSON logs are also written to a daily
//!   rolling file in this directory

use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_dir: env::var("LOG_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Default filter directive: Storyline crates at `level`, HTTP stack at warn.
    pub fn default_directive(&self) -> String {
        format!(
            "storyline={level},storyline_auth={level},storyline_cli={level},reqwest=warn,hyper=warn,hyper_util=warn",
            level = self.level
        )
    }
}
