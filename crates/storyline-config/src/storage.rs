//! Session storage configuration.
//!
//! # Environment Variables
//!
//! - `STORYLINE_SESSION_FILE`: JSON file holding the persisted tokens
//!   (default: `storage/session.json`)

use std::env;
use std::path::PathBuf;

pub const DEFAULT_SESSION_FILE: &str = "storage/session.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub session_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            session_file: env::var("STORYLINE_SESSION_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
        }
    }
}
