//! Durable token storage.
//!
//! Storage is synchronous and infallible from the caller's point of view:
//! read failures behave like a missing key and write failures are logged
//! and dropped. A broken storage backend therefore degrades to an
//! unauthenticated session instead of an error.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use storyline_config::StorageConfig;
use tracing::{debug, warn};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "storyline.access_token";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "storyline.refresh_token";

/// Synchronous key/value storage for opaque token strings.
pub trait TokenStorage: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().remove(key);
    }
}

/// JSON file holding a flat `{key: value}` object.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written token behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.session_file.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }

    fn update<F>(&self, key: &str, change: F)
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock.lock();
        let mut values = match self.load() {
            Ok(values) => values,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                BTreeMap::new()
            }
        };
        change(&mut values);
        if let Err(e) = self.save(&values) {
            warn!(path = %self.path.display(), key = %key, error = %e, "Failed to persist session value");
        }
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock();
        match self.load() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                warn!(path = %self.path.display(), key = %key, error = %e, "Failed to read session file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        self.update(key, |values| {
            values.insert(key.to_string(), value.to_string());
        });
        debug!(key = %key, "Stored session value");
    }

    fn remove(&self, key: &str) {
        self.update(key, |values| {
            values.remove(key);
        });
        debug!(key = %key, "Removed session value");
    }
}
