//! # Storyline Auth
//!
//! Session state and durable token storage for the Storyline client.
//!
//! - [`storage`]: synchronous key/value token storage (file backed or in memory)
//! - [`session`]: the [`Session`] object holding the live token pair and identity
//!
//! # Token Types
//!
//! - **Access Token**: short-lived bearer credential sent on every request
//! - **Refresh Token**: longer-lived credential exchanged for a new access token
//!
//! Both are opaque strings; the client never inspects them.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use storyline_auth::{FileStorage, Session};
//! use storyline_config::StorageConfig;
//!
//! let storage = FileStorage::new(StorageConfig::from_env().session_file);
//! let session = Arc::new(Session::new(Arc::new(storage)));
//!
//! if session.refresh_token().is_some() {
//!     // restore the previous session
//! }
//! ```

pub mod session;
pub mod storage;

// Re-export commonly used types at crate root
pub use session::{AuthState, Session};
pub use storage::{
    ACCESS_TOKEN_KEY, FileStorage, MemoryStorage, REFRESH_TOKEN_KEY, TokenStorage,
};
