//! # Storyline Core
//!
//! Core error types and serde helpers shared by every Storyline crate.
//!
//! - [`errors`]: the client error taxonomy ([`ApiError`], [`HttpError`], [`RefreshFailure`])
//! - [`serde`]: lenient deserializers for loosely typed backend fields
//!
//! # Example
//!
//! ```ignore
//! use storyline_core::errors::ApiError;
//!
//! match client.stories().get_story(id).await {
//!     Err(err) if err.is_unauthorized() => prompt_login(),
//!     Err(err) => eprintln!("{}", err.user_message()),
//!     Ok(story) => render(story),
//! }
//! ```

pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{ApiError, ApiResult, HttpError, RefreshFailure, server_message};
