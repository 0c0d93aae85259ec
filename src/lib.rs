//! # Storyline
//!
//! A session-aware client for the Storyline interactive learning backend.
//!
//! ## Overview
//!
//! Storyline serves branching stories made of episodes. Readers pick choices
//! to move between episodes and earn XP, keep a journal and a profile.
//! Instructors author stories, episodes, choices and quiz questions.
//!
//! This crate is everything a front end needs to talk to that backend:
//!
//! - **Session management**: login, registration, logout, token refresh and
//!   a startup restore sequence, with tokens persisted across restarts
//! - **Resilient requests**: bearer injection plus a single transparent
//!   refresh-and-retry when an access token expires mid-session
//! - **Optimistic state**: local changes shown immediately and rolled back
//!   when the backend refuses them
//! - **Offline reading**: a built-in demo catalogue when the backend is down
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── client.rs        # ApiClient: session + executor
//! ├── http/            # Request description, executor, response decoding
//! ├── state/           # Store, optimistic helper, optimistic lists
//! └── modules/         # Feature modules
//!     ├── auth/        # SessionManager
//!     ├── stories/     # Reading, choices, demo fallback, play state
//!     ├── progress/    # XP and per-story progress
//!     ├── profile/     # Profile read and update
//!     ├── journal/     # Journal entries
//!     ├── author/      # Instructor authoring
//!     └── health/      # Backend health check
//! ```
//!
//! Each feature module exposes a unit-struct service whose associated
//! functions take the [`RequestExecutor`](http::RequestExecutor), and where
//! the feature mutates lists, a `state.rs` with the optimistic variants.
//!
//! ## Authentication
//!
//! - **Access Token**: attached as `Authorization: Bearer <token>`
//! - **Refresh Token**: exchanged at `POST /api/auth/refresh` when a call
//!   comes back 401
//!
//! A request is retried at most once. A refresh the backend rejects ends the
//! session; observers of [`Session::subscribe`](storyline_auth::Session::subscribe)
//! see it switch to `Anonymous`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use storyline::client::ApiClient;
//! use storyline::modules::{SessionManager, StoryService};
//!
//! # async fn run() -> storyline::storyline_core::ApiResult<()> {
//! let client = ApiClient::from_env()?;
//! SessionManager::restore(client.api()).await?;
//!
//! for story in StoryService::list_stories(client.api()).await? {
//!     println!("{}", story.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STORYLINE_API_URL` | `http://localhost:8000` | Backend base URL |
//! | `STORYLINE_DEMO_USER` | unset | Sent as `X-Demo-User` |
//! | `STORYLINE_TIMEOUT_SECS` | `15` | Per-request timeout |
//! | `STORYLINE_OFFLINE_FALLBACK` | `true` | Demo catalogue on outage |
//! | `STORYLINE_SESSION_FILE` | `storage/session.json` | Token file |
//! | `LOG_LEVEL` | `info` | Default log level |
//! | `LOG_DIR` | unset | Enables daily JSON log files |

pub mod client;
pub mod http;
pub mod modules;
pub mod state;

pub use client::ApiClient;

// Re-export workspace crates for convenience
pub use storyline_auth;
pub use storyline_config;
pub use storyline_core;
pub use storyline_models;
