//! # Storyline CLI
//!
//! Command handlers behind the `storyline` binary. Each handler restores
//! the stored session first, so tokens saved by `storyline login` are
//! reused (and refreshed) by later invocations.
//!
//! ## Usage
//!
//! ```text
//! storyline login -e reader@example.com
//! storyline stories
//! storyline episode <story-id> 0
//! storyline choose <story-id> <choice-id> --episode 0
//! ```

pub mod commands;
pub mod output;
