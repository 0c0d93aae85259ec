//! # Storyline Models
//!
//! Wire types exchanged with the Storyline backend.
//!
//! Response types are lenient: unknown fields are ignored and optional fields
//! default, so the client keeps working while the backend evolves. Request
//! DTOs carry `validator` rules that are checked before anything is sent.
//!
//! # Modules
//!
//! - [`ids`]: Strongly typed identifiers
//! - [`auth`]: Login, registration and token payloads
//! - [`users`]: Identity records and roles
//! - [`stories`]: Stories, episodes, choices and quiz questions
//! - [`progress`]: XP and per-story progress
//! - [`profile`]: Profile records and updates
//! - [`journal`]: Journal entries
//! - [`author`]: Instructor-only authoring DTOs

pub mod auth;
pub mod author;
pub mod ids;
pub mod journal;
pub mod profile;
pub mod progress;
pub mod stories;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse};
pub use author::{
    CreateChoiceDto, CreateEpisodeDto, CreateQuizQuestionDto, CreateStoryDto, UpdateEpisodeDto,
    UpdateStoryDto,
};
pub use ids::{ChoiceId, EpisodeId, JournalEntryId, QuizQuestionId, StoryId, UserId};
pub use journal::{CreateJournalEntryDto, JournalEntry};
pub use profile::{Profile, UpdateProfileDto};
pub use progress::{Progress, StoryProgress};
pub use stories::{Choice, ChoiceOutcome, Episode, QuizQuestion, Story, SubmitChoiceRequest};
pub use users::{Role, User};
