//! Instructor-only authoring under `/api/author/stories`.

pub mod service;
pub mod state;

pub use service::AuthorService;
pub use state::{AuthorWorkspace, ChoiceList, EpisodeList, QuizQuestionList, StoryList};
