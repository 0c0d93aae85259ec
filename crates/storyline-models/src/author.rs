//! Instructor-only authoring DTOs for `/api/author/stories[...]`.
//!
//! Responses reuse [`Story`](crate::stories::Story),
//! [`Episode`](crate::stories::Episode), [`Choice`](crate::stories::Choice)
//! and [`QuizQuestion`](crate::stories::QuizQuestion).

use serde::Serialize;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateStoryDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct UpdateStoryDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateEpisodeDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Position in the story; the backend appends when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct UpdateEpisodeDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateChoiceDto {
    #[validate(length(min = 1, max = 500, message = "Choice text must be 1-500 characters"))]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_episode_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 1000, message = "XP reward must be between 0 and 1000"))]
    pub xp_reward: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[validate(schema(function = "validate_correct_option"))]
pub struct CreateQuizQuestionDto {
    #[validate(length(min = 1, max = 1000, message = "Question must be 1-1000 characters"))]
    pub prompt: String,
    #[validate(length(min = 2, message = "A question needs at least two options"))]
    pub options: Vec<String>,
    pub correct_option_index: u32,
}

fn validate_correct_option(dto: &CreateQuizQuestionDto) -> Result<(), ValidationError> {
    if (dto.correct_option_index as usize) >= dto.options.len() {
        let mut error = ValidationError::new("correct_option_index");
        error.message = Some("Correct option must refer to one of the options".into());
        return Err(error);
    }
    if dto.options.iter().any(|option| option.trim().is_empty()) {
        let mut error = ValidationError::new("options");
        error.message = Some("Options cannot be blank".into());
        return Err(error);
    }
    Ok(())
}
