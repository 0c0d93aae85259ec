//! Stories, episodes and the choices that connect them.

use serde::{Deserialize, Serialize};
use storyline_core::serde::deserialize_optional_index;

use crate::ids::{ChoiceId, EpisodeId, QuizQuestionId, StoryId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub episode_count: Option<u32>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

/// One readable step of a story. `index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub id: Option<EpisodeId>,
    #[serde(default)]
    pub story_id: Option<StoryId>,
    #[serde(default, alias = "episode_index")]
    pub index: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "body")]
    pub content: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    #[serde(alias = "label")]
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_optional_index")]
    pub next_episode_index: Option<u32>,
    #[serde(default)]
    pub xp_reward: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: QuizQuestionId,
    #[serde(alias = "question")]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_option_index: Option<u32>,
}

/// Body of both choice submission endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitChoiceRequest {
    pub choice_id: ChoiceId,
}

/// Result of submitting a choice. Every field is optional; when
/// `next_episode_index` is present it is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOutcome {
    #[serde(
        default,
        alias = "next_index",
        deserialize_with = "deserialize_optional_index"
    )]
    pub next_episode_index: Option<u32>,
    #[serde(default)]
    pub xp_awarded: Option<i64>,
    #[serde(default)]
    pub total_xp: Option<i64>,
    #[serde(default)]
    pub completed: Option<bool>,
}
