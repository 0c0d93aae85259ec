//! XP and per-story progress from `GET /api/progress`.

use serde::{Deserialize, Serialize};

use crate::ids::StoryId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default, alias = "xp")]
    pub total_xp: i64,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub stories: Vec<StoryProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryProgress {
    pub story_id: StoryId,
    #[serde(default)]
    pub current_episode_index: u32,
    #[serde(default)]
    pub completed: bool,
}

impl Progress {
    pub fn story(&self, story_id: StoryId) -> Option<&StoryProgress> {
        self.stories.iter().find(|p| p.story_id == story_id)
    }

    pub fn completed_count(&self) -> usize {
        self.stories.iter().filter(|p| p.completed).count()
    }
}
