//! Reading position per story, advanced optimistically.

use std::collections::HashMap;

use storyline_core::ApiResult;
use storyline_models::{ChoiceId, ChoiceOutcome, Progress, StoryId};

use super::service::StoryService;
use crate::http::RequestExecutor;
use crate::state::{Store, optimistic};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayState {
    positions: HashMap<StoryId, u32>,
}

impl PlayState {
    /// Current episode index of `story_id`, if the story was started.
    pub fn position(&self, story_id: StoryId) -> Option<u32> {
        self.positions.get(&story_id).copied()
    }

    pub fn set_position(&mut self, story_id: StoryId, index: u32) {
        self.positions.insert(story_id, index);
    }

    /// Seeds positions from the server's progress record.
    pub fn load_progress(&mut self, progress: &Progress) {
        for story in &progress.stories {
            self.positions
                .insert(story.story_id, story.current_episode_index);
        }
    }

    fn restore(&mut self, story_id: StoryId, previous: Option<u32>) {
        match previous {
            Some(index) => {
                self.positions.insert(story_id, index);
            }
            None => {
                self.positions.remove(&story_id);
            }
        }
    }
}

/// Submits a choice and moves the reader forward.
///
/// The position is bumped by one before the call. A successful response
/// carrying `next_episode_index` overrides the local guess; a failure puts
/// the previous position back.
pub async fn advance(
    api: &RequestExecutor,
    store: &Store<PlayState>,
    story_id: StoryId,
    choice_id: ChoiceId,
    episode_index: Option<u32>,
) -> ApiResult<ChoiceOutcome> {
    optimistic(
        store,
        |state| {
            let previous = state.position(story_id);
            let base = episode_index.or(previous).unwrap_or(0);
            state.set_position(story_id, base.saturating_add(1));
            previous
        },
        StoryService::submit_choice(api, story_id, choice_id, episode_index),
        |state, _, outcome| {
            if let Some(next) = outcome.next_episode_index {
                state.set_position(story_id, next);
            }
        },
        |state, previous| state.restore(story_id, previous),
    )
    .await
}
