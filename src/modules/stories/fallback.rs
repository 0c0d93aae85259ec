//! Built-in demo catalogue served when the backend is unreachable.
//!
//! Only read-only lookups use it. Ids are fixed so a reader can navigate
//! between the listing, a story and its episodes while offline.

use storyline_config::ApiConfig;
use storyline_core::ApiError;
use storyline_models::{Choice, ChoiceId, Episode, EpisodeId, Story, StoryId};

pub const LIGHTHOUSE_ID: StoryId = StoryId::from_u128(0x5101);
pub const MARKET_ID: StoryId = StoryId::from_u128(0x5102);

/// Whether `error` should be answered from the demo catalogue.
pub fn applies(config: &ApiConfig, error: &ApiError) -> bool {
    config.offline_fallback && error.is_outage()
}

pub fn stories() -> Vec<Story> {
    vec![
        Story {
            id: LIGHTHOUSE_ID,
            title: "The Lighthouse Keeper".to_string(),
            description: Some(
                "Keep the lamp burning through a winter storm and decide who to trust."
                    .to_string(),
            ),
            cover_image_url: None,
            episode_count: Some(2),
            is_published: Some(true),
        },
        Story {
            id: MARKET_ID,
            title: "Market Day".to_string(),
            description: Some(
                "Run a stall for a day and learn to balance price, stock and goodwill."
                    .to_string(),
            ),
            cover_image_url: None,
            episode_count: Some(2),
            is_published: Some(true),
        },
    ]
}

pub fn story(id: StoryId) -> Option<Story> {
    stories().into_iter().find(|s| s.id == id)
}

pub fn episode(story_id: StoryId, index: u32) -> Option<Episode> {
    let lighthouse = if story_id == LIGHTHOUSE_ID {
        true
    } else if story_id == MARKET_ID {
        false
    } else {
        return None;
    };

    let (title, content, choices) = match (lighthouse, index) {
        (true, 0) => (
            "The Storm Rolls In",
            "Waves climb the rocks and the lamp flickers. A rowing boat is fighting the swell below.",
            vec![
                choice(0x5111, "Signal the boat toward the cove", Some(1), 10),
                choice(0x5112, "Trim the wick first", Some(1), 5),
            ],
        ),
        (true, 1) => (
            "Morning Light",
            "The storm breaks. The crew climbs the stairs to thank you.",
            Vec::new(),
        ),
        (false, 0) => (
            "Opening the Stall",
            "You have twenty apples and a neighbour already selling them cheaper.",
            vec![
                choice(0x5121, "Match the lower price", Some(1), 5),
                choice(0x5122, "Offer a bundle deal", Some(1), 10),
            ],
        ),
        (false, 1) => (
            "Closing Time",
            "The square empties. You count what is left in the cash box.",
            Vec::new(),
        ),
        _ => return None,
    };

    Some(Episode {
        id: Some(EpisodeId::from_u128(
            story_id.into_inner().as_u128() * 0x10 + u128::from(index),
        )),
        story_id: Some(story_id),
        index,
        title: title.to_string(),
        content: content.to_string(),
        choices,
        quiz_questions: Vec::new(),
    })
}

fn choice(id: u128, text: &str, next: Option<u32>, xp: i32) -> Choice {
    Choice {
        id: ChoiceId::from_u128(id),
        text: text.to_string(),
        next_episode_index: next,
        xp_reward: Some(xp),
    }
}
