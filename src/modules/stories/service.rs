use serde_json::Value;
use storyline_core::ApiResult;
use storyline_models::{ChoiceId, ChoiceOutcome, Episode, Story, StoryId, SubmitChoiceRequest};
use tracing::{instrument, warn};

use super::fallback;
use crate::http::{ApiRequest, RequestExecutor};

pub struct StoryService;

impl StoryService {
    /// Published stories. Falls back to the demo catalogue on outage.
    #[instrument(skip(api))]
    pub async fn list_stories(api: &RequestExecutor) -> ApiResult<Vec<Story>> {
        let result = async {
            api.execute(&ApiRequest::get("/api/stories"))
                .await?
                .decode_list("stories")
        }
        .await;

        match result {
            Err(e) if fallback::applies(api.config(), &e) => {
                warn!(error = %e, "Backend unavailable, serving demo stories");
                Ok(fallback::stories())
            }
            other => other,
        }
    }

    #[instrument(skip(api))]
    pub async fn get_story(api: &RequestExecutor, story_id: StoryId) -> ApiResult<Story> {
        let result = async {
            api.execute(&ApiRequest::get(format!("/api/stories/{}", story_id)))
                .await?
                .decode()
        }
        .await;

        match result {
            Err(e) if fallback::applies(api.config(), &e) => match fallback::story(story_id) {
                Some(story) => {
                    warn!(error = %e, "Backend unavailable, serving demo story");
                    Ok(story)
                }
                None => Err(e),
            },
            other => other,
        }
    }

    #[instrument(skip(api))]
    pub async fn get_episode(
        api: &RequestExecutor,
        story_id: StoryId,
        index: u32,
    ) -> ApiResult<Episode> {
        let path = format!("/api/stories/{}/episodes/{}", story_id, index);
        let result = async { api.execute(&ApiRequest::get(path)).await?.decode() }.await;

        match result {
            Err(e) if fallback::applies(api.config(), &e) => {
                match fallback::episode(story_id, index) {
                    Some(episode) => {
                        warn!(error = %e, "Backend unavailable, serving demo episode");
                        Ok(episode)
                    }
                    None => Err(e),
                }
            }
            other => other,
        }
    }

    /// Records a choice. With an episode index the episode-scoped endpoint
    /// is used, otherwise the story-scoped one. An empty response body is
    /// an outcome with every field unset.
    #[instrument(skip(api))]
    pub async fn submit_choice(
        api: &RequestExecutor,
        story_id: StoryId,
        choice_id: ChoiceId,
        episode_index: Option<u32>,
    ) -> ApiResult<ChoiceOutcome> {
        let path = match episode_index {
            Some(index) => format!("/api/stories/{}/episodes/{}/choose", story_id, index),
            None => format!("/api/stories/{}/choices", story_id),
        };
        let request = ApiRequest::post(path).json(&SubmitChoiceRequest { choice_id })?;

        let response = api.execute(&request).await?;
        if matches!(response.data, Value::Null | Value::String(_)) {
            return Ok(ChoiceOutcome::default());
        }
        response.decode()
    }
}
