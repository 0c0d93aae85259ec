use storyline_core::ApiResult;
use storyline_models::{
    Choice, ChoiceId, CreateChoiceDto, CreateEpisodeDto, CreateQuizQuestionDto, CreateStoryDto,
    Episode, EpisodeId, QuizQuestion, QuizQuestionId, Story, StoryId, UpdateEpisodeDto,
    UpdateStoryDto,
};
use tracing::{info, instrument};
use validator::Validate;

use crate::http::{ApiRequest, RequestExecutor};

const STORIES_PATH: &str = "/api/author/stories";

fn story_path(story_id: StoryId) -> String {
    format!("{}/{}", STORIES_PATH, story_id)
}

fn episodes_path(story_id: StoryId) -> String {
    format!("{}/episodes", story_path(story_id))
}

fn episode_path(story_id: StoryId, episode_id: EpisodeId) -> String {
    format!("{}/{}", episodes_path(story_id), episode_id)
}

fn choices_path(story_id: StoryId, episode_id: EpisodeId) -> String {
    format!("{}/choices", episode_path(story_id, episode_id))
}

fn quiz_questions_path(story_id: StoryId, episode_id: EpisodeId) -> String {
    format!("{}/quiz-questions", episode_path(story_id, episode_id))
}

pub struct AuthorService;

impl AuthorService {
    // Stories

    #[instrument(skip(api))]
    pub async fn list_stories(api: &RequestExecutor) -> ApiResult<Vec<Story>> {
        api.execute(&ApiRequest::get(STORIES_PATH))
            .await?
            .decode_list("stories")
    }

    #[instrument(skip(api))]
    pub async fn get_story(api: &RequestExecutor, story_id: StoryId) -> ApiResult<Story> {
        api.execute(&ApiRequest::get(story_path(story_id)))
            .await?
            .decode()
    }

    #[instrument(skip(api))]
    pub async fn create_story(api: &RequestExecutor, dto: CreateStoryDto) -> ApiResult<Story> {
        dto.validate()?;
        let request = ApiRequest::post(STORIES_PATH).json(&dto)?;
        let story: Story = api.execute(&request).await?.decode()?;
        info!(story_id = %story.id, "Story created");
        Ok(story)
    }

    #[instrument(skip(api))]
    pub async fn update_story(
        api: &RequestExecutor,
        story_id: StoryId,
        dto: UpdateStoryDto,
    ) -> ApiResult<Story> {
        dto.validate()?;
        let request = ApiRequest::patch(story_path(story_id)).json(&dto)?;
        api.execute(&request).await?.decode()
    }

    #[instrument(skip(api))]
    pub async fn delete_story(api: &RequestExecutor, story_id: StoryId) -> ApiResult<()> {
        api.execute(&ApiRequest::delete(story_path(story_id)))
            .await?;
        info!(story_id = %story_id, "Story deleted");
        Ok(())
    }

    // Episodes

    #[instrument(skip(api))]
    pub async fn list_episodes(api: &RequestExecutor, story_id: StoryId) -> ApiResult<Vec<Episode>> {
        api.execute(&ApiRequest::get(episodes_path(story_id)))
            .await?
            .decode_list("episodes")
    }

    #[instrument(skip(api, dto))]
    pub async fn create_episode(
        api: &RequestExecutor,
        story_id: StoryId,
        dto: CreateEpisodeDto,
    ) -> ApiResult<Episode> {
        dto.validate()?;
        let request = ApiRequest::post(episodes_path(story_id)).json(&dto)?;
        api.execute(&request).await?.decode()
    }

    #[instrument(skip(api, dto))]
    pub async fn update_episode(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        dto: UpdateEpisodeDto,
    ) -> ApiResult<Episode> {
        dto.validate()?;
        let request = ApiRequest::patch(episode_path(story_id, episode_id)).json(&dto)?;
        api.execute(&request).await?.decode()
    }

    #[instrument(skip(api))]
    pub async fn delete_episode(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
    ) -> ApiResult<()> {
        api.execute(&ApiRequest::delete(episode_path(story_id, episode_id)))
            .await?;
        Ok(())
    }

    // Choices

    #[instrument(skip(api))]
    pub async fn list_choices(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
    ) -> ApiResult<Vec<Choice>> {
        api.execute(&ApiRequest::get(choices_path(story_id, episode_id)))
            .await?
            .decode_list("choices")
    }

    #[instrument(skip(api))]
    pub async fn create_choice(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        dto: CreateChoiceDto,
    ) -> ApiResult<Choice> {
        dto.validate()?;
        let request = ApiRequest::post(choices_path(story_id, episode_id)).json(&dto)?;
        api.execute(&request).await?.decode()
    }

    #[instrument(skip(api))]
    pub async fn delete_choice(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        choice_id: ChoiceId,
    ) -> ApiResult<()> {
        let path = format!("{}/{}", choices_path(story_id, episode_id), choice_id);
        api.execute(&ApiRequest::delete(path)).await?;
        Ok(())
    }

    // Quiz questions

    #[instrument(skip(api))]
    pub async fn list_quiz_questions(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
    ) -> ApiResult<Vec<QuizQuestion>> {
        api.execute(&ApiRequest::get(quiz_questions_path(story_id, episode_id)))
            .await?
            .decode_list("quiz_questions")
    }

    #[instrument(skip(api))]
    pub async fn create_quiz_question(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        dto: CreateQuizQuestionDto,
    ) -> ApiResult<QuizQuestion> {
        dto.validate()?;
        let request = ApiRequest::post(quiz_questions_path(story_id, episode_id)).json(&dto)?;
        api.execute(&request).await?.decode()
    }

    #[instrument(skip(api))]
    pub async fn delete_quiz_question(
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        question_id: QuizQuestionId,
    ) -> ApiResult<()> {
        let path = format!(
            "{}/{}",
            quiz_questions_path(story_id, episode_id),
            question_id
        );
        api.execute(&ApiRequest::delete(path)).await?;
        Ok(())
    }
}
