//! Authoring lists. Creates are optimistic, deletes wait for the server.

use storyline_core::ApiResult;
use storyline_models::{
    Choice, ChoiceId, CreateChoiceDto, CreateEpisodeDto, CreateQuizQuestionDto, CreateStoryDto,
    Episode, EpisodeId, QuizQuestion, QuizQuestionId, Story, StoryId,
};
use validator::Validate;

use super::service::AuthorService;
use crate::http::RequestExecutor;
use crate::state::{OptimisticList, Record, Store, list};

pub type StoryList = OptimisticList<Story, CreateStoryDto>;
pub type EpisodeList = OptimisticList<Episode, CreateEpisodeDto>;
pub type ChoiceList = OptimisticList<Choice, CreateChoiceDto>;
pub type QuizQuestionList = OptimisticList<QuizQuestion, CreateQuizQuestionDto>;

impl Record for Story {
    type Id = StoryId;

    fn record_id(&self) -> Option<StoryId> {
        Some(self.id)
    }
}

impl Record for Episode {
    type Id = EpisodeId;

    fn record_id(&self) -> Option<EpisodeId> {
        self.id
    }
}

impl Record for Choice {
    type Id = ChoiceId;

    fn record_id(&self) -> Option<ChoiceId> {
        Some(self.id)
    }
}

impl Record for QuizQuestion {
    type Id = QuizQuestionId;

    fn record_id(&self) -> Option<QuizQuestionId> {
        Some(self.id)
    }
}

/// The instructor's view: all owned stories, the episodes of the open
/// story, and the choices and quiz questions of the open episode.
#[derive(Debug, Clone, Default)]
pub struct AuthorWorkspace {
    pub stories: Store<StoryList>,
    pub episodes: Store<EpisodeList>,
    pub choices: Store<ChoiceList>,
    pub quiz_questions: Store<QuizQuestionList>,
}

impl AuthorWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_stories(&self, api: &RequestExecutor) -> ApiResult<()> {
        let stories = AuthorService::list_stories(api).await?;
        self.stories.update(|list| list.replace_saved(stories));
        Ok(())
    }

    pub async fn open_story(&self, api: &RequestExecutor, story_id: StoryId) -> ApiResult<()> {
        let episodes = AuthorService::list_episodes(api, story_id).await?;
        self.episodes.update(|list| *list = EpisodeList::from_saved(episodes));
        self.choices.update(|list| *list = ChoiceList::default());
        self.quiz_questions
            .update(|list| *list = QuizQuestionList::default());
        Ok(())
    }

    pub async fn open_episode(
        &self,
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
    ) -> ApiResult<()> {
        let choices = AuthorService::list_choices(api, story_id, episode_id).await?;
        let questions = AuthorService::list_quiz_questions(api, story_id, episode_id).await?;
        self.choices
            .update(|list| *list = ChoiceList::from_saved(choices));
        self.quiz_questions
            .update(|list| *list = QuizQuestionList::from_saved(questions));
        Ok(())
    }

    pub async fn create_story(&self, api: &RequestExecutor, dto: CreateStoryDto) -> ApiResult<Story> {
        dto.validate()?;
        list::create(&self.stories, dto.clone(), AuthorService::create_story(api, dto)).await
    }

    pub async fn delete_story(&self, api: &RequestExecutor, story_id: StoryId) -> ApiResult<()> {
        list::delete(
            &self.stories,
            story_id,
            AuthorService::delete_story(api, story_id),
        )
        .await
    }

    pub async fn create_episode(
        &self,
        api: &RequestExecutor,
        story_id: StoryId,
        dto: CreateEpisodeDto,
    ) -> ApiResult<Episode> {
        dto.validate()?;
        list::create(
            &self.episodes,
            dto.clone(),
            AuthorService::create_episode(api, story_id, dto),
        )
        .await
    }

    pub async fn delete_episode(
        &self,
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
    ) -> ApiResult<()> {
        list::delete(
            &self.episodes,
            episode_id,
            AuthorService::delete_episode(api, story_id, episode_id),
        )
        .await
    }

    pub async fn create_choice(
        &self,
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        dto: CreateChoiceDto,
    ) -> ApiResult<Choice> {
        dto.validate()?;
        list::create(
            &self.choices,
            dto.clone(),
            AuthorService::create_choice(api, story_id, episode_id, dto),
        )
        .await
    }

    pub async fn delete_choice(
        &self,
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        choice_id: ChoiceId,
    ) -> ApiResult<()> {
        list::delete(
            &self.choices,
            choice_id,
            AuthorService::delete_choice(api, story_id, episode_id, choice_id),
        )
        .await
    }

    pub async fn create_quiz_question(
        &self,
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        dto: CreateQuizQuestionDto,
    ) -> ApiResult<QuizQuestion> {
        dto.validate()?;
        list::create(
            &self.quiz_questions,
            dto.clone(),
            AuthorService::create_quiz_question(api, story_id, episode_id, dto),
        )
        .await
    }

    pub async fn delete_quiz_question(
        &self,
        api: &RequestExecutor,
        story_id: StoryId,
        episode_id: EpisodeId,
        question_id: QuizQuestionId,
    ) -> ApiResult<()> {
        list::delete(
            &self.quiz_questions,
            question_id,
            AuthorService::delete_quiz_question(api, story_id, episode_id, question_id),
        )
        .await
    }
}
