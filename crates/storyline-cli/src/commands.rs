use anyhow::{Result, bail};
use dialoguer::{Input, Password};
use storyline::ApiClient;
use storyline::modules::author::AuthorWorkspace;
use storyline::modules::journal::{self, JournalList};
use storyline::modules::stories::{self, PlayState};
use storyline::modules::{
    AuthorService, HealthService, JournalService, ProfileService, ProgressService,
    SessionManager, StoryService,
};
use storyline::state::Store;
use storyline_models::{
    ChoiceId, CreateChoiceDto, CreateEpisodeDto, CreateJournalEntryDto, CreateQuizQuestionDto,
    CreateStoryDto, EpisodeId, QuizQuestionId, StoryId, UpdateProfileDto, User,
};
use tracing::debug;

use crate::output;

fn prompt_text(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

fn prompt_password(value: Option<String>, confirm: bool) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords don't match");
    }
    Ok(prompt.interact()?)
}

/// Restores the stored session and requires it to be signed in.
async fn signed_in(client: &ApiClient) -> Result<User> {
    match SessionManager::restore(client.api()).await? {
        Some(user) => Ok(user),
        None => bail!("Not signed in. Run `storyline login` first."),
    }
}

async fn author(client: &ApiClient) -> Result<User> {
    let user = signed_in(client).await?;
    if !user.role.can_author() {
        bail!("Authoring requires an instructor account (signed in as {}).", user.role.as_str());
    }
    Ok(user)
}

pub async fn login(client: &ApiClient, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = prompt_text(email, "Email address")?;
    let password = prompt_password(password, false)?;

    let user = SessionManager::login(client.api(), &email, &password).await?;
    println!("Signed in as {}", output::user(&user));
    Ok(())
}

pub async fn register(
    client: &ApiClient,
    email: Option<String>,
    password: Option<String>,
    display_name: Option<String>,
) -> Result<()> {
    let email = prompt_text(email, "Email address")?;
    let password = prompt_password(password, true)?;

    let user =
        SessionManager::register(client.api(), &email, &password, display_name.as_deref()).await?;
    println!("Account created. Signed in as {}", output::user(&user));
    Ok(())
}

pub fn logout(client: &ApiClient) {
    SessionManager::logout(client.api());
    println!("Signed out");
}

pub async fn whoami(client: &ApiClient) -> Result<()> {
    match SessionManager::restore(client.api()).await? {
        Some(user) => println!("{}", output::user(&user)),
        None => println!("Not signed in"),
    }
    Ok(())
}

pub async fn demo_token(client: &ApiClient, demo_user: Option<String>) -> Result<()> {
    let demo_user = demo_user.or_else(|| client.config().demo_user.clone());
    SessionManager::issue_demo_token(client.api(), demo_user.as_deref()).await?;
    println!("Demo session started");
    Ok(())
}

pub async fn health(client: &ApiClient) -> Result<()> {
    let status = HealthService::check(client.api()).await?;
    println!(
        "{} is up ({} ms): {}",
        client.config().base_url,
        status.latency.as_millis(),
        status.body
    );
    Ok(())
}

pub async fn list_stories(client: &ApiClient) -> Result<()> {
    // Reading works signed out, and offline through the demo catalogue.
    if let Err(e) = SessionManager::restore(client.api()).await {
        debug!(error = %e, "Continuing without a restored session");
    }
    let stories = StoryService::list_stories(client.api()).await?;
    if stories.is_empty() {
        println!("No stories yet");
    }
    for story in &stories {
        println!("{}", output::story_line(story));
    }
    Ok(())
}

pub async fn show_story(client: &ApiClient, story_id: StoryId) -> Result<()> {
    if let Err(e) = SessionManager::restore(client.api()).await {
        debug!(error = %e, "Continuing without a restored session");
    }
    let story = StoryService::get_story(client.api(), story_id).await?;
    println!("{}", output::story(&story));
    Ok(())
}

pub async fn show_episode(client: &ApiClient, story_id: StoryId, index: u32) -> Result<()> {
    if let Err(e) = SessionManager::restore(client.api()).await {
        debug!(error = %e, "Continuing without a restored session");
    }
    let episode = StoryService::get_episode(client.api(), story_id, index).await?;
    println!("{}", output::episode(&episode));
    Ok(())
}

pub async fn choose(
    client: &ApiClient,
    story_id: StoryId,
    choice_id: ChoiceId,
    episode_index: Option<u32>,
) -> Result<()> {
    signed_in(client).await?;

    let play = Store::new(PlayState::default());
    let outcome =
        stories::advance(client.api(), &play, story_id, choice_id, episode_index).await?;
    println!("{}", output::outcome(&outcome));

    if outcome.completed != Some(true) {
        if let Some(position) = play.read(|state| state.position(story_id)) {
            println!("Continue with: storyline episode {} {}", story_id, position);
        }
    }
    Ok(())
}

pub async fn progress(client: &ApiClient) -> Result<()> {
    signed_in(client).await?;
    let progress = ProgressService::get_progress(client.api()).await?;
    println!("{}", output::progress(&progress));
    Ok(())
}

pub async fn show_profile(client: &ApiClient) -> Result<()> {
    signed_in(client).await?;
    let profile = ProfileService::get_profile(client.api()).await?;
    println!("{}", output::profile(&profile));
    Ok(())
}

pub async fn update_profile(client: &ApiClient, dto: UpdateProfileDto) -> Result<()> {
    signed_in(client).await?;
    let profile = ProfileService::update_profile(client.api(), dto).await?;
    println!("{}", output::profile(&profile));
    Ok(())
}

pub async fn list_journal(client: &ApiClient) -> Result<()> {
    signed_in(client).await?;
    let entries = JournalService::list_entries(client.api()).await?;
    if entries.is_empty() {
        println!("Journal is empty");
    }
    for entry in &entries {
        println!("{}", output::journal_entry(entry));
    }
    Ok(())
}

pub async fn add_journal_entry(
    client: &ApiClient,
    content: String,
    story_id: Option<StoryId>,
) -> Result<()> {
    signed_in(client).await?;
    let store = Store::new(JournalList::default());
    let entry = journal::add_entry(
        client.api(),
        &store,
        CreateJournalEntryDto { content, story_id },
    )
    .await?;
    println!("Saved: {}", output::journal_entry(&entry));
    Ok(())
}

pub async fn author_stories(client: &ApiClient) -> Result<()> {
    author(client).await?;
    for story in AuthorService::list_stories(client.api()).await? {
        println!("{}", output::story_line(&story));
    }
    Ok(())
}

pub async fn author_create_story(client: &ApiClient, dto: CreateStoryDto) -> Result<()> {
    author(client).await?;
    let story = AuthorWorkspace::new()
        .create_story(client.api(), dto)
        .await?;
    println!("Created {}", output::story_line(&story));
    Ok(())
}

pub async fn author_delete_story(client: &ApiClient, story_id: StoryId) -> Result<()> {
    author(client).await?;
    AuthorService::delete_story(client.api(), story_id).await?;
    println!("Deleted story {}", story_id);
    Ok(())
}

pub async fn author_episodes(client: &ApiClient, story_id: StoryId) -> Result<()> {
    author(client).await?;
    for episode in AuthorService::list_episodes(client.api(), story_id).await? {
        let id = episode
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {}: {}", id, episode.index, episode.title);
    }
    Ok(())
}

pub async fn author_create_episode(
    client: &ApiClient,
    story_id: StoryId,
    dto: CreateEpisodeDto,
) -> Result<()> {
    author(client).await?;
    let episode = AuthorWorkspace::new()
        .create_episode(client.api(), story_id, dto)
        .await?;
    println!("Created episode {}: {}", episode.index, episode.title);
    Ok(())
}

pub async fn author_delete_episode(
    client: &ApiClient,
    story_id: StoryId,
    episode_id: EpisodeId,
) -> Result<()> {
    author(client).await?;
    AuthorService::delete_episode(client.api(), story_id, episode_id).await?;
    println!("Deleted episode {}", episode_id);
    Ok(())
}

pub async fn author_choices(
    client: &ApiClient,
    story_id: StoryId,
    episode_id: EpisodeId,
) -> Result<()> {
    author(client).await?;
    for choice in AuthorService::list_choices(client.api(), story_id, episode_id).await? {
        println!("{}", output::choice_line(&choice));
    }
    Ok(())
}

pub async fn author_create_choice(
    client: &ApiClient,
    story_id: StoryId,
    episode_id: EpisodeId,
    dto: CreateChoiceDto,
) -> Result<()> {
    author(client).await?;
    let choice = AuthorWorkspace::new()
        .create_choice(client.api(), story_id, episode_id, dto)
        .await?;
    println!("Created {}", output::choice_line(&choice));
    Ok(())
}

pub async fn author_delete_choice(
    client: &ApiClient,
    story_id: StoryId,
    episode_id: EpisodeId,
    choice_id: ChoiceId,
) -> Result<()> {
    author(client).await?;
    AuthorService::delete_choice(client.api(), story_id, episode_id, choice_id).await?;
    println!("Deleted choice {}", choice_id);
    Ok(())
}

pub async fn author_questions(
    client: &ApiClient,
    story_id: StoryId,
    episode_id: EpisodeId,
) -> Result<()> {
    author(client).await?;
    for question in AuthorService::list_quiz_questions(client.api(), story_id, episode_id).await? {
        println!("{}", output::quiz_question(&question));
    }
    Ok(())
}

pub async fn author_create_question(
    client: &ApiClient,
    story_id: StoryId,
    episode_id: EpisodeId,
    dto: CreateQuizQuestionDto,
) -> Result<()> {
    author(client).await?;
    let question = AuthorWorkspace::new()
        .create_quiz_question(client.api(), story_id, episode_id, dto)
        .await?;
    println!("Created {}", output::quiz_question(&question));
    Ok(())
}

pub async fn author_delete_question(
    client: &ApiClient,
    story_id: StoryId,
    episode_id: EpisodeId,
    question_id: QuizQuestionId,
) -> Result<()> {
    author(client).await?;
    AuthorService::delete_quiz_question(client.api(), story_id, episode_id, question_id).await?;
    println!("Deleted quiz question {}", question_id);
    Ok(())
}
