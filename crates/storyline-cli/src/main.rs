use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use storyline::ApiClient;
use storyline_cli::commands;
use storyline_config::LogConfig;
use storyline_core::ApiError;
use storyline_models::{
    ChoiceId, CreateChoiceDto, CreateEpisodeDto, CreateQuizQuestionDto, CreateStoryDto, EpisodeId,
    QuizQuestionId, StoryId, UpdateProfileDto,
};

#[derive(Parser)]
#[command(name = "storyline")]
#[command(about = "Storyline CLI - Read, play and author Storyline stories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Name shown to other readers
        #[arg(short = 'n', long)]
        display_name: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Start a session from the demo token endpoint
    DemoToken {
        /// Demo identity (defaults to STORYLINE_DEMO_USER)
        #[arg(short = 'u', long)]
        user: Option<String>,
    },
    /// Check that the backend is reachable
    Health,
    /// List published stories
    Stories,
    /// Show one story
    Story { story_id: StoryId },
    /// Read an episode
    Episode { story_id: StoryId, index: u32 },
    /// Pick a choice in a story
    Choose {
        story_id: StoryId,
        choice_id: ChoiceId,

        /// Episode the choice belongs to
        #[arg(short = 'i', long)]
        episode: Option<u32>,
    },
    /// Show XP and story progress
    Progress,
    /// View or edit your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Read or write journal entries
    #[command(subcommand)]
    Journal(JournalCommand),
    /// Author stories (instructors only)
    #[command(subcommand)]
    Author(AuthorCommand),
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show your profile
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum JournalCommand {
    /// List entries
    List,
    /// Add an entry
    Add {
        content: String,

        /// Story the entry is about
        #[arg(short = 's', long)]
        story: Option<StoryId>,
    },
}

#[derive(Subcommand)]
enum AuthorCommand {
    /// List your stories
    Stories,
    /// Create a story
    CreateStory {
        #[arg(short = 't', long)]
        title: String,
        #[arg(short = 'd', long)]
        description: Option<String>,
        #[arg(long)]
        cover_image_url: Option<String>,
        /// Publish immediately
        #[arg(long)]
        publish: bool,
    },
    /// Delete a story
    DeleteStory { story_id: StoryId },
    /// List a story's episodes
    Episodes { story_id: StoryId },
    /// Add an episode to a story
    CreateEpisode {
        story_id: StoryId,
        #[arg(short = 't', long)]
        title: String,
        #[arg(short = 'c', long)]
        content: String,
        /// Position in the story (appended when omitted)
        #[arg(short = 'i', long)]
        index: Option<u32>,
    },
    /// Delete an episode
    DeleteEpisode {
        story_id: StoryId,
        episode_id: EpisodeId,
    },
    /// List an episode's choices
    Choices {
        story_id: StoryId,
        episode_id: EpisodeId,
    },
    /// Add a choice to an episode
    CreateChoice {
        story_id: StoryId,
        episode_id: EpisodeId,
        #[arg(short = 't', long)]
        text: String,
        /// Episode index the choice leads to
        #[arg(short = 'n', long)]
        next: Option<u32>,
        #[arg(long)]
        xp: Option<i32>,
    },
    /// Delete a choice
    DeleteChoice {
        story_id: StoryId,
        episode_id: EpisodeId,
        choice_id: ChoiceId,
    },
    /// List an episode's quiz questions
    Questions {
        story_id: StoryId,
        episode_id: EpisodeId,
    },
    /// Add a quiz question to an episode
    CreateQuestion {
        story_id: StoryId,
        episode_id: EpisodeId,
        #[arg(short = 'p', long)]
        prompt: String,
        /// Answer option (repeat for each option)
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
        /// Zero-based index of the correct option
        #[arg(short = 'c', long)]
        correct: u32,
    },
    /// Delete a quiz question
    DeleteQuestion {
        story_id: StoryId,
        episode_id: EpisodeId,
        question_id: QuizQuestionId,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    storyline_observability::init_logging(&LogConfig::from_env());

    let cli = Cli::parse();

    let client = match ApiClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("\n❌ Error creating client: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Login { email, password } => commands::login(&client, email, password).await,
        Commands::Register {
            email,
            password,
            display_name,
        } => commands::register(&client, email, password, display_name).await,
        Commands::Logout => {
            commands::logout(&client);
            Ok(())
        }
        Commands::Whoami => commands::whoami(&client).await,
        Commands::DemoToken { user } => commands::demo_token(&client, user).await,
        Commands::Health => commands::health(&client).await,
        Commands::Stories => commands::list_stories(&client).await,
        Commands::Story { story_id } => commands::show_story(&client, story_id).await,
        Commands::Episode { story_id, index } => {
            commands::show_episode(&client, story_id, index).await
        }
        Commands::Choose {
            story_id,
            choice_id,
            episode,
        } => commands::choose(&client, story_id, choice_id, episode).await,
        Commands::Progress => commands::progress(&client).await,
        Commands::Profile(ProfileCommand::Show) => commands::show_profile(&client).await,
        Commands::Profile(ProfileCommand::Update {
            display_name,
            bio,
            avatar_url,
        }) => {
            let dto = UpdateProfileDto {
                display_name,
                bio,
                avatar_url,
            };
            commands::update_profile(&client, dto).await
        }
        Commands::Journal(JournalCommand::List) => commands::list_journal(&client).await,
        Commands::Journal(JournalCommand::Add { content, story }) => {
            commands::add_journal_entry(&client, content, story).await
        }
        Commands::Author(command) => handle_author(&client, command).await,
    };

    if let Err(e) = result {
        let message = e
            .downcast_ref::<ApiError>()
            .map(ApiError::user_message)
            .unwrap_or_else(|| e.to_string());
        eprintln!("\n❌ {}", message);
        std::process::exit(1);
    }
}

async fn handle_author(client: &ApiClient, command: AuthorCommand) -> anyhow::Result<()> {
    match command {
        AuthorCommand::Stories => commands::author_stories(client).await,
        AuthorCommand::CreateStory {
            title,
            description,
            cover_image_url,
            publish,
        } => {
            let dto = CreateStoryDto {
                title,
                description,
                cover_image_url,
                is_published: Some(publish),
            };
            commands::author_create_story(client, dto).await
        }
        AuthorCommand::DeleteStory { story_id } => {
            commands::author_delete_story(client, story_id).await
        }
        AuthorCommand::Episodes { story_id } => commands::author_episodes(client, story_id).await,
        AuthorCommand::CreateEpisode {
            story_id,
            title,
            content,
            index,
        } => {
            let dto = CreateEpisodeDto {
                title,
                content,
                index,
            };
            commands::author_create_episode(client, story_id, dto).await
        }
        AuthorCommand::DeleteEpisode {
            story_id,
            episode_id,
        } => commands::author_delete_episode(client, story_id, episode_id).await,
        AuthorCommand::Choices {
            story_id,
            episode_id,
        } => commands::author_choices(client, story_id, episode_id).await,
        AuthorCommand::CreateChoice {
            story_id,
            episode_id,
            text,
            next,
            xp,
        } => {
            let dto = CreateChoiceDto {
                text,
                next_episode_index: next,
                xp_reward: xp,
            };
            commands::author_create_choice(client, story_id, episode_id, dto).await
        }
        AuthorCommand::DeleteChoice {
            story_id,
            episode_id,
            choice_id,
        } => commands::author_delete_choice(client, story_id, episode_id, choice_id).await,
        AuthorCommand::Questions {
            story_id,
            episode_id,
        } => commands::author_questions(client, story_id, episode_id).await,
        AuthorCommand::CreateQuestion {
            story_id,
            episode_id,
            prompt,
            options,
            correct,
        } => {
            let dto = CreateQuizQuestionDto {
                prompt,
                options,
                correct_option_index: correct,
            };
            commands::author_create_question(client, story_id, episode_id, dto).await
        }
        AuthorCommand::DeleteQuestion {
            story_id,
            episode_id,
            question_id,
        } => commands::author_delete_question(client, story_id, episode_id, question_id).await,
    }
}
