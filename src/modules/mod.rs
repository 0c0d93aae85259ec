pub mod auth;
pub mod author;
pub mod health;
pub mod journal;
pub mod profile;
pub mod progress;
pub mod stories;

pub use self::auth::SessionManager;
pub use self::author::AuthorService;
pub use self::health::HealthService;
pub use self::journal::JournalService;
pub use self::profile::ProfileService;
pub use self::progress::ProgressService;
pub use self::stories::StoryService;
