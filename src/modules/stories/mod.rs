pub mod fallback;
pub mod service;
pub mod state;

pub use service::StoryService;
pub use state::{PlayState, advance};
