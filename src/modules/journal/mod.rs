pub mod service;
pub mod state;

pub use service::JournalService;
pub use state::{JournalList, add_entry, reload};
