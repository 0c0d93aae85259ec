use storyline_core::ApiResult;
use storyline_models::{CreateJournalEntryDto, JournalEntry, JournalEntryId};
use validator::Validate;

use super::service::JournalService;
use crate::http::RequestExecutor;
use crate::state::{OptimisticList, Record, Store, list};

pub type JournalList = OptimisticList<JournalEntry, CreateJournalEntryDto>;

impl Record for JournalEntry {
    type Id = JournalEntryId;

    fn record_id(&self) -> Option<JournalEntryId> {
        Some(self.id)
    }
}

pub async fn reload(api: &RequestExecutor, store: &Store<JournalList>) -> ApiResult<()> {
    let entries = JournalService::list_entries(api).await?;
    store.update(|list| list.replace_saved(entries));
    Ok(())
}

/// Shows the entry as pending while it is saved. Invalid drafts are rejected
/// before the list is touched.
pub async fn add_entry(
    api: &RequestExecutor,
    store: &Store<JournalList>,
    dto: CreateJournalEntryDto,
) -> ApiResult<JournalEntry> {
    dto.validate()?;
    list::create(store, dto.clone(), JournalService::create_entry(api, dto)).await
}
