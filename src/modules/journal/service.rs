use storyline_core::ApiResult;
use storyline_models::{CreateJournalEntryDto, JournalEntry};
use tracing::instrument;
use validator::Validate;

use crate::http::{ApiRequest, RequestExecutor};

const JOURNAL_PATH: &str = "/api/journal";

pub struct JournalService;

impl JournalService {
    #[instrument(skip(api))]
    pub async fn list_entries(api: &RequestExecutor) -> ApiResult<Vec<JournalEntry>> {
        api.execute(&ApiRequest::get(JOURNAL_PATH))
            .await?
            .decode_list("entries")
    }

    #[instrument(skip(api, dto))]
    pub async fn create_entry(
        api: &RequestExecutor,
        dto: CreateJournalEntryDto,
    ) -> ApiResult<JournalEntry> {
        dto.validate()?;
        let request = ApiRequest::post(JOURNAL_PATH).json(&dto)?;
        api.execute(&request).await?.decode()
    }
}
