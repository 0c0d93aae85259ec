use storyline_core::ApiResult;
use storyline_models::Progress;
use tracing::instrument;

use crate::http::{ApiRequest, RequestExecutor};

pub struct ProgressService;

impl ProgressService {
    #[instrument(skip(api))]
    pub async fn get_progress(api: &RequestExecutor) -> ApiResult<Progress> {
        api.execute(&ApiRequest::get("/api/progress"))
            .await?
            .decode()
    }
}
