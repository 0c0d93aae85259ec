use std::time::{Duration, Instant};

use serde_json::Value;
use storyline_core::ApiResult;
use tracing::instrument;

use crate::http::{ApiRequest, RequestExecutor};

#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    /// Whatever the backend answered with, JSON or text.
    pub body: Value,
    pub latency: Duration,
}

pub struct HealthService;

impl HealthService {
    /// Pings `GET /health` without credentials.
    #[instrument(skip(api))]
    pub async fn check(api: &RequestExecutor) -> ApiResult<HealthStatus> {
        let started = Instant::now();
        let request = ApiRequest::get("/health").anonymous().no_retry();
        let response = api.execute(&request).await?;

        Ok(HealthStatus {
            body: response.data,
            latency: started.elapsed(),
        })
    }
}
