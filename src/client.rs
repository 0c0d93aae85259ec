//! The top-level handle a front end holds.

use std::sync::Arc;

use storyline_auth::{FileStorage, Session, TokenStorage};
use storyline_config::{ApiConfig, StorageConfig};
use storyline_core::ApiResult;

use crate::http::RequestExecutor;

/// Owns the [`Session`] and the [`RequestExecutor`] built around it.
///
/// Cloning is cheap and every clone shares the same session, so tokens
/// refreshed through one clone are seen by all of them.
#[derive(Debug, Clone)]
pub struct ApiClient {
    executor: Arc<RequestExecutor>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Arc<Session>) -> ApiResult<Self> {
        Ok(Self {
            executor: Arc::new(RequestExecutor::new(config, session)?),
        })
    }

    /// Client whose session is hydrated from `storage`.
    pub fn with_storage(config: ApiConfig, storage: Arc<dyn TokenStorage>) -> ApiResult<Self> {
        Self::new(config, Arc::new(Session::new(storage)))
    }

    /// Client configured from the environment with a file-backed session.
    pub fn from_env() -> ApiResult<Self> {
        let storage = FileStorage::from_config(&StorageConfig::from_env());
        Self::with_storage(ApiConfig::from_env(), Arc::new(storage))
    }

    pub fn api(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn session(&self) -> &Arc<Session> {
        self.executor.session()
    }

    pub fn config(&self) -> &ApiConfig {
        self.executor.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyline_auth::{MemoryStorage, REFRESH_TOKEN_KEY};

    #[test]
    fn test_clones_share_session() {
        let client = ApiClient::new(ApiConfig::default(), Arc::new(Session::in_memory())).unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(client.session(), clone.session()));
    }

    #[test]
    fn test_with_storage_hydrates_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(REFRESH_TOKEN_KEY, "R1");
        let client = ApiClient::with_storage(ApiConfig::default(), storage).unwrap();
        assert_eq!(client.session().refresh_token().as_deref(), Some("R1"));
        assert!(!client.session().is_authenticated());
    }
}
