use storyline_core::{ApiError, ApiResult};
use storyline_models::{Profile, UpdateProfileDto};
use tracing::{info, instrument};
use validator::Validate;

use crate::http::{ApiRequest, RequestExecutor};

const PROFILE_PATH: &str = "/api/profile";

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(api))]
    pub async fn get_profile(api: &RequestExecutor) -> ApiResult<Profile> {
        api.execute(&ApiRequest::get(PROFILE_PATH)).await?.decode()
    }

    /// Sends only the fields set on `dto`. An update with nothing set is
    /// rejected locally.
    #[instrument(skip(api))]
    pub async fn update_profile(api: &RequestExecutor, dto: UpdateProfileDto) -> ApiResult<Profile> {
        dto.validate()?;
        if dto.is_empty() {
            return Err(ApiError::invalid_request("Nothing to update"));
        }

        let request = ApiRequest::patch(PROFILE_PATH).json(&dto)?;
        let profile = api.execute(&request).await?.decode()?;
        info!("Profile updated");
        Ok(profile)
    }
}
