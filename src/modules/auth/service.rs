use reqwest::StatusCode;
use storyline_core::{ApiError, ApiResult, RefreshFailure};
use storyline_models::{LoginRequest, RegisterRequest, TokenResponse, User};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::http::{ApiRequest, DEMO_USER_HEADER, RequestExecutor};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const ME_PATH: &str = "/api/auth/me";
pub const DEMO_TOKEN_PATH: &str = "/api/auth/token";

/// Session lifecycle: sign in, sign out, refresh and startup restore.
pub struct SessionManager;

impl SessionManager {
    /// Exchanges credentials for a token pair, stores it and loads the
    /// identity. Bad credentials surface as [`ApiError::Auth`] with the
    /// server's message. If the identity lookup is refused the new pair is
    /// discarded; if the backend cannot be reached it is kept.
    #[instrument(skip(api, password))]
    pub async fn login(api: &RequestExecutor, email: &str, password: &str) -> ApiResult<User> {
        let dto = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        dto.validate()?;

        let request = ApiRequest::post(LOGIN_PATH)
            .anonymous()
            .no_retry()
            .json(&dto)?;
        let tokens: TokenResponse = api
            .execute(&request)
            .await
            .map_err(ApiError::into_auth)?
            .decode()?;

        api.session().begin(&tokens);
        info!("Logged in");

        Self::load_identity(api).await
    }

    /// Creates an account. The response already carries a token pair, which
    /// is stored exactly as on login.
    #[instrument(skip(api, password))]
    pub async fn register(
        api: &RequestExecutor,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> ApiResult<User> {
        let dto = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };
        dto.validate()?;

        let request = ApiRequest::post(REGISTER_PATH)
            .anonymous()
            .no_retry()
            .json(&dto)?;
        let tokens: TokenResponse = api
            .execute(&request)
            .await
            .map_err(ApiError::into_auth)?
            .decode()?;

        api.session().begin(&tokens);
        info!("Account registered");

        Self::load_identity(api).await
    }

    /// Identity lookup right after a fresh token pair was stored. A refusal
    /// means the pair is unusable and it is dropped again; a transport
    /// failure keeps it so a later `restore` can finish the sign-in.
    async fn load_identity(api: &RequestExecutor) -> ApiResult<User> {
        match Self::current_user(api).await {
            Err(err) if !err.is_network() => {
                warn!(error = %err, "Identity lookup failed, discarding new session");
                api.session().clear();
                Err(err)
            }
            result => result,
        }
    }

    /// Forgets both tokens and the identity. Makes no network call.
    pub fn logout(api: &RequestExecutor) {
        api.session().clear();
    }

    /// Exchanges the stored refresh token for a new access token.
    #[instrument(skip(api))]
    pub async fn refresh(api: &RequestExecutor) -> ApiResult<TokenResponse> {
        Ok(api.refresh().await?)
    }

    /// Loads the identity behind the current access token.
    ///
    /// A 401 is reported as [`ApiError::Auth`] and is not retried here;
    /// callers decide whether to refresh.
    #[instrument(skip(api))]
    pub async fn current_user(api: &RequestExecutor) -> ApiResult<User> {
        if api.session().access_token().is_none() {
            return Err(ApiError::auth(StatusCode::UNAUTHORIZED, "Not signed in"));
        }

        let request = ApiRequest::get(ME_PATH).no_retry();
        let user: User = api
            .execute(&request)
            .await
            .map_err(|e| if e.is_unauthorized() { e.into_auth() } else { e })?
            .decode()?;

        debug!(role = user.role.as_str(), "Identity loaded");
        api.session().set_user(user.clone());
        Ok(user)
    }

    /// Startup sequence.
    ///
    /// - no tokens: stays signed out;
    /// - refresh token only: refreshes, then loads the identity;
    /// - access token: loads the identity, refreshing and retrying once on 401.
    ///
    /// Returns `Ok(None)` when the stored session turned out to be unusable
    /// (it is cleared). Network failures are returned as errors and leave
    /// the stored tokens in place for the next attempt.
    #[instrument(skip(api))]
    pub async fn restore(api: &RequestExecutor) -> ApiResult<Option<User>> {
        let session = api.session();
        let mut refreshed = false;

        if session.access_token().is_none() {
            if session.refresh_token().is_none() {
                debug!("No stored session");
                return Ok(None);
            }
            if !Self::try_refresh(api).await? {
                return Ok(None);
            }
            refreshed = true;
        }

        match Self::current_user(api).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_unauthorized() && !refreshed && session.refresh_token().is_some() => {
                if !Self::try_refresh(api).await? {
                    return Ok(None);
                }
                match Self::current_user(api).await {
                    Ok(user) => Ok(Some(user)),
                    Err(e) if e.is_unauthorized() => Self::abandon(api, &e),
                    Err(e) => Err(e),
                }
            }
            Err(e) if e.is_unauthorized() => Self::abandon(api, &e),
            Err(e) => Err(e),
        }
    }

    /// Requests a token from the demo issuance endpoint and stores it like a
    /// login would.
    #[instrument(skip(api))]
    pub async fn issue_demo_token(
        api: &RequestExecutor,
        demo_user: Option<&str>,
    ) -> ApiResult<TokenResponse> {
        let mut request = ApiRequest::post(DEMO_TOKEN_PATH).anonymous().no_retry();
        if let Some(user) = demo_user {
            request = request.header(DEMO_USER_HEADER, user)?;
        }

        let tokens: TokenResponse = api
            .execute(&request)
            .await
            .map_err(ApiError::into_auth)?
            .decode()?;

        api.session().begin(&tokens);
        info!("Demo token issued");
        Ok(tokens)
    }

    /// `Ok(false)` when the refresh token is missing or was rejected.
    async fn try_refresh(api: &RequestExecutor) -> ApiResult<bool> {
        match api.refresh().await {
            Ok(_) => Ok(true),
            Err(failure @ (RefreshFailure::MissingToken | RefreshFailure::Rejected { .. })) => {
                info!(reason = %failure, "Stored session is no longer valid");
                Ok(false)
            }
            Err(failure) => Err(failure.into()),
        }
    }

    fn abandon(api: &RequestExecutor, error: &ApiError) -> ApiResult<Option<User>> {
        warn!(error = %error, "Identity lookup refused, signing out");
        api.session().clear();
        Ok(None)
    }
}
