//! HTTP plumbing shared by every feature module.

pub mod executor;
pub mod request;
pub mod response;

pub use executor::{DEMO_USER_HEADER, REFRESH_PATH, RequestExecutor};
pub use request::{ApiRequest, FormPart, FormValue, RequestBody};
pub use response::ApiResponse;
