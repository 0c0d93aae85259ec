pub mod service;

pub use service::{HealthService, HealthStatus};
