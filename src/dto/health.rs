use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Which persistence provider the process selected at boot.
    pub provider: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(provider: String) -> Self {
        Self {
            status: "ok".to_string(),
            provider,
        }
    }

    /// Create a health response indicating the backend is unreachable.
    pub fn degraded(provider: String) -> Self {
        Self {
            status: "degraded".to_string(),
            provider,
        }
    }
}
