use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the active question backend and report ok or degraded.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let provider = state.pool().provider().to_string();
    match state.pool().health_check().await {
        Ok(()) => HealthResponse::ok(provider),
        Err(err) => {
            warn!(error = %err, provider, "storage health check failed");
            HealthResponse::degraded(provider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn memory_backend_reports_ok() {
        let state = AppState::for_tests();
        let status = health_status(&state).await;
        assert_eq!(status.status, "ok");
        assert_eq!(status.provider, "memory");
    }
}
