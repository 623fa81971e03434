/// Fixed-window rate limiting state.
pub mod rate_limit;
/// Game session domain types and scoring rules.
pub mod session;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::dao::{pool::PoolAdapter, question_store::QuestionStore, session_store::SessionStore};
use crate::state::rate_limit::RateLimiter;

/// Shared handle to the process-wide application state.
pub type SharedState = Arc<AppState>;

/// Central application state holding the selected question store, the
/// session table, and the rate limiter.
///
/// Constructed once at startup and injected into handlers; tests build
/// isolated instances with their own in-memory backends.
pub struct AppState {
    config: AppConfig,
    pool: PoolAdapter,
    sessions: SessionStore,
    limiter: RateLimiter,
}

impl AppState {
    /// Wire the state around the backend chosen at boot.
    pub fn new(config: AppConfig, store: Arc<dyn QuestionStore>) -> SharedState {
        let sessions = SessionStore::new(config.sessions_file.clone());
        Arc::new(Self {
            config,
            pool: PoolAdapter::new(store),
            sessions,
            limiter: RateLimiter::new(),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Question pool contract over the active backend.
    pub fn pool(&self) -> &PoolAdapter {
        &self.pool
    }

    /// Per-session state store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process-wide rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Isolated state for tests: in-memory question store, memory-only
    /// sessions, a fixed admin key.
    #[cfg(test)]
    pub fn for_tests() -> SharedState {
        use crate::dao::question_store::memory::MemoryQuestionStore;

        Self::new(
            AppConfig::for_tests(),
            Arc::new(MemoryQuestionStore::new()),
        )
    }
}
