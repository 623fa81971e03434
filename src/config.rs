//! Environment-driven application configuration, loaded once at startup.

use std::path::PathBuf;
use std::time::Duration;
use std::env;

use tracing::warn;

/// Default location of the question pool file for the file backend.
const DEFAULT_QUESTIONS_FILE: &str = ".questions-pool.json";
/// Default location of the session mirror file.
const DEFAULT_SESSIONS_FILE: &str = ".game-sessions.json";

/// Admin login attempts allowed per window per client.
pub const LOGIN_MAX_REQUESTS: u32 = 5;
/// Window for admin login attempts.
pub const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);
/// Bulk uploads allowed per window per client.
pub const UPLOAD_MAX_REQUESTS: u32 = 3;
/// Window for bulk uploads.
pub const UPLOAD_WINDOW: Duration = Duration::from_secs(60 * 60);
/// Generic admin API calls allowed per window per client.
pub const ADMIN_API_MAX_REQUESTS: u32 = 20;
/// Window for generic admin API calls.
pub const ADMIN_API_WINDOW: Duration = Duration::from_secs(60 * 60);
/// Delay answered to a bad admin key, blunting brute force.
pub const UNAUTHORIZED_DELAY: Duration = Duration::from_secs(1);
/// How often idle rate-limit identifiers are swept.
pub const RATE_LIMIT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);
/// Maximum questions accepted in one bulk upload.
pub const BULK_UPLOAD_LIMIT: usize = 50;

/// Inputs driving question-store provider selection, read once at boot.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Explicit provider override (`postgres|kv|file|memory`), if set.
    pub provider_override: Option<String>,
    /// Relational connection string; presence selects the postgres backend.
    pub database_url: Option<String>,
    /// REST key-value endpoint; selects the kv backend together with the token.
    pub kv_url: Option<String>,
    /// Bearer token for the key-value endpoint.
    pub kv_token: Option<String>,
    /// Pool file path for the file backend.
    pub questions_file: PathBuf,
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shared secret gating the admin endpoints. `None` disables them.
    pub admin_key: Option<String>,
    /// Session mirror path; `None` keeps sessions memory-only.
    pub sessions_file: Option<PathBuf>,
    /// Question store selection inputs.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        let admin_key = env::var("ADMIN_KEY").ok().filter(|key| !key.is_empty());
        if admin_key.is_none() {
            warn!("ADMIN_KEY is not set; admin endpoints will reject every request");
        }

        // An explicitly empty SESSIONS_FILE disables the durable mirror.
        let sessions_file = match env::var("SESSIONS_FILE") {
            Ok(value) if value.is_empty() => None,
            Ok(value) => Some(PathBuf::from(value)),
            Err(_) => Some(PathBuf::from(DEFAULT_SESSIONS_FILE)),
        };

        let storage = StorageConfig {
            provider_override: env::var("QUESTIONS_PROVIDER")
                .ok()
                .filter(|value| !value.is_empty()),
            database_url: env::var("DATABASE_URL").ok().filter(|value| !value.is_empty()),
            kv_url: env::var("KV_REST_URL").ok().filter(|value| !value.is_empty()),
            kv_token: env::var("KV_REST_TOKEN").ok().filter(|value| !value.is_empty()),
            questions_file: env::var("QUESTIONS_FILE")
                .ok()
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_QUESTIONS_FILE)),
        };

        Self {
            admin_key,
            sessions_file,
            storage,
        }
    }

    /// Configuration for isolated test instances: memory-only sessions, a
    /// known admin key, no durable backends.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            admin_key: Some("test-admin-key".into()),
            sessions_file: None,
            storage: StorageConfig {
                provider_override: Some("memory".into()),
                ..Default::default()
            },
        }
    }
}
