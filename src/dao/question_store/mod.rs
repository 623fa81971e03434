//! Question pool storage backends.
//!
//! One backend is selected at process start and stays fixed for the process
//! lifetime; switching providers is a deploy-time decision, never a runtime
//! migration.

/// Local JSON file backend.
pub mod file;
#[cfg(feature = "kv-store")]
/// Managed key-value (REST, bearer token) backend.
pub mod kv;
/// In-process memory backend.
pub mod memory;
#[cfg(feature = "pg-store")]
/// Relational (PostgreSQL) backend.
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::dao::models::QuestionEntity;
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for the question pool.
///
/// `save_pool` replaces the whole collection; implementations achieve this
/// with a blob overwrite (file, key-value) or delete-then-bulk-insert
/// (relational).
pub trait QuestionStore: Send + Sync {
    /// All persisted questions. Relational backends return newest-first;
    /// blob backends return whatever order was last persisted.
    fn load_pool(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>>;
    /// Replace the persisted collection wholesale.
    fn save_pool(&self, questions: Vec<QuestionEntity>) -> BoxFuture<'static, StorageResult<()>>;
    /// Remove the entry with the given id, reporting whether one existed.
    fn delete_question(&self, id: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// Idempotent setup (schema creation). A no-op everywhere but postgres.
    fn initialize(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap reachability probe used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Which provider this store is.
    fn provider(&self) -> Provider;
}

/// The persistence backend variants a deployment can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Managed relational table, one row per question.
    Postgres,
    /// Managed key-value store holding the pool as one JSON blob.
    KeyValue,
    /// Local JSON file.
    File,
    /// Process-local memory, mainly for tests.
    Memory,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Provider::Postgres => "postgres",
            Provider::KeyValue => "kv",
            Provider::File => "file",
            Provider::Memory => "memory",
        };
        f.write_str(label)
    }
}

/// Pick a backend from the configured priority chain, once, at startup.
///
/// Order: explicit override, relational connection string, key-value
/// credentials, local file. Candidates that are configured but compiled out
/// (or misconfigured) fall through to the next one with a warning, and a
/// forced provider that turns out unusable falls back to the file store
/// with a warning of its own.
pub fn select(config: &StorageConfig) -> Arc<dyn QuestionStore> {
    match config.provider_override.as_deref() {
        Some("memory") => {
            info!(provider = "memory", "question store provider forced");
            return Arc::new(memory::MemoryQuestionStore::new());
        }
        Some("file") => {
            info!(provider = "file", "question store provider forced");
            return Arc::new(file::FileQuestionStore::new(config.questions_file.clone()));
        }
        Some("postgres") => {
            if let Some(store) = postgres_candidate(config) {
                return store;
            }
            warn!("forced postgres provider is unusable; falling back to the file store");
        }
        Some("kv") => {
            if let Some(store) = kv_candidate(config) {
                return store;
            }
            warn!("forced kv provider is unusable; falling back to the file store");
        }
        Some(other) => {
            warn!(provider = other, "unknown provider override; using the auto-detect chain");
            return auto_detect(config);
        }
        None => return auto_detect(config),
    }

    file_store(config)
}

fn auto_detect(config: &StorageConfig) -> Arc<dyn QuestionStore> {
    if let Some(store) = postgres_candidate(config) {
        return store;
    }
    if let Some(store) = kv_candidate(config) {
        return store;
    }
    file_store(config)
}

fn file_store(config: &StorageConfig) -> Arc<dyn QuestionStore> {
    info!(provider = "file", path = %config.questions_file.display(), "selected question store");
    Arc::new(file::FileQuestionStore::new(config.questions_file.clone()))
}

#[cfg(feature = "pg-store")]
fn postgres_candidate(config: &StorageConfig) -> Option<Arc<dyn QuestionStore>> {
    let url = config.database_url.as_deref()?;
    match postgres::PgQuestionStore::connect_lazy(url) {
        Ok(store) => {
            info!(provider = "postgres", "selected question store");
            Some(Arc::new(store))
        }
        Err(err) => {
            warn!(error = %err, "invalid relational connection string; falling through");
            None
        }
    }
}

#[cfg(not(feature = "pg-store"))]
fn postgres_candidate(config: &StorageConfig) -> Option<Arc<dyn QuestionStore>> {
    if config.database_url.is_some() {
        warn!("relational connection string set but the pg-store feature is compiled out");
    }
    None
}

#[cfg(feature = "kv-store")]
fn kv_candidate(config: &StorageConfig) -> Option<Arc<dyn QuestionStore>> {
    let url = config.kv_url.as_deref()?;
    let token = config.kv_token.as_deref()?;
    match kv::KvQuestionStore::new(kv::KvConfig::new(url, token)) {
        Ok(store) => {
            info!(provider = "kv", "selected question store");
            Some(Arc::new(store))
        }
        Err(err) => {
            warn!(error = %err, "failed to build key-value client; falling through");
            None
        }
    }
}

#[cfg(not(feature = "kv-store"))]
fn kv_candidate(config: &StorageConfig) -> Option<Arc<dyn QuestionStore>> {
    if config.kv_url.is_some() {
        warn!("key-value credentials set but the kv-store feature is compiled out");
    }
    None
}
