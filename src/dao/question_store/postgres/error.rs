//! Error types shared by the relational storage implementation.

use thiserror::Error;

/// Convenient result alias returning [`PgDaoError`] failures.
pub type PgResult<T> = Result<T, PgDaoError>;

/// Failures that can occur while interacting with the relational backend.
#[derive(Debug, Error)]
pub enum PgDaoError {
    /// The connection string could not be parsed.
    #[error("invalid relational connection string")]
    InvalidConnectionString {
        #[source]
        source: sqlx::Error,
    },
    /// Schema setup failed.
    #[error("failed to initialize the questions table")]
    Initialize {
        #[source]
        source: sqlx::Error,
    },
    /// A query against the questions table failed.
    #[error("questions table query failed: {operation}")]
    Query {
        /// Which operation was being executed.
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}
