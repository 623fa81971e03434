//! Error types shared by the key-value storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`KvDaoError`] failures.
pub type KvResult<T> = Result<T, KvDaoError>;

/// Failures that can occur while talking to the REST key-value store.
#[derive(Debug, Error)]
pub enum KvDaoError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build key-value client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send key-value request `{path}`")]
    RequestSend {
        /// Request path relative to the base URL.
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The store returned an unexpected status code.
    #[error("unexpected key-value response status {status} for `{path}`")]
    RequestStatus {
        /// Request path relative to the base URL.
        path: String,
        /// Status code returned by the store.
        status: StatusCode,
    },
    /// Response payload could not be parsed.
    #[error("failed to decode key-value response for `{path}`")]
    DecodeResponse {
        /// Request path relative to the base URL.
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The stored blob is not a valid question pool.
    #[error("failed to deserialize stored pool under `{key}`")]
    DeserializeValue {
        /// Key the blob was read from.
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// Serializing the pool before writing failed.
    #[error("failed to serialize pool for key `{key}`")]
    SerializeValue {
        /// Key the blob was meant for.
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
