mod config;
mod error;
mod store;

pub use config::KvConfig;
pub use error::{KvDaoError, KvResult};
pub use store::KvQuestionStore;

use crate::dao::storage::StorageError;

impl From<KvDaoError> for StorageError {
    fn from(err: KvDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
