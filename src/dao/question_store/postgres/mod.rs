mod error;
mod store;

pub use error::{PgDaoError, PgResult};
pub use store::PgQuestionStore;

use crate::dao::storage::StorageError;

impl From<PgDaoError> for StorageError {
    fn from(err: PgDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
