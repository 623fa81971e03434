use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::fs;

use crate::dao::{
    models::QuestionEntity,
    question_store::{Provider, QuestionStore},
    storage::{StorageError, StorageResult},
};

/// Failures that can occur while reading or writing the pool file.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// Reading the pool file failed for a reason other than absence.
    #[error("failed to read question pool file `{path}`")]
    Read {
        /// Pool file path.
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The pool file exists but does not contain a valid question array.
    #[error("failed to parse question pool file `{path}`")]
    Parse {
        /// Pool file path.
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// Serializing the pool to JSON failed.
    #[error("failed to serialize question pool")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    /// Writing or renaming the pool file failed.
    #[error("failed to write question pool file `{path}`")]
    Write {
        /// Pool file path.
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<FileStoreError> for StorageError {
    fn from(err: FileStoreError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}

/// Question store persisting the pool as one JSON array on the local disk.
#[derive(Clone)]
pub struct FileQuestionStore {
    path: Arc<PathBuf>,
}

impl FileQuestionStore {
    /// Create a store backed by the given file path. The file is created on
    /// the first write; a missing file reads as an empty pool.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
        }
    }

    async fn read_pool(&self) -> Result<Vec<QuestionEntity>, FileStoreError> {
        let path = self.path.as_ref();
        match fs::read(path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| FileStoreError::Parse {
                    path: path.display().to_string(),
                    source,
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(FileStoreError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Write the pool through a sibling temp file and rename it into place,
    /// so concurrent readers never observe a half-written blob.
    async fn write_pool(&self, questions: &[QuestionEntity]) -> Result<(), FileStoreError> {
        let path = self.path.as_ref();
        let payload = serde_json::to_vec_pretty(questions)
            .map_err(|source| FileStoreError::Serialize { source })?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, payload)
            .await
            .map_err(|source| FileStoreError::Write {
                path: tmp.display().to_string(),
                source,
            })?;
        fs::rename(&tmp, path)
            .await
            .map_err(|source| FileStoreError::Write {
                path: path.display().to_string(),
                source,
            })
    }
}

impl QuestionStore for FileQuestionStore {
    fn load_pool(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.read_pool().await.map_err(Into::into) })
    }

    fn save_pool(&self, questions: Vec<QuestionEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.write_pool(&questions).await.map_err(Into::into) })
    }

    fn delete_question(&self, id: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let mut pool = store.read_pool().await?;
            let before = pool.len();
            pool.retain(|question| question.id != id);
            if pool.len() < before {
                store.write_pool(&pool).await?;
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    fn initialize(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.read_pool().await?;
            Ok(())
        })
    }

    fn provider(&self) -> Provider {
        Provider::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, text: &str) -> QuestionEntity {
        QuestionEntity {
            id: id.into(),
            question: text.into(),
            answer_ai: "ai".into(),
            answer_human: "human".into(),
            source: "test".into(),
            original_question: None,
            original_answer: None,
            is_translated: false,
        }
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stb-pool-{name}-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_pool() {
        let store = FileQuestionStore::new(scratch_path("missing"));
        assert!(store.load_pool().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let path = scratch_path("roundtrip");
        let store = FileQuestionStore::new(path.clone());

        store
            .save_pool(vec![question("q1", "first"), question("q2", "second")])
            .await
            .unwrap();
        let pool = store.load_pool().await.unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].question, "first");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn delete_reports_whether_an_entry_existed() {
        let path = scratch_path("delete");
        let store = FileQuestionStore::new(path.clone());
        store.save_pool(vec![question("q1", "only")]).await.unwrap();

        assert!(store.delete_question("q1".into()).await.unwrap());
        assert!(!store.delete_question("q1".into()).await.unwrap());
        assert!(store.load_pool().await.unwrap().is_empty());

        let _ = std::fs::remove_file(path);
    }
}
