use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    models::QuestionEntity,
    question_store::{Provider, QuestionStore},
    storage::StorageResult,
};

/// Question store keeping the pool in process memory.
///
/// Contents are lost on restart; used by tests and by deployments that
/// explicitly opt out of durable storage.
#[derive(Clone, Default)]
pub struct MemoryQuestionStore {
    pool: Arc<RwLock<Vec<QuestionEntity>>>,
}

impl MemoryQuestionStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuestionStore for MemoryQuestionStore {
    fn load_pool(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.pool.read().await.clone()) })
    }

    fn save_pool(&self, questions: Vec<QuestionEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            *store.pool.write().await = questions;
            Ok(())
        })
    }

    fn delete_question(&self, id: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let mut pool = store.pool.write().await;
            let before = pool.len();
            pool.retain(|question| question.id != id);
            Ok(pool.len() < before)
        })
    }

    fn initialize(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn provider(&self) -> Provider {
        Provider::Memory
    }
}
