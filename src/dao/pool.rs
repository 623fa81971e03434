use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::dao::{
    models::{QuestionEntity, QuestionPatch},
    question_store::{Provider, QuestionStore},
    storage::StorageResult,
};

/// Uniform question-pool contract over whichever backend was selected at
/// startup.
///
/// Policy: read paths serving the game are tolerant (backend failures log
/// and degrade to an empty result), write paths are strict (`save_pool`,
/// `clear_pool`, `add_questions` and `update_question` propagate errors so
/// callers know persistence did not happen). The read feeding a
/// read-merge-write is strict too: a failed read must not masquerade as an
/// empty pool and wipe the existing entries on the following save.
/// `delete_question` is the one write that degrades, reporting `false` on
/// failure, matching its boolean contract.
///
/// All writes are serialized through one process-wide lock so the
/// read-merge-write in `add_questions` can never interleave with another
/// write and drop its result.
#[derive(Clone)]
pub struct PoolAdapter {
    store: Arc<dyn QuestionStore>,
    write_lock: Arc<Mutex<()>>,
}

impl PoolAdapter {
    /// Wrap the selected backend.
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Which backend this adapter runs on.
    pub fn provider(&self) -> Provider {
        self.store.provider()
    }

    /// All persisted questions; an unreachable backend reads as empty.
    pub async fn load_pool(&self) -> Vec<QuestionEntity> {
        match self.store.load_pool().await {
            Ok(pool) => pool,
            Err(err) => {
                warn!(provider = %self.provider(), error = %err, "failed to load question pool; treating as empty");
                Vec::new()
            }
        }
    }

    /// Replace the persisted collection wholesale.
    pub async fn save_pool(&self, questions: Vec<QuestionEntity>) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let count = questions.len();
        self.store.save_pool(questions).await?;
        info!(provider = %self.provider(), count, "question pool saved");
        Ok(())
    }

    /// Merge new questions into the pool, skipping any whose `question`
    /// text already exists (exact, case-sensitive). Returns the merged
    /// pool.
    pub async fn add_questions(
        &self,
        new_questions: Vec<QuestionEntity>,
    ) -> StorageResult<Vec<QuestionEntity>> {
        let _guard = self.write_lock.lock().await;
        let mut merged = self.store.load_pool().await?;
        let mut seen: HashSet<String> = merged
            .iter()
            .map(|question| question.question.clone())
            .collect();

        let offered = new_questions.len();
        for question in new_questions {
            if seen.insert(question.question.clone()) {
                merged.push(question);
            }
        }

        self.store.save_pool(merged.clone()).await?;
        info!(
            provider = %self.provider(),
            offered,
            total = merged.len(),
            "questions merged into pool"
        );
        Ok(merged)
    }

    /// Apply a per-field patch to the question with the given id; `None`
    /// when no such question exists (nothing is written then).
    pub async fn update_question(
        &self,
        id: &str,
        patch: QuestionPatch,
    ) -> StorageResult<Option<QuestionEntity>> {
        let _guard = self.write_lock.lock().await;
        let mut pool = self.store.load_pool().await?;
        let Some(entry) = pool.iter_mut().find(|question| question.id == id) else {
            return Ok(None);
        };
        patch.apply(entry);
        let updated = entry.clone();
        self.store.save_pool(pool).await?;
        info!(provider = %self.provider(), id, "question updated");
        Ok(Some(updated))
    }

    /// Persist an empty collection.
    pub async fn clear_pool(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.save_pool(Vec::new()).await?;
        info!(provider = %self.provider(), "question pool cleared");
        Ok(())
    }

    /// Remove the question with the given id; `false` when absent or when
    /// the backend failed.
    pub async fn delete_question(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;
        match self.store.delete_question(id.to_owned()).await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(provider = %self.provider(), error = %err, id, "failed to delete question");
                false
            }
        }
    }

    /// Idempotent backend setup (schema creation on postgres).
    pub async fn initialize(&self) -> StorageResult<()> {
        self.store.initialize().await
    }

    /// Probe the backend for the health endpoint.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::dao::question_store::memory::MemoryQuestionStore;
    use crate::dao::storage::StorageError;

    fn adapter() -> PoolAdapter {
        PoolAdapter::new(Arc::new(MemoryQuestionStore::new()))
    }

    /// Memory-backed store whose reads can be switched to fail, standing in
    /// for a backend with a transient outage.
    #[derive(Clone, Default)]
    struct FlakyReadStore {
        inner: MemoryQuestionStore,
        fail_reads: Arc<AtomicBool>,
    }

    impl QuestionStore for FlakyReadStore {
        fn load_pool(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
            let store = self.clone();
            Box::pin(async move {
                if store.fail_reads.load(Ordering::SeqCst) {
                    return Err(StorageError::unavailable(
                        "backend read failed".into(),
                        std::io::Error::other("backend offline"),
                    ));
                }
                store.inner.load_pool().await
            })
        }

        fn save_pool(
            &self,
            questions: Vec<QuestionEntity>,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.save_pool(questions)
        }

        fn delete_question(&self, id: String) -> BoxFuture<'static, StorageResult<bool>> {
            self.inner.delete_question(id)
        }

        fn initialize(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.initialize()
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.health_check()
        }

        fn provider(&self) -> Provider {
            Provider::Memory
        }
    }

    fn question(id: &str, text: &str) -> QuestionEntity {
        QuestionEntity {
            id: id.into(),
            question: text.into(),
            answer_ai: "ai answer".into(),
            answer_human: "human answer".into(),
            source: "test".into(),
            original_question: None,
            original_answer: None,
            is_translated: false,
        }
    }

    #[tokio::test]
    async fn add_questions_skips_duplicate_question_text() {
        let pool = adapter();
        pool.add_questions(vec![question("a", "What is rust?")])
            .await
            .unwrap();
        let merged = pool
            .add_questions(vec![
                question("b", "What is rust?"),
                question("c", "What is oxidation?"),
            ])
            .await
            .unwrap();

        assert_eq!(merged.len(), 2);
        let texts: Vec<_> = merged.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["What is rust?", "What is oxidation?"]);
    }

    #[tokio::test]
    async fn duplicate_detection_is_case_sensitive() {
        let pool = adapter();
        let merged = pool
            .add_questions(vec![question("a", "hello"), question("b", "Hello")])
            .await
            .unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[tokio::test]
    async fn add_questions_never_persists_two_identical_texts() {
        let pool = adapter();
        for round in 0..3 {
            pool.add_questions(vec![
                question(&format!("x{round}"), "same text"),
                question(&format!("y{round}"), "same text"),
            ])
            .await
            .unwrap();
        }
        let stored = pool.load_pool().await;
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn delete_question_removes_exactly_one_entry() {
        let pool = adapter();
        pool.add_questions(vec![question("a", "one"), question("b", "two")])
            .await
            .unwrap();

        assert!(pool.delete_question("a").await);
        assert_eq!(pool.load_pool().await.len(), 1);
        assert!(!pool.delete_question("missing").await);
        assert_eq!(pool.load_pool().await.len(), 1);
    }

    #[tokio::test]
    async fn add_questions_propagates_a_failed_read_instead_of_wiping() {
        let store = FlakyReadStore::default();
        let pool = PoolAdapter::new(Arc::new(store.clone()));
        pool.add_questions(vec![question("a", "one"), question("b", "two")])
            .await
            .unwrap();

        store.fail_reads.store(true, Ordering::SeqCst);
        let result = pool.add_questions(vec![question("c", "three")]).await;
        assert!(result.is_err());

        // Once the backend recovers, the original entries are intact.
        store.fail_reads.store(false, Ordering::SeqCst);
        assert_eq!(pool.load_pool().await.len(), 2);
    }

    #[tokio::test]
    async fn update_question_patches_only_provided_fields() {
        let pool = adapter();
        pool.add_questions(vec![question("a", "original text")])
            .await
            .unwrap();

        let updated = pool
            .update_question(
                "a",
                QuestionPatch {
                    answer_human: Some("revised human answer".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.question, "original text");
        assert_eq!(updated.answer_ai, "ai answer");
        assert_eq!(updated.answer_human, "revised human answer");

        let stored = pool.load_pool().await;
        assert_eq!(stored[0].answer_human, "revised human answer");
    }

    #[tokio::test]
    async fn update_question_on_a_missing_id_writes_nothing() {
        let pool = adapter();
        pool.add_questions(vec![question("a", "one")]).await.unwrap();

        let result = pool
            .update_question("missing", QuestionPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(pool.load_pool().await.len(), 1);
    }

    #[tokio::test]
    async fn clear_pool_leaves_an_empty_pool_behind() {
        let pool = adapter();
        pool.add_questions(vec![question("a", "one")]).await.unwrap();
        pool.clear_pool().await.unwrap();
        assert!(pool.load_pool().await.is_empty());
    }
}
