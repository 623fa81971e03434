use futures::future::BoxFuture;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::dao::{
    models::QuestionEntity,
    question_store::{Provider, QuestionStore},
    storage::StorageResult,
};

use super::error::{PgDaoError, PgResult};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id VARCHAR(255) PRIMARY KEY,
    question TEXT NOT NULL,
    answer_ai TEXT NOT NULL,
    answer_human TEXT NOT NULL,
    source VARCHAR(255) NOT NULL,
    original_question TEXT,
    original_answer TEXT,
    is_translated BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_questions_created_at ON questions(created_at);
CREATE INDEX IF NOT EXISTS idx_questions_source ON questions(source)
"#;

/// Question store backed by a managed PostgreSQL table, one row per
/// question with a `created_at` column derived on insert.
#[derive(Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    /// Build a lazily connecting pool; connection failures surface on the
    /// first query, where callers degrade per the adapter policy.
    pub fn connect_lazy(url: &str) -> PgResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(url)
            .map_err(|source| PgDaoError::InvalidConnectionString { source })?;
        Ok(Self { pool })
    }

    async fn fetch_pool(&self) -> PgResult<Vec<QuestionEntity>> {
        let rows = sqlx::query(
            "SELECT id, question, answer_ai, answer_human, source, \
             original_question, original_answer, is_translated \
             FROM questions ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|source| PgDaoError::Query {
            operation: "load",
            source,
        })?;

        Ok(rows.iter().map(row_to_entity).collect())
    }

    /// Replace the table contents inside one transaction so a concurrent
    /// reader never observes the pool mid-replacement.
    async fn replace_pool(&self, questions: &[QuestionEntity]) -> PgResult<()> {
        let mut tx = self.pool.begin().await.map_err(|source| PgDaoError::Query {
            operation: "begin",
            source,
        })?;

        sqlx::query("DELETE FROM questions")
            .execute(&mut *tx)
            .await
            .map_err(|source| PgDaoError::Query {
                operation: "clear",
                source,
            })?;

        for question in questions {
            sqlx::query(
                "INSERT INTO questions (id, question, answer_ai, answer_human, source, \
                 original_question, original_answer, is_translated) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(&question.id)
            .bind(&question.question)
            .bind(&question.answer_ai)
            .bind(&question.answer_human)
            .bind(&question.source)
            .bind(&question.original_question)
            .bind(&question.original_answer)
            .bind(question.is_translated)
            .execute(&mut *tx)
            .await
            .map_err(|source| PgDaoError::Query {
                operation: "insert",
                source,
            })?;
        }

        tx.commit().await.map_err(|source| PgDaoError::Query {
            operation: "commit",
            source,
        })
    }
}

fn row_to_entity(row: &PgRow) -> QuestionEntity {
    QuestionEntity {
        id: row.get("id"),
        question: row.get("question"),
        answer_ai: row.get("answer_ai"),
        answer_human: row.get("answer_human"),
        source: row.get("source"),
        original_question: row.get("original_question"),
        original_answer: row.get("original_answer"),
        is_translated: row.get("is_translated"),
    }
}

impl QuestionStore for PgQuestionStore {
    fn load_pool(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_pool().await.map_err(Into::into) })
    }

    fn save_pool(&self, questions: Vec<QuestionEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.replace_pool(&questions).await.map_err(Into::into) })
    }

    fn delete_question(&self, id: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM questions WHERE id = $1")
                .bind(&id)
                .execute(&store.pool)
                .await
                .map_err(|source| PgDaoError::Query {
                    operation: "delete",
                    source,
                })?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn initialize(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            sqlx::query(CREATE_TABLE)
                .execute(&store.pool)
                .await
                .map_err(|source| PgDaoError::Initialize { source })?;
            for statement in CREATE_INDEXES.split(';') {
                let statement = statement.trim();
                if statement.is_empty() {
                    continue;
                }
                sqlx::query(statement)
                    .execute(&store.pool)
                    .await
                    .map_err(|source| PgDaoError::Initialize { source })?;
            }
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&store.pool)
                .await
                .map_err(|source| PgDaoError::Query {
                    operation: "ping",
                    source,
                })?;
            Ok(())
        })
    }

    fn provider(&self) -> Provider {
        Provider::Postgres
    }
}
