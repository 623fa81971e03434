use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;

use crate::dao::{
    models::QuestionEntity,
    question_store::{Provider, QuestionStore},
    storage::StorageResult,
};

use super::{
    config::KvConfig,
    error::{KvDaoError, KvResult},
};

/// Key holding the whole question pool as one JSON blob.
const POOL_KEY: &str = "questions:pool";

/// Shape of every response from the REST key-value service.
#[derive(Debug, Deserialize)]
struct KvResponse {
    result: Option<String>,
}

/// Question store backed by an Upstash-style REST key-value service.
///
/// The pool is a single blob: reads are `GET {base}/get/{key}`, writes are
/// `POST {base}/set/{key}` with the serialized pool as the body, so every
/// save replaces the collection wholesale.
#[derive(Clone)]
pub struct KvQuestionStore {
    client: Client,
    base_url: Arc<str>,
    token: Arc<str>,
}

impl KvQuestionStore {
    /// Build the HTTP client for the configured endpoint.
    pub fn new(config: KvConfig) -> KvResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| KvDaoError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            token: Arc::from(config.token.as_str()),
        })
    }

    async fn get_blob(&self, key: &str) -> KvResult<Option<String>> {
        let path = format!("get/{key}");
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.as_ref())
            .send()
            .await
            .map_err(|source| KvDaoError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(KvDaoError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        let payload = response
            .json::<KvResponse>()
            .await
            .map_err(|source| KvDaoError::DecodeResponse { path, source })?;
        Ok(payload.result)
    }

    async fn set_blob(&self, key: &str, value: String) -> KvResult<()> {
        let path = format!("set/{key}");
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.as_ref())
            .body(value)
            .send()
            .await
            .map_err(|source| KvDaoError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(KvDaoError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }

    async fn read_pool(&self) -> KvResult<Vec<QuestionEntity>> {
        match self.get_blob(POOL_KEY).await? {
            Some(blob) => {
                serde_json::from_str(&blob).map_err(|source| KvDaoError::DeserializeValue {
                    key: POOL_KEY.to_string(),
                    source,
                })
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write_pool(&self, questions: &[QuestionEntity]) -> KvResult<()> {
        let blob =
            serde_json::to_string(questions).map_err(|source| KvDaoError::SerializeValue {
                key: POOL_KEY.to_string(),
                source,
            })?;
        self.set_blob(POOL_KEY, blob).await
    }
}

impl QuestionStore for KvQuestionStore {
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
            store.get_blob(POOL_KEY).await?;
            Ok(())
        })
    }

    fn provider(&self) -> Provider {
        Provider::KeyValue
    }
}
