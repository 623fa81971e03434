use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::{
        ADMIN_API_MAX_REQUESTS, ADMIN_API_WINDOW, BULK_UPLOAD_LIMIT, LOGIN_MAX_REQUESTS,
        LOGIN_WINDOW, UNAUTHORIZED_DELAY, UPLOAD_MAX_REQUESTS, UPLOAD_WINDOW,
    },
    dao::models::QuestionEntity,
    dto::admin::{
        ActionResponse, BulkUploadRequest, BulkUploadResponse, LoginRequest, LoginResponse,
        PoolAction, QuestionInput, QuestionsRequest, QuestionsResponse,
    },
    error::ServiceError,
    state::SharedState,
};

/// Default provenance label for questions ingested without one.
const BULK_SOURCE: &str = "Bulk Upload";

/// Rate-limit the caller, then check the admin key.
///
/// The limit is counted before the key comparison so a brute-forcing
/// client burns its window on failed attempts too. A wrong or missing
/// key is answered after a fixed delay.
async fn require_admin(
    state: &SharedState,
    client_ip: &str,
    scope: &str,
    max_requests: u32,
    window: Duration,
    provided_key: &str,
) -> Result<(), ServiceError> {
    let decision = state
        .rate_limiter()
        .check(&format!("{scope}:{client_ip}"), max_requests, window);
    if !decision.allowed {
        warn!(scope, client_ip, "rate limit exceeded");
        return Err(ServiceError::RateLimited {
            retry_after: decision.retry_after,
        });
    }

    let authorized = state
        .config()
        .admin_key
        .as_deref()
        .is_some_and(|expected| expected == provided_key);
    if !authorized {
        warn!(scope, client_ip, "rejected admin key");
        tokio::time::sleep(UNAUTHORIZED_DELAY).await;
        return Err(ServiceError::Unauthorized("invalid admin key".into()));
    }

    Ok(())
}

/// Verify the admin key and mint an opaque dashboard token.
pub async fn login(
    state: &SharedState,
    client_ip: &str,
    request: LoginRequest,
) -> Result<LoginResponse, ServiceError> {
    require_admin(
        state,
        client_ip,
        "login",
        LOGIN_MAX_REQUESTS,
        LOGIN_WINDOW,
        &request.admin_key,
    )
    .await?;

    info!(client_ip, "admin login");
    Ok(LoginResponse {
        success: true,
        session_token: Uuid::new_v4().simple().to_string(),
    })
}

/// Run one pool management action (get, clear, delete).
pub async fn questions(
    state: &SharedState,
    client_ip: &str,
    request: QuestionsRequest,
) -> Result<QuestionsResponse, ServiceError> {
    require_admin(
        state,
        client_ip,
        "admin-api",
        ADMIN_API_MAX_REQUESTS,
        ADMIN_API_WINDOW,
        &request.admin_key,
    )
    .await?;

    match request.action {
        PoolAction::Get => {
            let pool = state.pool().load_pool().await;
            let count = pool.len();
            Ok(QuestionsResponse {
                success: true,
                message: format!("{count} questions in the pool"),
                questions: Some(pool),
                count: Some(count),
            })
        }
        PoolAction::Clear => {
            state.pool().clear_pool().await?;
            info!(client_ip, "question pool cleared");
            Ok(QuestionsResponse {
                success: true,
                message: "question pool cleared".into(),
                questions: None,
                count: Some(0),
            })
        }
        PoolAction::Update => {
            let question_id = request.question_id.ok_or_else(|| {
                ServiceError::InvalidInput("questionId is required for update".into())
            })?;
            let patch = request.updates.ok_or_else(|| {
                ServiceError::InvalidInput("updates is required for update".into())
            })?;
            match state.pool().update_question(&question_id, patch).await? {
                Some(updated) => {
                    info!(client_ip, question_id, "question updated");
                    Ok(QuestionsResponse {
                        success: true,
                        message: format!("question `{question_id}` updated"),
                        questions: Some(vec![updated]),
                        count: None,
                    })
                }
                None => Err(ServiceError::NotFound(format!(
                    "question `{question_id}` not found"
                ))),
            }
        }
        PoolAction::Delete => {
            let question_id = request.question_id.ok_or_else(|| {
                ServiceError::InvalidInput("questionId is required for delete".into())
            })?;
            if state.pool().delete_question(&question_id).await {
                info!(client_ip, question_id, "question deleted");
                Ok(QuestionsResponse {
                    success: true,
                    message: format!("question `{question_id}` deleted"),
                    questions: None,
                    count: None,
                })
            } else {
                Err(ServiceError::NotFound(format!(
                    "question `{question_id}` not found"
                )))
            }
        }
    }
}

fn validate_upload(questions: &[QuestionInput]) -> Result<(), ServiceError> {
    if questions.is_empty() {
        return Err(ServiceError::InvalidInput(
            "questions must be a non-empty array".into(),
        ));
    }
    if questions.len() > BULK_UPLOAD_LIMIT {
        return Err(ServiceError::InvalidInput(format!(
            "at most {BULK_UPLOAD_LIMIT} questions per upload (got {})",
            questions.len()
        )));
    }
    for (index, question) in questions.iter().enumerate() {
        let complete = !question.question.trim().is_empty()
            && !question.answer_ai.trim().is_empty()
            && !question.answer_human.trim().is_empty();
        if !complete {
            return Err(ServiceError::InvalidInput(format!(
                "question at index {index} is missing question, answerAI or answerHuman"
            )));
        }
    }
    Ok(())
}

fn entity_from_input(input: QuestionInput) -> QuestionEntity {
    QuestionEntity {
        id: input
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("bulk_{}", Uuid::new_v4().simple())),
        question: input.question,
        answer_ai: input.answer_ai,
        answer_human: input.answer_human,
        source: input
            .source
            .filter(|source| !source.trim().is_empty())
            .unwrap_or_else(|| BULK_SOURCE.to_string()),
        original_question: input.original_question,
        original_answer: input.original_answer,
        is_translated: input.is_translated,
    }
}

/// Validate and merge a batch of questions into the pool.
///
/// Entries whose question text already exists in the pool are skipped by
/// the merge, so re-sending a batch cannot create duplicates.
pub async fn bulk_upload(
    state: &SharedState,
    client_ip: &str,
    request: BulkUploadRequest,
) -> Result<BulkUploadResponse, ServiceError> {
    require_admin(
        state,
        client_ip,
        "upload",
        UPLOAD_MAX_REQUESTS,
        UPLOAD_WINDOW,
        &request.admin_key,
    )
    .await?;

    validate_upload(&request.questions)?;
    let offered = request.questions.len();

    let entities = request
        .questions
        .into_iter()
        .map(entity_from_input)
        .collect::<Vec<_>>();
    let merged = state.pool().add_questions(entities).await?;

    info!(client_ip, offered, pool_size = merged.len(), "bulk upload merged");
    Ok(BulkUploadResponse {
        success: true,
        message: format!("merged upload; pool now holds {} questions", merged.len()),
        uploaded: offered,
    })
}

/// Run backend schema initialization (a no-op for schemaless backends).
pub async fn init_database(
    state: &SharedState,
    client_ip: &str,
    admin_key: &str,
) -> Result<ActionResponse, ServiceError> {
    require_admin(
        state,
        client_ip,
        "admin-api",
        ADMIN_API_MAX_REQUESTS,
        ADMIN_API_WINDOW,
        admin_key,
    )
    .await?;

    state.pool().initialize().await?;
    info!(client_ip, provider = %state.pool().provider(), "storage initialized");
    Ok(ActionResponse {
        success: true,
        message: format!("{} storage initialized", state.pool().provider()),
    })
}
