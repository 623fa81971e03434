use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{QuestionEntity, QuestionPatch};

/// Pool management actions accepted by the questions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PoolAction {
    /// Return the whole pool.
    Get,
    /// Persist an empty pool.
    Clear,
    /// Remove one question by id.
    Delete,
    /// Patch one question by id.
    Update,
}

/// Payload for the admin questions endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsRequest {
    /// Shared admin secret.
    pub admin_key: String,
    /// Which pool operation to run.
    pub action: PoolAction,
    /// Target for [`PoolAction::Delete`] and [`PoolAction::Update`].
    #[serde(default)]
    pub question_id: Option<String>,
    /// Replacement fields for [`PoolAction::Update`].
    #[serde(default)]
    pub updates: Option<QuestionPatch>,
}

/// Response of the admin questions endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionsResponse {
    /// Whether the action was applied.
    pub success: bool,
    /// Human readable outcome.
    pub message: String,
    /// Pool contents, for [`PoolAction::Get`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionEntity>>,
    /// Pool size after the action, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// One question offered for ingestion; ids and provenance are defaulted
/// server-side when absent. This is the shape the enrichment pipeline
/// produces.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    /// Optional pre-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Question text.
    pub question: String,
    /// Machine-generated answer.
    #[serde(rename = "answerAI")]
    pub answer_ai: String,
    /// Human-written answer.
    pub answer_human: String,
    /// Provenance label; defaults to "Bulk Upload".
    #[serde(default)]
    pub source: Option<String>,
    /// Pre-translation question text.
    #[serde(default)]
    pub original_question: Option<String>,
    /// Pre-translation answer text.
    #[serde(default)]
    pub original_answer: Option<String>,
    /// Whether the entry went through the translation pipeline.
    #[serde(default)]
    pub is_translated: bool,
}

/// Payload for the bulk upload endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadRequest {
    /// Shared admin secret.
    pub admin_key: String,
    /// Questions to merge into the pool (at most 50 per call).
    pub questions: Vec<QuestionInput>,
}

/// Response of the bulk upload endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUploadResponse {
    /// Whether the upload was accepted.
    pub success: bool,
    /// Human readable outcome.
    pub message: String,
    /// How many questions were offered for the merge.
    pub uploaded: usize,
}

/// Payload for the admin login endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Shared admin secret.
    pub admin_key: String,
}

/// Response of the admin login endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Opaque token the dashboard stores for subsequent requests.
    pub session_token: String,
}

/// Payload for the schema initialization endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitDatabaseRequest {
    /// Shared admin secret.
    pub admin_key: String,
}

/// Generic acknowledgment for actions without a richer payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Whether the action was applied.
    pub success: bool,
    /// Human readable outcome.
    pub message: String,
}
