use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::session::{AnswerSlot, Difficulty, GameSession};

/// Payload starting a new game session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartGameRequest {
    /// Player display name.
    #[validate(custom(function = "crate::dto::validation::validate_nickname"))]
    pub nickname: String,
    /// Difficulty fixed for the whole session.
    pub difficulty: Difficulty,
}

/// Handle returned once a session exists.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    /// Opaque session identifier to pass to the other game endpoints.
    pub session_id: String,
}

/// Query selecting the session a question is drawn for.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionQuery {
    /// Session identifier returned by the start endpoint.
    pub session_id: String,
}

/// A posed question with its two unlabeled answer slots.
///
/// Which slot holds the AI answer is recorded server-side only.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    /// Question identifier, echoed back on submission.
    pub id: String,
    /// The question text.
    pub question: String,
    /// First answer slot.
    pub answer_a: String,
    /// Second answer slot.
    pub answer_b: String,
}

/// Response to a question draw.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionResponse {
    /// The posed question; absent when the game is already over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    /// Current score.
    pub score: u32,
    /// Remaining lives.
    pub lives: i32,
    /// Whether the session is out of lives.
    pub game_over: bool,
}

impl NextQuestionResponse {
    /// Read-only payload for a session that is already out of lives.
    pub fn game_over(session: &GameSession) -> Self {
        Self {
            question: None,
            score: session.score,
            lives: session.lives,
            game_over: true,
        }
    }
}

/// Payload submitting the player's pick for the current question.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    /// Session identifier.
    pub session_id: String,
    /// Which slot the player believes is the AI-authored answer.
    pub choice: AnswerSlot,
    /// Id of the question being answered; must match the posed question.
    pub question_id: String,
}

/// Outcome of a scored submission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    /// Whether the pick matched the server-recorded slot.
    pub correct: bool,
    /// The slot that actually held the AI-authored answer.
    pub correct_answer: AnswerSlot,
    /// Points earned by this submission (0 when wrong).
    pub points_earned: u32,
    /// Score after this submission.
    pub new_score: u32,
    /// Lives after this submission.
    pub new_lives: i32,
    /// Whether this submission ended the game.
    pub game_over: bool,
}
