use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::game::{
        NextQuestionQuery, NextQuestionResponse, StartGameRequest, StartGameResponse,
        SubmitAnswerRequest, SubmitAnswerResponse,
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/game/start",
    tag = "game",
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Session created", body = StartGameResponse),
        (status = 400, description = "Invalid nickname"),
    )
)]
/// Start a new game session for a nickname and difficulty.
pub async fn start_game(
    State(state): State<SharedState>,
    Json(request): Json<StartGameRequest>,
) -> Result<Json<StartGameResponse>, AppError> {
    Ok(Json(game_service::start_game(&state, request).await?))
}

#[utoipa::path(
    get,
    path = "/game/next-question",
    tag = "game",
    params(
        ("sessionId" = String, Query, description = "Session identifier"),
    ),
    responses(
        (status = 200, description = "A question, or a game-over summary", body = NextQuestionResponse),
        (status = 404, description = "Unknown session"),
    )
)]
/// Draw the next question for a session.
pub async fn next_question(
    State(state): State<SharedState>,
    Query(query): Query<NextQuestionQuery>,
) -> Result<Json<NextQuestionResponse>, AppError> {
    Ok(Json(
        game_service::next_question(&state, &query.session_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/game/submit",
    tag = "game",
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Submission scored", body = SubmitAnswerResponse),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "No matching question pending"),
    )
)]
/// Score the player's pick for the currently posed question.
pub async fn submit_answer(
    State(state): State<SharedState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    Ok(Json(game_service::submit_answer(&state, request).await?))
}

/// Configure the game routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/game/start", post(start_game))
        .route("/game/next-question", get(next_question))
        .route("/game/submit", post(submit_answer))
}
