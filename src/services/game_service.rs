use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;
use validator::Validate;

use crate::{
    dao::session_store::{AnswerClaim, SessionUpdate},
    dto::game::{
        NextQuestionResponse, QuestionView, StartGameRequest, StartGameResponse,
        SubmitAnswerRequest, SubmitAnswerResponse,
    },
    error::ServiceError,
    state::{
        SharedState,
        session::{AnswerSlot, GameSession},
    },
};

/// Create a fresh session and hand its identifier back.
pub async fn start_game(
    state: &SharedState,
    request: StartGameRequest,
) -> Result<StartGameResponse, ServiceError> {
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))?;

    let session = state
        .sessions()
        .create(GameSession::new(request.nickname, request.difficulty))
        .await;

    info!(
        session_id = %session.session_id,
        nickname = %session.nickname,
        difficulty = ?session.difficulty,
        "game started"
    );

    Ok(StartGameResponse {
        session_id: session.session_id,
    })
}

/// Draw a uniformly random question for the session and randomize which
/// slot carries the AI answer. The correct slot is recorded server-side
/// only; the response never labels the slots.
pub async fn next_question(
    state: &SharedState,
    session_id: &str,
) -> Result<NextQuestionResponse, ServiceError> {
    let session = state
        .sessions()
        .get(session_id)
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("session `{session_id}` not found")))?;

    if session.is_game_over() {
        return Ok(NextQuestionResponse::game_over(&session));
    }

    let pool = state.pool().load_pool().await;
    if pool.is_empty() {
        return Err(ServiceError::NoQuestionsAvailable);
    }

    let (drawn, ai_in_slot_a) = {
        let mut rng = rand::rng();
        let drawn = pool
            .choose(&mut rng)
            .cloned()
            .ok_or(ServiceError::NoQuestionsAvailable)?;
        (drawn, rng.random_bool(0.5))
    };

    if !drawn.is_playable() {
        return Err(ServiceError::IncompleteQuestionData(drawn.id));
    }

    let (answer_a, answer_b, correct_slot) = if ai_in_slot_a {
        (drawn.answer_ai, drawn.answer_human, AnswerSlot::A)
    } else {
        (drawn.answer_human, drawn.answer_ai, AnswerSlot::B)
    };

    let session = state
        .sessions()
        .pose_question(session_id, drawn.id.clone(), correct_slot)
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("session `{session_id}` not found")))?;

    Ok(NextQuestionResponse {
        question: Some(QuestionView {
            id: drawn.id,
            question: drawn.question,
            answer_a,
            answer_b,
        }),
        score: session.score,
        lives: session.lives,
        game_over: false,
    })
}

/// Score a submission against the server-recorded correct slot.
///
/// The recorded slot is required: a submission with no question pending
/// (including a concurrent duplicate, which loses the claim) is rejected
/// rather than scored against anything client-supplied.
pub async fn submit_answer(
    state: &SharedState,
    request: SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, ServiceError> {
    let session = state
        .sessions()
        .get(&request.session_id)
        .await
        .ok_or_else(|| {
            ServiceError::NotFound(format!("session `{}` not found", request.session_id))
        })?;

    if session.is_game_over() {
        return Err(ServiceError::InvalidState(
            "game is over; no further scoring is possible".into(),
        ));
    }

    let correct_slot = match state
        .sessions()
        .claim_answer(&request.session_id, &request.question_id)
        .await
    {
        AnswerClaim::SessionMissing => {
            return Err(ServiceError::NotFound(format!(
                "session `{}` not found",
                request.session_id
            )));
        }
        AnswerClaim::NoQuestionPending => {
            return Err(ServiceError::InvalidState(
                "no question is pending for this session".into(),
            ));
        }
        AnswerClaim::QuestionMismatch => {
            return Err(ServiceError::InvalidState(
                "submitted question does not match the posed question".into(),
            ));
        }
        AnswerClaim::Claimed(slot) => slot,
    };

    let correct = request.choice == correct_slot;
    let mut scored = session;
    let points_earned = scored.record_answer(correct);

    let persisted = state
        .sessions()
        .update(
            &request.session_id,
            SessionUpdate {
                score: Some(scored.score),
                lives: Some(scored.lives),
                questions_answered: Some(scored.questions_answered),
            },
        )
        .await
        .ok_or_else(|| {
            ServiceError::NotFound(format!("session `{}` not found", request.session_id))
        })?;

    if persisted.is_game_over() {
        info!(
            nickname = %persisted.nickname,
            final_score = persisted.score,
            questions_answered = persisted.questions_answered,
            "game over"
        );
    }

    Ok(SubmitAnswerResponse {
        correct,
        correct_answer: correct_slot,
        points_earned,
        new_score: persisted.score,
        new_lives: persisted.lives,
        game_over: persisted.is_game_over(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::QuestionEntity;
    use crate::state::AppState;
    use crate::state::session::Difficulty;

    fn question(id: &str, text: &str, ai: &str, human: &str) -> QuestionEntity {
        QuestionEntity {
            id: id.into(),
            question: text.into(),
            answer_ai: ai.into(),
            answer_human: human.into(),
            source: "test".into(),
            original_question: None,
            original_answer: None,
            is_translated: false,
        }
    }

    async fn started(state: &SharedState, difficulty: Difficulty) -> String {
        start_game(
            state,
            StartGameRequest {
                nickname: "X".into(),
                difficulty,
            },
        )
        .await
        .unwrap()
        .session_id
    }

    #[tokio::test]
    async fn start_rejects_a_blank_nickname() {
        let state = AppState::for_tests();
        let err = start_game(
            &state,
            StartGameRequest {
                nickname: "  ".into(),
                difficulty: Difficulty::Easy,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn drawing_from_an_empty_pool_is_a_typed_error() {
        let state = AppState::for_tests();
        let session_id = started(&state, Difficulty::Easy).await;

        let err = next_question(&state, &session_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NoQuestionsAvailable));
    }

    #[tokio::test]
    async fn drawing_an_incomplete_question_is_a_typed_error() {
        let state = AppState::for_tests();
        // Bypass upload validation to simulate bad upstream data.
        state
            .pool()
            .save_pool(vec![question("q1", "Q", "ai", "")])
            .await
            .unwrap();
        let session_id = started(&state, Difficulty::Easy).await;

        let err = next_question(&state, &session_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::IncompleteQuestionData(id) if id == "q1"));
    }

    #[tokio::test]
    async fn full_round_scores_a_correct_ai_pick() {
        let state = AppState::for_tests();
        state
            .pool()
            .add_questions(vec![question("q1", "Q", "A1", "H1")])
            .await
            .unwrap();
        let session_id = started(&state, Difficulty::Easy).await;

        let posed = next_question(&state, &session_id).await.unwrap();
        let view = posed.question.unwrap();
        // Both answers must appear, in some order, across the two slots.
        let slots = [view.answer_a.as_str(), view.answer_b.as_str()];
        assert!(slots.contains(&"A1"));
        assert!(slots.contains(&"H1"));

        // The server records which slot is AI-authored.
        let recorded = state
            .sessions()
            .get(&session_id)
            .await
            .unwrap()
            .current_correct_answer
            .unwrap();
        let expected = if view.answer_a == "A1" {
            AnswerSlot::A
        } else {
            AnswerSlot::B
        };
        assert_eq!(recorded, expected);

        let outcome = submit_answer(
            &state,
            SubmitAnswerRequest {
                session_id: session_id.clone(),
                choice: recorded,
                question_id: view.id,
            },
        )
        .await
        .unwrap();

        assert!(outcome.correct);
        assert_eq!(outcome.points_earned, 10);
        assert_eq!(outcome.new_score, 10);
        assert_eq!(outcome.new_lives, 3);
        assert!(!outcome.game_over);
    }

    #[tokio::test]
    async fn three_wrong_answers_end_the_game_exactly() {
        let state = AppState::for_tests();
        state
            .pool()
            .add_questions(vec![question("q1", "Q", "A1", "H1")])
            .await
            .unwrap();
        let session_id = started(&state, Difficulty::Medium).await;

        for round in 1..=3 {
            let posed = next_question(&state, &session_id).await.unwrap();
            let view = posed.question.unwrap();
            let recorded = state
                .sessions()
                .get(&session_id)
                .await
                .unwrap()
                .current_correct_answer
                .unwrap();
            let wrong = match recorded {
                AnswerSlot::A => AnswerSlot::B,
                AnswerSlot::B => AnswerSlot::A,
            };

            let outcome = submit_answer(
                &state,
                SubmitAnswerRequest {
                    session_id: session_id.clone(),
                    choice: wrong,
                    question_id: view.id,
                },
            )
            .await
            .unwrap();

            assert_eq!(outcome.new_lives, 3 - round);
            assert_eq!(outcome.new_score, 0);
            assert_eq!(outcome.game_over, round == 3);
        }

        // Terminal: draws report game over, submissions are rejected.
        let after = next_question(&state, &session_id).await.unwrap();
        assert!(after.game_over);
        assert!(after.question.is_none());

        let err = submit_answer(
            &state,
            SubmitAnswerRequest {
                session_id: session_id.clone(),
                choice: AnswerSlot::A,
                question_id: "q1".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn duplicate_submission_is_rejected_not_double_scored() {
        let state = AppState::for_tests();
        state
            .pool()
            .add_questions(vec![question("q1", "Q", "A1", "H1")])
            .await
            .unwrap();
        let session_id = started(&state, Difficulty::Hard).await;

        let posed = next_question(&state, &session_id).await.unwrap();
        let view = posed.question.unwrap();
        let recorded = state
            .sessions()
            .get(&session_id)
            .await
            .unwrap()
            .current_correct_answer
            .unwrap();

        let request = SubmitAnswerRequest {
            session_id: session_id.clone(),
            choice: recorded,
            question_id: view.id,
        };
        let first = submit_answer(&state, request).await.unwrap();
        assert_eq!(first.new_score, 30);

        let second = submit_answer(
            &state,
            SubmitAnswerRequest {
                session_id: session_id.clone(),
                choice: recorded,
                question_id: "q1".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(second, ServiceError::InvalidState(_)));

        let session = state.sessions().get(&session_id).await.unwrap();
        assert_eq!(session.score, 30);
        assert_eq!(session.questions_answered, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let state = AppState::for_tests();
        let err = next_question(&state, "session_missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
