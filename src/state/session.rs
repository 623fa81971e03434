use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Number of lives a fresh session starts with.
pub const STARTING_LIVES: i32 = 3;

/// Closed difficulty enumeration controlling points per correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 10 points per correct answer.
    Easy,
    /// 20 points per correct answer.
    Medium,
    /// 30 points per correct answer.
    Hard,
}

impl Difficulty {
    /// Points awarded for one correct answer at this difficulty.
    pub fn points(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }
}

/// Which of the two displayed answer slots is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AnswerSlot {
    /// First displayed slot.
    A,
    /// Second displayed slot.
    B,
}

/// High-level phase of one player's session, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No question pending; a draw is the only valid next step.
    Ready,
    /// A question has been posed and the correct slot is recorded
    /// server-side; a submission is expected.
    QuestionPosed,
    /// Lives are exhausted. Terminal: reads still succeed, scoring does not.
    GameOver,
}

/// One player's in-progress or completed game.
///
/// Persisted verbatim (keyed by `sessionId`) in the session table, so the
/// wire field names match the stored shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Opaque identifier generated at creation time.
    pub session_id: String,
    /// Display name chosen by the player.
    pub nickname: String,
    /// Difficulty fixed for the whole session.
    pub difficulty: Difficulty,
    /// Total points; only ever increases.
    pub score: u32,
    /// Remaining lives; only ever decreases. `<= 0` means game over.
    pub lives: i32,
    /// How many questions this session has answered.
    pub questions_answered: u32,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Id of the question currently posed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_question_id: Option<String>,
    /// Which slot holds the AI-authored text for the current round. Never
    /// sent to the client; the authoritative input for scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_correct_answer: Option<AnswerSlot>,
}

impl GameSession {
    /// Build a fresh session with full lives and a generated identifier.
    pub fn new(nickname: String, difficulty: Difficulty) -> Self {
        Self {
            session_id: format!("session_{}", Uuid::new_v4().simple()),
            nickname,
            difficulty,
            score: 0,
            lives: STARTING_LIVES,
            questions_answered: 0,
            created_at: OffsetDateTime::now_utc(),
            current_question_id: None,
            current_correct_answer: None,
        }
    }

    /// Whether this session has run out of lives.
    pub fn is_game_over(&self) -> bool {
        self.lives <= 0
    }

    /// Derive the phase from the session fields.
    pub fn phase(&self) -> SessionPhase {
        if self.is_game_over() {
            SessionPhase::GameOver
        } else if self.current_correct_answer.is_some() {
            SessionPhase::QuestionPosed
        } else {
            SessionPhase::Ready
        }
    }

    /// Apply one answered round: scoring on a correct pick, a lost life
    /// otherwise. Returns the points earned. Panic-free on exhausted
    /// sessions because callers gate on the phase first.
    pub fn record_answer(&mut self, correct: bool) -> u32 {
        let points = if correct {
            let earned = self.difficulty.points();
            self.score += earned;
            earned
        } else {
            self.lives -= 1;
            0
        };
        self.questions_answered += 1;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_counters() {
        let session = GameSession::new("X".into(), Difficulty::Easy);
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
        assert_eq!(session.questions_answered, 0);
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn points_per_difficulty() {
        assert_eq!(Difficulty::Easy.points(), 10);
        assert_eq!(Difficulty::Medium.points(), 20);
        assert_eq!(Difficulty::Hard.points(), 30);
    }

    #[test]
    fn correct_answers_raise_score_and_keep_lives() {
        let mut session = GameSession::new("X".into(), Difficulty::Medium);
        let earned = session.record_answer(true);
        assert_eq!(earned, 20);
        assert_eq!(session.score, 20);
        assert_eq!(session.lives, 3);
        assert_eq!(session.questions_answered, 1);
    }

    #[test]
    fn game_over_exactly_at_the_third_wrong_answer() {
        let mut session = GameSession::new("X".into(), Difficulty::Hard);

        for wrong in 1..=3 {
            assert!(!session.is_game_over());
            let earned = session.record_answer(false);
            assert_eq!(earned, 0);
            assert_eq!(session.lives, 3 - wrong);
        }

        assert!(session.is_game_over());
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(session.score, 0);
        assert_eq!(session.questions_answered, 3);
    }

    #[test]
    fn posed_question_moves_phase_forward() {
        let mut session = GameSession::new("X".into(), Difficulty::Easy);
        session.current_question_id = Some("q1".into());
        session.current_correct_answer = Some(AnswerSlot::B);
        assert_eq!(session.phase(), SessionPhase::QuestionPosed);

        session.current_correct_answer = None;
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn persisted_shape_is_keyed_like_the_wire() {
        let session = GameSession::new("nick".into(), Difficulty::Easy);
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json.get("questionsAnswered").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
