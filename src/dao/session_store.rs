use std::io::ErrorKind;
use std::path::PathBuf;

use indexmap::IndexMap;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::state::session::{AnswerSlot, GameSession};

/// Outcome of claiming the server-recorded correct answer for a submission.
///
/// Claiming consumes the recorded slot under the store's write lock, so a
/// concurrent duplicate submit observes [`AnswerClaim::NoQuestionPending`]
/// instead of double-applying the score.
#[derive(Debug, PartialEq, Eq)]
pub enum AnswerClaim {
    /// No session is stored under the given id.
    SessionMissing,
    /// The session exists but no question is currently posed.
    NoQuestionPending,
    /// A question is posed but for a different question id than submitted.
    QuestionMismatch,
    /// The recorded slot, now consumed.
    Claimed(AnswerSlot),
}

/// Shallow partial update applied to a stored session.
#[derive(Debug, Default)]
pub struct SessionUpdate {
    /// New total score, when changed.
    pub score: Option<u32>,
    /// New remaining lives, when changed.
    pub lives: Option<i32>,
    /// New answered-questions counter, when changed.
    pub questions_answered: Option<u32>,
}

/// Per-session state keyed by `sessionId`.
///
/// The in-process table is authoritative for the life of the process; when
/// a mirror path is configured every mutation is also written there
/// best-effort, and reads merge mirror entries back in (cache entries win)
/// so sessions survive a restart when the mirror was writable.
pub struct SessionStore {
    cache: RwLock<IndexMap<String, GameSession>>,
    mirror: Option<PathBuf>,
}

impl SessionStore {
    /// Create a store, optionally mirrored to a JSON file.
    pub fn new(mirror: Option<PathBuf>) -> Self {
        Self {
            cache: RwLock::new(IndexMap::new()),
            mirror,
        }
    }

    /// Persist a freshly built session and hand it back.
    pub async fn create(&self, session: GameSession) -> GameSession {
        let snapshot = {
            let mut cache = self.cache.write().await;
            self.absorb_mirror(&mut cache).await;
            cache.insert(session.session_id.clone(), session.clone());
            cache.clone()
        };
        self.persist(&snapshot).await;
        session
    }

    /// Look up a session, merging the durable mirror into the cache first.
    pub async fn get(&self, session_id: &str) -> Option<GameSession> {
        let mut cache = self.cache.write().await;
        self.absorb_mirror(&mut cache).await;
        cache.get(session_id).cloned()
    }

    /// Apply a shallow field merge; `None` when the session does not exist.
    pub async fn update(&self, session_id: &str, update: SessionUpdate) -> Option<GameSession> {
        let (updated, snapshot) = {
            let mut cache = self.cache.write().await;
            self.absorb_mirror(&mut cache).await;
            let session = cache.get_mut(session_id)?;
            if let Some(score) = update.score {
                session.score = score;
            }
            if let Some(lives) = update.lives {
                session.lives = lives;
            }
            if let Some(answered) = update.questions_answered {
                session.questions_answered = answered;
            }
            (session.clone(), cache.clone())
        };
        self.persist(&snapshot).await;
        Some(updated)
    }

    /// Record the per-round fields after a question draw.
    pub async fn pose_question(
        &self,
        session_id: &str,
        question_id: String,
        correct_slot: AnswerSlot,
    ) -> Option<GameSession> {
        let (updated, snapshot) = {
            let mut cache = self.cache.write().await;
            let session = cache.get_mut(session_id)?;
            session.current_question_id = Some(question_id);
            session.current_correct_answer = Some(correct_slot);
            (session.clone(), cache.clone())
        };
        self.persist(&snapshot).await;
        Some(updated)
    }

    /// Consume the recorded correct slot for the given question, atomically.
    pub async fn claim_answer(&self, session_id: &str, question_id: &str) -> AnswerClaim {
        let (claim, snapshot) = {
            let mut cache = self.cache.write().await;
            self.absorb_mirror(&mut cache).await;
            let Some(session) = cache.get_mut(session_id) else {
                return AnswerClaim::SessionMissing;
            };
            if session.current_correct_answer.is_none() {
                return AnswerClaim::NoQuestionPending;
            }
            if session.current_question_id.as_deref() != Some(question_id) {
                return AnswerClaim::QuestionMismatch;
            }
            let slot = session
                .current_correct_answer
                .take()
                .unwrap_or(AnswerSlot::A);
            session.current_question_id = None;
            (AnswerClaim::Claimed(slot), cache.clone())
        };
        self.persist(&snapshot).await;
        claim
    }

    /// Merge mirror entries into the cache. Cache entries win: the memory
    /// copy is authoritative for the life of the process.
    async fn absorb_mirror(&self, cache: &mut IndexMap<String, GameSession>) {
        let Some(ref path) = self.mirror else {
            return;
        };

        let table: IndexMap<String, GameSession> = match fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(table) => table,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "session mirror is corrupt; ignoring it");
                    return;
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => return,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read session mirror");
                return;
            }
        };

        for (id, session) in table {
            cache.entry(id).or_insert(session);
        }
    }

    /// Best-effort mirror write; failures leave the memory copy
    /// authoritative (read-only filesystems are expected in some deploys).
    async fn persist(&self, snapshot: &IndexMap<String, GameSession>) {
        let Some(ref path) = self.mirror else {
            return;
        };

        let payload = match serde_json::to_vec_pretty(snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize session table");
                return;
            }
        };

        if let Err(err) = fs::write(path, payload).await {
            debug!(path = %path.display(), error = %err, "session mirror write failed; memory copy stays authoritative");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::Difficulty;

    fn store() -> SessionStore {
        SessionStore::new(None)
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = store();
        let session = store
            .create(GameSession::new("nick".into(), Difficulty::Easy))
            .await;

        let found = store.get(&session.session_id).await.unwrap();
        assert_eq!(found, session);
        assert!(store.get("session_unknown").await.is_none());
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let store = store();
        let session = store
            .create(GameSession::new("nick".into(), Difficulty::Hard))
            .await;

        let updated = store
            .update(
                &session.session_id,
                SessionUpdate {
                    score: Some(30),
                    questions_answered: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.score, 30);
        assert_eq!(updated.lives, 3);
        assert_eq!(updated.questions_answered, 1);
    }

    #[tokio::test]
    async fn update_of_missing_session_returns_none() {
        let store = store();
        let result = store.update("session_absent", SessionUpdate::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn claim_answer_consumes_the_recorded_slot_once() {
        let store = store();
        let session = store
            .create(GameSession::new("nick".into(), Difficulty::Easy))
            .await;
        store
            .pose_question(&session.session_id, "q1".into(), AnswerSlot::B)
            .await
            .unwrap();

        assert_eq!(
            store.claim_answer(&session.session_id, "q1").await,
            AnswerClaim::Claimed(AnswerSlot::B)
        );
        // A duplicate submission finds nothing pending.
        assert_eq!(
            store.claim_answer(&session.session_id, "q1").await,
            AnswerClaim::NoQuestionPending
        );
    }

    #[tokio::test]
    async fn claim_answer_rejects_a_stale_question_id() {
        let store = store();
        let session = store
            .create(GameSession::new("nick".into(), Difficulty::Easy))
            .await;
        store
            .pose_question(&session.session_id, "q2".into(), AnswerSlot::A)
            .await
            .unwrap();

        assert_eq!(
            store.claim_answer(&session.session_id, "q1").await,
            AnswerClaim::QuestionMismatch
        );
        // The pending answer survives a mismatched claim.
        assert_eq!(
            store.claim_answer(&session.session_id, "q2").await,
            AnswerClaim::Claimed(AnswerSlot::A)
        );
    }

    #[tokio::test]
    async fn mirror_entries_are_read_back_but_never_override_memory() {
        let path = std::env::temp_dir().join(format!(
            "stb-sessions-{}.json",
            uuid::Uuid::new_v4()
        ));

        let first = SessionStore::new(Some(path.clone()));
        let durable = first
            .create(GameSession::new("early".into(), Difficulty::Easy))
            .await;

        // Cold start: a new store sees the mirrored session.
        let second = SessionStore::new(Some(path.clone()));
        let recovered = second.get(&durable.session_id).await.unwrap();
        assert_eq!(recovered.nickname, "early");

        // A memory mutation stays authoritative even though the mirror
        // still holds the old copy until the next persist.
        second
            .update(
                &durable.session_id,
                SessionUpdate {
                    score: Some(10),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let after = second.get(&durable.session_id).await.unwrap();
        assert_eq!(after.score, 10);

        let _ = std::fs::remove_file(path);
    }
}
