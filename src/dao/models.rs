use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A quiz question with its paired AI-written and human-written answers.
///
/// This is the shape persisted verbatim (as a JSON array) by the file and
/// key-value backends; the relational backend maps it onto one row per
/// question. Pool-level uniqueness is keyed on the `question` text, not on
/// `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEntity {
    /// Stable identifier assigned at ingestion time.
    pub id: String,
    /// The question text shown to the player.
    pub question: String,
    /// Machine-generated answer.
    #[serde(rename = "answerAI")]
    pub answer_ai: String,
    /// Human-written answer.
    pub answer_human: String,
    /// Provenance label (dataset name, "Bulk Upload", ...).
    pub source: String,
    /// Pre-translation question text, when the entry was translated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_question: Option<String>,
    /// Pre-translation answer text, when the entry was translated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_answer: Option<String>,
    /// Whether the entry went through the translation pipeline.
    #[serde(default)]
    pub is_translated: bool,
}

impl QuestionEntity {
    /// A question may only be served to players when both answers are present.
    pub fn is_playable(&self) -> bool {
        !self.answer_ai.trim().is_empty() && !self.answer_human.trim().is_empty()
    }
}

/// Per-field patch for one stored question; absent fields keep the stored
/// value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPatch {
    /// Replacement question text.
    #[serde(default)]
    pub question: Option<String>,
    /// Replacement machine-generated answer.
    #[serde(default, rename = "answerAI")]
    pub answer_ai: Option<String>,
    /// Replacement human-written answer.
    #[serde(default)]
    pub answer_human: Option<String>,
    /// Replacement provenance label.
    #[serde(default)]
    pub source: Option<String>,
}

impl QuestionPatch {
    /// Apply the patch in place, keeping stored values for absent fields.
    pub fn apply(self, entity: &mut QuestionEntity) {
        if let Some(question) = self.question {
            entity.question = question;
        }
        if let Some(answer_ai) = self.answer_ai {
            entity.answer_ai = answer_ai;
        }
        if let Some(answer_human) = self.answer_human {
            entity.answer_human = answer_human;
        }
        if let Some(source) = self.source {
            entity.source = source;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(ai: &str, human: &str) -> QuestionEntity {
        QuestionEntity {
            id: "q1".into(),
            question: "Q".into(),
            answer_ai: ai.into(),
            answer_human: human.into(),
            source: "test".into(),
            original_question: None,
            original_answer: None,
            is_translated: false,
        }
    }

    #[test]
    fn playable_requires_both_answers() {
        assert!(entity("a", "h").is_playable());
        assert!(!entity("", "h").is_playable());
        assert!(!entity("a", "  ").is_playable());
    }

    #[test]
    fn wire_shape_uses_original_field_names() {
        let json = serde_json::to_value(entity("a", "h")).unwrap();
        assert!(json.get("answerAI").is_some());
        assert!(json.get("answerHuman").is_some());
        assert_eq!(json.get("isTranslated"), Some(&serde_json::json!(false)));
    }
}
