use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::QuestionId;

/// The raw input for one question, as a form produces it.
///
/// Nothing is validated yet; the encoder turns this into an `AnswerValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftValue {
    /// Typed text. Also accepted for rating ("4") and boolean ("true") questions.
    Text(String),

    /// A picked rating.
    Rating(i64),

    /// A ticked or unticked yes/no box.
    Boolean(bool),

    /// Picked labels in selection order, plus the text typed next to an "other" option.
    Choice {
        selected: Vec<String>,
        other_text: String,
    },
}

impl DraftValue {
    /// A choice with one picked label.
    pub fn choice(label: impl Into<String>) -> Self {
        Self::Choice {
            selected: vec![label.into()],
            other_text: String::new(),
        }
    }

    /// A choice with several picked labels.
    pub fn choices<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice {
            selected: labels.into_iter().map(Into::into).collect(),
            other_text: String::new(),
        }
    }

    /// Attach the "other" companion text. No effect on non-choice values.
    pub fn with_other_text(self, text: impl Into<String>) -> Self {
        match self {
            Self::Choice { selected, .. } => Self::Choice {
                selected,
                other_text: text.into(),
            },
            other => other,
        }
    }

    /// Check if nothing was entered.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Rating(_) | Self::Boolean(_) => false,
            Self::Choice { selected, .. } => selected.is_empty(),
        }
    }
}

impl From<&str> for DraftValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DraftValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for DraftValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for DraftValue {
    fn from(r: i64) -> Self {
        Self::Rating(r)
    }
}

/// A respondent's in-progress answers.
///
/// Drafts are values: every change produces a new draft, and the survey logic
/// only ever reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDraft {
    values: HashMap<QuestionId, DraftValue>,
}

impl AnswerDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Return a draft with the given answer set (replacing any earlier one).
    pub fn with_value(mut self, question: QuestionId, value: impl Into<DraftValue>) -> Self {
        self.values.insert(question, value.into());
        self
    }

    /// Return a draft without an answer for the given question.
    pub fn without(mut self, question: QuestionId) -> Self {
        self.values.remove(&question);
        self
    }

    /// Return a draft keeping only the answers for which `keep` holds.
    pub fn retain(mut self, mut keep: impl FnMut(&QuestionId) -> bool) -> Self {
        self.values.retain(|id, _| keep(id));
        self
    }

    /// Get the raw answer for a question.
    pub fn get(&self, question: &QuestionId) -> Option<&DraftValue> {
        self.values.get(question)
    }

    /// Check if a question has an answer that is not blank.
    pub fn has_value(&self, question: &QuestionId) -> bool {
        self.get(question).is_some_and(|v| !v.is_blank())
    }

    /// Get an iterator over all question-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &DraftValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_value_replaces_earlier_answer() {
        let q = QuestionId::from_u128(1);
        let draft = AnswerDraft::new()
            .with_value(q, DraftValue::choice("Photographer"))
            .with_value(q, DraftValue::choice("Catering"));
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.get(&q), Some(&DraftValue::choice("Catering")));
    }

    #[test]
    fn earlier_draft_is_untouched() {
        let q = QuestionId::from_u128(1);
        let first = AnswerDraft::new().with_value(q, "hello");
        let second = first.clone().without(q);
        assert!(first.has_value(&q));
        assert!(!second.has_value(&q));
    }

    #[test]
    fn blank_values() {
        assert!(DraftValue::from("   ").is_blank());
        assert!(DraftValue::choices(Vec::<String>::new()).is_blank());
        assert!(!DraftValue::from(false).is_blank());
        assert!(!DraftValue::choice("Other").is_blank());
    }

    #[test]
    fn other_text_only_attaches_to_choices() {
        let value = DraftValue::choice("Other").with_other_text("Custom");
        assert!(matches!(value, DraftValue::Choice { ref other_text, .. } if other_text == "Custom"));
        assert_eq!(DraftValue::from(true).with_other_text("x"), DraftValue::Boolean(true));
    }
}
