use std::fmt;

use serde::{Deserialize, Serialize};

/// Joins the labels of a multi-select answer in its stored form.
pub const MULTI_SELECT_SEPARATOR: &str = ", ";

/// Joins an "other" label and its companion text in the stored form.
pub const OTHER_TEXT_SEPARATOR: &str = ": ";

/// One selected label of a choice answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    /// A label picked as-is.
    Label(String),

    /// An "other" label together with the text the respondent typed next to it.
    Other { label: String, text: String },
}

impl Choice {
    /// The label this choice is counted under when reporting.
    pub fn label(&self) -> &str {
        match self {
            Self::Label(label) | Self::Other { label, .. } => label,
        }
    }

    /// The companion text, if any.
    pub fn other_text(&self) -> Option<&str> {
        match self {
            Self::Label(_) => None,
            Self::Other { text, .. } => Some(text),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Other { label, text } => write!(f, "{label}{OTHER_TEXT_SEPARATOR}{text}"),
        }
    }
}

/// A validated answer to one question.
///
/// This is the in-memory form. It is flattened into `Answer::answer_text`
/// only when written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    /// One label of a single-select choice question.
    Single(Choice),

    /// The labels of a multi-select choice question, in selection order.
    Multi(Vec<Choice>),

    /// A yes/no answer.
    Boolean(bool),

    /// A rating within the question's bounds.
    Rating(u8),

    /// Free text.
    FreeText(String),
}

impl AnswerValue {
    /// Flatten into the stored `answer_text` form.
    pub fn to_answer_text(&self) -> String {
        match self {
            Self::Single(choice) => choice.to_string(),
            Self::Multi(choices) => choices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(MULTI_SELECT_SEPARATOR),
            Self::Boolean(b) => b.to_string(),
            Self::Rating(r) => r.to_string(),
            Self::FreeText(text) => text.clone(),
        }
    }

    /// The labels this answer is counted under when reporting.
    ///
    /// Free text has no labels.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Single(choice) => vec![choice.label().to_string()],
            Self::Multi(choices) => choices.iter().map(|c| c.label().to_string()).collect(),
            Self::Boolean(b) => vec![b.to_string()],
            Self::Rating(r) => vec![r.to_string()],
            Self::FreeText(_) => Vec::new(),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Single(_) => "Single",
            Self::Multi(_) => "Multi",
            Self::Boolean(_) => "Boolean",
            Self::Rating(_) => "Rating",
            Self::FreeText(_) => "FreeText",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_answer_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_other_choice_with_companion_text() {
        let value = AnswerValue::Single(Choice::Other {
            label: "Other".into(),
            text: "Lighting".into(),
        });
        assert_eq!(value.to_answer_text(), "Other: Lighting");
        assert_eq!(value.labels(), vec!["Other"]);
    }

    #[test]
    fn flattens_multi_select_in_selection_order() {
        let value = AnswerValue::Multi(vec![
            Choice::Label("B".into()),
            Choice::Label("A".into()),
            Choice::Other {
                label: "Other".into(),
                text: "Custom".into(),
            },
        ]);
        assert_eq!(value.to_answer_text(), "B, A, Other: Custom");
        assert_eq!(value.labels(), vec!["B", "A", "Other"]);
    }

    #[test]
    fn flattens_scalars() {
        assert_eq!(AnswerValue::Boolean(false).to_answer_text(), "false");
        assert_eq!(AnswerValue::Rating(4).to_answer_text(), "4");
        assert_eq!(AnswerValue::FreeText("hi".into()).to_answer_text(), "hi");
        assert!(AnswerValue::FreeText("hi".into()).labels().is_empty());
    }
}
