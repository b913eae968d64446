use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{QuestionId, SurveyId};

/// Lowest rating accepted when a rating question does not say otherwise.
pub const DEFAULT_RATING_MIN: u8 = 1;

/// Highest rating accepted when a rating question does not say otherwise.
pub const DEFAULT_RATING_MAX: u8 = 5;

/// A single question in a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    survey_id: SurveyId,

    /// The prompt text shown to the respondent.
    text: String,

    /// The kind of question (determines input type and answer encoding).
    kind: QuestionKind,

    /// Display position, unique within a survey.
    order_index: i32,

    is_required: bool,

    description: Option<String>,

    /// Whether this question drives the visibility of others.
    #[serde(default)]
    role: QuestionRole,

    /// When this question is shown.
    #[serde(default)]
    visibility: Visibility,
}

impl Question {
    /// Create a new optional question that is always visible.
    pub fn new(
        id: QuestionId,
        survey_id: SurveyId,
        order_index: i32,
        text: impl Into<String>,
        kind: QuestionKind,
    ) -> Self {
        Self {
            id,
            survey_id,
            text: text.into(),
            kind,
            order_index,
            is_required: false,
            description: None,
            role: QuestionRole::Normal,
            visibility: Visibility::Always,
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Set the helper text shown under the prompt.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Make this the survey's selector question.
    pub fn selector(mut self) -> Self {
        self.role = QuestionRole::Selector;
        self
    }

    /// Only show this question when the selector answer matches the given category.
    pub fn visible_for(mut self, tag: impl Into<VisibilityTag>) -> Self {
        self.visibility = Visibility::Category(tag.into());
        self
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    /// Get the prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn role(&self) -> QuestionRole {
        self.role
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Change the role. Used when annotating legacy surveys.
    pub fn set_role(&mut self, role: QuestionRole) {
        self.role = role;
    }

    /// Change the visibility. Used when annotating legacy surveys.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    /// Check if this is the selector question.
    pub fn is_selector(&self) -> bool {
        self.role == QuestionRole::Selector
    }

    /// Check if answers to this question hold several labels.
    pub fn is_multi_select(&self) -> bool {
        matches!(&self.kind, QuestionKind::Choice(choice) if choice.multi_select)
    }
}

/// The kind of question, determining input type and answer encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free text.
    Text,

    /// An integer score within bounds.
    Rating(RatingQuestion),

    /// Pick one or several labels.
    Choice(ChoiceQuestion),

    /// Yes/no.
    Boolean,
}

impl QuestionKind {
    /// The storage name of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Rating(_) => "rating",
            Self::Choice(_) => "choice",
            Self::Boolean => "boolean",
        }
    }

    /// A 1-5 rating.
    pub fn rating() -> Self {
        Self::Rating(RatingQuestion::default())
    }

    /// Pick exactly one of the given options.
    pub fn single_choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(ChoiceQuestion::single(options))
    }

    /// Pick any number of the given options.
    pub fn multi_choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(ChoiceQuestion::multi(options))
    }

    /// Check if answers are grouped into label buckets when reporting.
    pub fn is_countable(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// Configuration for a rating question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingQuestion {
    pub min: u8,
    pub max: u8,
}

impl RatingQuestion {
    /// Create with bounds.
    pub fn with_bounds(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Check whether a value is within bounds.
    pub fn accepts(&self, value: i64) -> bool {
        (i64::from(self.min)..=i64::from(self.max)).contains(&value)
    }
}

impl Default for RatingQuestion {
    fn default() -> Self {
        Self {
            min: DEFAULT_RATING_MIN,
            max: DEFAULT_RATING_MAX,
        }
    }
}

/// Configuration for a choice question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    /// The labels to choose from, in display order.
    pub options: Vec<String>,

    /// Whether several labels may be picked.
    #[serde(default)]
    pub multi_select: bool,
}

impl ChoiceQuestion {
    /// Create a single-select question.
    pub fn single<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            multi_select: false,
        }
    }

    /// Create a multi-select question.
    pub fn multi<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            multi_select: true,
            ..Self::single(options)
        }
    }

    /// Get the options.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Check if a label is one of the declared options.
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| o == label)
    }
}

/// Whether a question drives the visibility of others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionRole {
    #[default]
    Normal,

    /// The "what service do you offer" question. Its answer picks which category questions show.
    Selector,
}

/// A category key, e.g. `photography`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityTag(String);

impl VisibilityTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisibilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VisibilityTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VisibilityTag {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// When a question is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Always,

    /// Shown only while the selector answer matches this category.
    Category(VisibilityTag),
}

impl Visibility {
    /// Get the category tag, if any.
    pub fn tag(&self) -> Option<&VisibilityTag> {
        match self {
            Self::Always => None,
            Self::Category(tag) => Some(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: QuestionKind) -> Question {
        Question::new(
            QuestionId::from_u128(1),
            SurveyId::from_u128(1),
            0,
            "How was it?",
            kind,
        )
    }

    #[test]
    fn builder_sets_configuration() {
        let q = question(QuestionKind::single_choice(["A", "B"]))
            .required()
            .selector();
        assert!(q.is_required());
        assert!(q.is_selector());
        assert_eq!(q.visibility(), &Visibility::Always);

        let q = question(QuestionKind::Text).visible_for("photography");
        assert_eq!(q.visibility().tag().map(|t| t.as_str()), Some("photography"));
    }

    #[test]
    fn multi_select_flag_comes_from_configuration() {
        assert!(question(QuestionKind::multi_choice(["A"])).is_multi_select());
        assert!(!question(QuestionKind::single_choice(["A"])).is_multi_select());
        assert!(!question(QuestionKind::Text).is_multi_select());
    }

    #[test]
    fn rating_bounds() {
        let rating = RatingQuestion::default();
        assert!(rating.accepts(1));
        assert!(rating.accepts(5));
        assert!(!rating.accepts(0));
        assert!(!rating.accepts(6));
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let json = serde_json::to_value(QuestionKind::multi_choice(["A", "B"])).unwrap();
        assert_eq!(json["type"], "choice");
        assert_eq!(json["multi_select"], true);

        let back: QuestionKind = serde_json::from_value(json).unwrap();
        assert!(matches!(back, QuestionKind::Choice(c) if c.multi_select));
    }
}
