//! Engine configuration: category keywords, "other" sentinels, report labels.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Question, QuestionRole, Visibility, VisibilityTag};

/// Error type for loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the engine needs to know that is not part of a survey's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How selector answers map to question categories.
    pub visibility: VisibilityRules,

    /// Option labels that come with a free-text companion ("أخرى", "Other").
    pub other_sentinels: Vec<String>,

    /// Bucket label for responses without an answer to a question.
    pub skipped_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            visibility: VisibilityRules::eventizer(),
            other_sentinels: vec!["أخرى".to_string(), "Other".to_string()],
            skipped_label: "Skipped".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded engine config");
        Self::from_json_str(&json)
    }

    /// Check if a label is an "other" option.
    pub fn is_other_sentinel(&self, label: &str) -> bool {
        self.other_sentinels.iter().any(|s| s == label)
    }
}

/// Keywords that make a category visible when found in the selector answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub tag: VisibilityTag,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(tag: impl Into<VisibilityTag>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag: tag.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// A leading marker in question text that tags legacy questions with a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRule {
    pub marker: String,
    pub tag: VisibilityTag,
}

impl MarkerRule {
    pub fn new(marker: impl Into<String>, tag: impl Into<VisibilityTag>) -> Self {
        Self {
            marker: marker.into(),
            tag: tag.into(),
        }
    }
}

/// Rules connecting the selector answer to category-tagged questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityRules {
    /// Category keywords. Several keywords may map to the same tag.
    pub categories: Vec<CategoryRule>,

    /// Phrases identifying the selector question in surveys seeded without roles.
    pub selector_phrases: Vec<String>,

    /// Leading markers tagging questions in surveys seeded without visibility.
    pub markers: Vec<MarkerRule>,
}

impl VisibilityRules {
    /// The rules used by the Eventizer vendor survey.
    pub fn eventizer() -> Self {
        Self {
            categories: vec![
                CategoryRule::new("photography", ["تصوير", "Photograph"]),
                CategoryRule::new("catering", ["ضيافة", "Catering"]),
                CategoryRule::new("decoration", ["ديكور", "Decor"]),
                CategoryRule::new("music", ["فرقة", "Band", "دي جي", "DJ"]),
            ],
            selector_phrases: vec![
                "نوع الخدمة".to_string(),
                "type of service".to_string(),
                "service type".to_string(),
            ],
            markers: vec![
                MarkerRule::new("📸", "photography"),
                MarkerRule::new("🍽", "catering"),
                MarkerRule::new("🎨", "decoration"),
                MarkerRule::new("🎵", "music"),
            ],
        }
    }

    /// Check if a selector answer shows the given category.
    ///
    /// Unknown tags never match.
    pub fn matches(&self, tag: &VisibilityTag, selector_answer: &str) -> bool {
        self.categories
            .iter()
            .filter(|rule| &rule.tag == tag)
            .flat_map(|rule| rule.keywords.iter())
            .any(|keyword| !keyword.is_empty() && selector_answer.contains(keyword.as_str()))
    }

    /// Fill in roles and visibility for a survey seeded without them.
    ///
    /// Only applies when no question in the survey has a selector role or a category;
    /// explicitly configured surveys are left untouched. Returns whether anything changed.
    pub fn annotate(&self, questions: &mut [Question]) -> bool {
        let configured = questions
            .iter()
            .any(|q| q.is_selector() || q.visibility().tag().is_some());
        if configured {
            return false;
        }

        let mut changed = false;

        let selector = questions.iter_mut().find(|q| {
            let text = q.text().to_lowercase();
            self.selector_phrases
                .iter()
                .any(|phrase| !phrase.is_empty() && text.contains(&phrase.to_lowercase()))
        });
        let selector_id = selector.map(|q| {
            q.set_role(QuestionRole::Selector);
            q.id()
        });
        changed |= selector_id.is_some();

        for question in questions.iter_mut() {
            if Some(question.id()) == selector_id {
                continue;
            }
            let text = question.text().trim_start();
            if let Some(rule) = self
                .markers
                .iter()
                .find(|rule| !rule.marker.is_empty() && text.starts_with(rule.marker.as_str()))
            {
                question.set_visibility(Visibility::Category(rule.tag.clone()));
                changed = true;
            }
        }

        if changed {
            debug!(
                selector = ?selector_id,
                "annotated survey seeded without visibility configuration"
            );
        }
        changed
    }
}
