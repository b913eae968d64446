use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SurveyId;

/// Who a survey is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Customer,
    Vendor,
    All,
}

impl Audience {
    /// The storage form of this audience.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown audience '{0}' (expected customer, vendor or all)")]
pub struct ParseAudienceError(String);

impl FromStr for Audience {
    type Err = ParseAudienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            "all" => Ok(Self::All),
            _ => Err(ParseAudienceError(s.to_string())),
        }
    }
}

/// A survey header. Its questions are stored separately and keyed by `SurveyId`.
///
/// By convention only one survey is active per audience at a time. Nothing enforces this;
/// lookups pick the most recently created active survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    pub description: Option<String>,
    pub target_audience: Audience,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Survey {
    /// Create an active survey for the given audience.
    pub fn new(id: SurveyId, title: impl Into<String>, target_audience: Audience) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            target_audience,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Mark the survey inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// How a caller asks for a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveySelector {
    /// A specific survey, active or not.
    Id(SurveyId),

    /// The active survey for an audience.
    Audience(Audience),
}

impl fmt::Display for SurveySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "survey {id}"),
            Self::Audience(audience) => write!(f, "active {audience} survey"),
        }
    }
}

impl From<SurveyId> for SurveySelector {
    fn from(id: SurveyId) -> Self {
        Self::Id(id)
    }
}

impl From<Audience> for SurveySelector {
    fn from(audience: Audience) -> Self {
        Self::Audience(audience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_parses_case_insensitively() {
        assert_eq!("Vendor".parse::<Audience>().unwrap(), Audience::Vendor);
        assert_eq!(" all ".parse::<Audience>().unwrap(), Audience::All);
        assert!("admin".parse::<Audience>().is_err());
    }

    #[test]
    fn selector_display() {
        let selector = SurveySelector::from(Audience::Customer);
        assert_eq!(selector.to_string(), "active customer survey");
    }
}
