use crate::{QuestionId, SurveySelector};

/// Error type for survey operations.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// One or more required visible questions have no valid answer.
    #[error("{} required question(s) unanswered", missing.len())]
    Validation { missing: Vec<QuestionId> },

    /// An answer does not fit its question's type.
    #[error("Invalid answer for question {question}: {reason}")]
    Encoding { question: QuestionId, reason: String },

    /// No survey matches the request.
    #[error("No {0} found")]
    NotFound(SurveySelector),

    /// Storage failure, passed through unchanged.
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl SurveyError {
    /// Create a store error from any error type.
    pub fn store(err: impl Into<anyhow::Error>) -> Self {
        Self::Store(err.into())
    }

    /// Create an encoding error.
    pub fn encoding(question: QuestionId, reason: impl Into<String>) -> Self {
        Self::Encoding {
            question,
            reason: reason.into(),
        }
    }

    /// Check if the caller can recover by asking the respondent again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(_))
    }

    /// The questions that still need an answer, if this is a validation failure.
    pub fn missing_questions(&self) -> &[QuestionId] {
        match self {
            Self::Validation { missing } => missing,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Audience;

    #[test]
    fn messages() {
        let err = SurveyError::Validation {
            missing: vec![QuestionId::from_u128(1), QuestionId::from_u128(2)],
        };
        assert_eq!(err.to_string(), "2 required question(s) unanswered");
        assert_eq!(err.missing_questions().len(), 2);

        let err = SurveyError::NotFound(SurveySelector::Audience(Audience::Vendor));
        assert_eq!(err.to_string(), "No active vendor survey found");
    }

    #[test]
    fn store_errors_are_not_recoverable() {
        assert!(!SurveyError::store(anyhow::anyhow!("offline")).is_recoverable());
        assert!(SurveyError::encoding(QuestionId::from_u128(1), "bad").is_recoverable());
    }
}
