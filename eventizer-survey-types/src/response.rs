use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AnswerValue, QuestionId, RespondentId, ResponseId, SurveyId};

/// Who submitted a response. Both parts are optional; anonymous responses carry neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub id: Option<RespondentId>,
    pub email: Option<String>,
}

impl Respondent {
    /// A respondent without identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in respondent.
    pub fn account(id: RespondentId, email: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            email: Some(email.into()),
        }
    }

    /// A respondent known only by email.
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: Some(email.into()),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_none() && self.email.is_none()
    }
}

/// One submission of a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: ResponseId,
    pub survey_id: SurveyId,
    pub respondent_id: Option<RespondentId>,
    pub respondent_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Response {
    /// Create a response stamped with the current time.
    pub fn new(survey_id: SurveyId, respondent: Respondent) -> Self {
        Self {
            id: ResponseId::new(),
            survey_id,
            respondent_id: respondent.id,
            respondent_email: respondent.email,
            created_at: Utc::now(),
        }
    }

    /// Set the id.
    pub fn with_id(mut self, id: ResponseId) -> Self {
        self.id = id;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A stored answer row.
///
/// At most one row exists per `(response_id, question_id)`. Questions that were
/// skipped or hidden have no row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub response_id: ResponseId,
    pub question_id: QuestionId,
    pub answer_text: String,
}

impl Answer {
    /// Create a row from raw stored text.
    pub fn new(
        response_id: ResponseId,
        question_id: QuestionId,
        answer_text: impl Into<String>,
    ) -> Self {
        Self {
            response_id,
            question_id,
            answer_text: answer_text.into(),
        }
    }

    /// Flatten a typed answer into a row.
    pub fn from_value(response_id: ResponseId, question_id: QuestionId, value: &AnswerValue) -> Self {
        Self::new(response_id, question_id, value.to_answer_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Choice;

    #[test]
    fn anonymous_response_has_no_identity() {
        let response = Response::new(SurveyId::from_u128(1), Respondent::anonymous());
        assert!(response.respondent_id.is_none());
        assert!(response.respondent_email.is_none());
    }

    #[test]
    fn answer_row_from_value() {
        let row = Answer::from_value(
            ResponseId::from_u128(1),
            QuestionId::from_u128(2),
            &AnswerValue::Single(Choice::Label("Catering".into())),
        );
        assert_eq!(row.answer_text, "Catering");
    }
}
