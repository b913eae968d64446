use serde::{Deserialize, Serialize};

use crate::{Answer, Question, Respondent, Response, ResponseId, Survey, SurveyId, SurveySelector};

/// A survey together with its questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedSurvey {
    pub survey: Survey,
    pub questions: Vec<Question>,
}

impl LoadedSurvey {
    /// Create from parts.
    pub fn new(survey: Survey, questions: Vec<Question>) -> Self {
        Self { survey, questions }
    }

    /// Sort the questions by display position.
    pub fn sort_questions(&mut self) {
        self.questions.sort_by_key(Question::order_index);
    }
}

/// Trait for storage backends that hold surveys and their responses.
///
/// Implementations only move rows. Everything the survey engine decides
/// (visibility, encoding, validation, aggregation) happens before or after a store call.
/// Errors are passed to the caller unchanged; stores do not retry.
pub trait SurveyStore {
    /// The error type for this store.
    type Error: Into<anyhow::Error>;

    /// Load a survey and its questions.
    ///
    /// For `SurveySelector::Audience`, return the most recently created active survey for
    /// that audience, falling back to the most recent active survey for `Audience::All`.
    /// Returns `Ok(None)` if nothing matches. Question order is not guaranteed.
    fn load_survey(&self, selector: &SurveySelector) -> Result<Option<LoadedSurvey>, Self::Error>;

    /// Load all responses of a survey.
    fn load_responses(&self, survey: SurveyId) -> Result<Vec<Response>, Self::Error>;

    /// Load the answer rows of the given responses.
    fn load_answers(&self, responses: &[ResponseId]) -> Result<Vec<Answer>, Self::Error>;

    /// Create a response row for a new submission.
    fn create_response(
        &mut self,
        survey: SurveyId,
        respondent: &Respondent,
    ) -> Result<Response, Self::Error>;

    /// Store answer rows. Either every row is stored or none is.
    fn create_answers(&mut self, answers: &[Answer]) -> Result<(), Self::Error>;

    /// Remove a response and any answer rows stored for it.
    ///
    /// Returns `Ok(false)` if the response does not exist.
    fn delete_response(&mut self, response: ResponseId) -> Result<bool, Self::Error>;
}
