//! In-memory store for running surveys without a database.
//!
//! `MemoryStore` keeps surveys, responses and answer rows in plain vectors. Useful for
//! tests and demos.
//!
//! # Example
//!
//! ```rust,ignore
//! use eventizer_survey::{EngineConfig, MemoryStore, load_survey_with_questions};
//!
//! let store = MemoryStore::new().with_survey(seed_surveys::vendor_research());
//! let loaded = load_survey_with_questions(&store, Audience::Vendor, &EngineConfig::default())?;
//! ```

use std::collections::HashSet;

use crate::{
    Answer, Audience, LoadedSurvey, QuestionId, Respondent, Response, ResponseId, SurveyId,
    SurveySelector, SurveyStore,
};

/// A store that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    surveys: Vec<LoadedSurvey>,
    responses: Vec<Response>,
    answers: Vec<Answer>,
    read_only: bool,
}

/// Error type for MemoryStore.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("Response {response} already has an answer for question {question}")]
    DuplicateAnswer {
        response: ResponseId,
        question: QuestionId,
    },

    #[error("Question {question} is not part of the survey answered by response {response}")]
    UnknownQuestion {
        response: ResponseId,
        question: QuestionId,
    },

    #[error("Unknown response: {0}")]
    UnknownResponse(ResponseId),

    #[error("Unknown survey: {0}")]
    UnknownSurvey(SurveyId),

    #[error("Store is read-only")]
    WritesDisabled,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a survey with its questions.
    pub fn with_survey(mut self, survey: LoadedSurvey) -> Self {
        self.insert_survey(survey);
        self
    }

    /// Refuse every write from now on.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Add or replace a survey with its questions.
    pub fn insert_survey(&mut self, survey: LoadedSurvey) {
        self.surveys.retain(|s| s.survey.id != survey.survey.id);
        self.surveys.push(survey);
    }

    pub fn surveys(&self) -> &[LoadedSurvey] {
        &self.surveys
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    fn active_for(&self, audience: Audience) -> Option<&LoadedSurvey> {
        self.surveys
            .iter()
            .filter(|s| s.survey.is_active && s.survey.target_audience == audience)
            .max_by_key(|s| s.survey.created_at)
    }

    fn check_writable(&self) -> Result<(), MemoryStoreError> {
        if self.read_only {
            return Err(MemoryStoreError::WritesDisabled);
        }
        Ok(())
    }
}

impl SurveyStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load_survey(&self, selector: &SurveySelector) -> Result<Option<LoadedSurvey>, Self::Error> {
        let found = match selector {
            SurveySelector::Id(id) => self.surveys.iter().find(|s| s.survey.id == *id),
            SurveySelector::Audience(audience) => self
                .active_for(*audience)
                .or_else(|| self.active_for(Audience::All)),
        };
        Ok(found.cloned())
    }

    fn load_responses(&self, survey: SurveyId) -> Result<Vec<Response>, Self::Error> {
        let mut responses: Vec<_> = self
            .responses
            .iter()
            .filter(|r| r.survey_id == survey)
            .cloned()
            .collect();
        responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(responses)
    }

    fn load_answers(&self, responses: &[ResponseId]) -> Result<Vec<Answer>, Self::Error> {
        let wanted: HashSet<&ResponseId> = responses.iter().collect();
        Ok(self
            .answers
            .iter()
            .filter(|a| wanted.contains(&a.response_id))
            .cloned()
            .collect())
    }

    fn create_response(
        &mut self,
        survey: SurveyId,
        respondent: &Respondent,
    ) -> Result<Response, Self::Error> {
        self.check_writable()?;
        if !self.surveys.iter().any(|s| s.survey.id == survey) {
            return Err(MemoryStoreError::UnknownSurvey(survey));
        }
        let response = Response::new(survey, respondent.clone());
        self.responses.push(response.clone());
        Ok(response)
    }

    fn create_answers(&mut self, answers: &[Answer]) -> Result<(), Self::Error> {
        self.check_writable()?;

        let mut seen: HashSet<(ResponseId, QuestionId)> = self
            .answers
            .iter()
            .map(|a| (a.response_id, a.question_id))
            .collect();
        for answer in answers {
            let Some(response) = self.responses.iter().find(|r| r.id == answer.response_id) else {
                return Err(MemoryStoreError::UnknownResponse(answer.response_id));
            };
            let known = self
                .surveys
                .iter()
                .filter(|s| s.survey.id == response.survey_id)
                .flat_map(|s| &s.questions)
                .any(|q| q.id() == answer.question_id);
            if !known {
                return Err(MemoryStoreError::UnknownQuestion {
                    response: answer.response_id,
                    question: answer.question_id,
                });
            }
            if !seen.insert((answer.response_id, answer.question_id)) {
                return Err(MemoryStoreError::DuplicateAnswer {
                    response: answer.response_id,
                    question: answer.question_id,
                });
            }
        }

        self.answers.extend_from_slice(answers);
        Ok(())
    }

    fn delete_response(&mut self, response: ResponseId) -> Result<bool, Self::Error> {
        self.check_writable()?;
        let before = self.responses.len();
        self.responses.retain(|r| r.id != response);
        self.answers.retain(|a| a.response_id != response);
        Ok(self.responses.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Question, QuestionKind, Survey};

    const COMMENTS: QuestionId = QuestionId::from_u128(5);

    fn with_comments(mut loaded: LoadedSurvey) -> LoadedSurvey {
        let survey = loaded.survey.id;
        loaded
            .questions
            .push(Question::new(COMMENTS, survey, 1, "Comments", QuestionKind::Text));
        loaded
    }

    fn survey(n: u128, audience: Audience, day: u32) -> LoadedSurvey {
        LoadedSurvey::new(
            Survey::new(SurveyId::from_u128(n), format!("Survey {n}"), audience)
                .with_created_at(Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap()),
            Vec::new(),
        )
    }

    fn loaded_id(store: &MemoryStore, selector: impl Into<SurveySelector>) -> Option<SurveyId> {
        store
            .load_survey(&selector.into())
            .unwrap()
            .map(|s| s.survey.id)
    }

    #[test]
    fn most_recent_active_survey_wins() {
        let store = MemoryStore::new()
            .with_survey(survey(1, Audience::Vendor, 1))
            .with_survey(survey(2, Audience::Vendor, 5))
            .with_survey(survey(3, Audience::Customer, 9));
        assert_eq!(loaded_id(&store, Audience::Vendor), Some(SurveyId::from_u128(2)));
    }

    #[test]
    fn inactive_surveys_are_skipped_and_all_is_the_fallback() {
        let mut inactive = survey(1, Audience::Customer, 7);
        inactive.survey = inactive.survey.inactive();
        let store = MemoryStore::new()
            .with_survey(inactive)
            .with_survey(survey(2, Audience::All, 1));

        assert_eq!(loaded_id(&store, Audience::Customer), Some(SurveyId::from_u128(2)));
        assert_eq!(loaded_id(&store, SurveyId::from_u128(1)), Some(SurveyId::from_u128(1)));
        assert_eq!(loaded_id(&store, SurveyId::from_u128(9)), None);
    }

    #[test]
    fn duplicate_answers_are_rejected() {
        let mut store = MemoryStore::new().with_survey(with_comments(survey(1, Audience::All, 1)));
        let response = store
            .create_response(SurveyId::from_u128(1), &Respondent::anonymous())
            .unwrap();
        let q = COMMENTS;

        let err = store
            .create_answers(&[Answer::new(response.id, q, "a"), Answer::new(response.id, q, "b")])
            .unwrap_err();
        assert!(matches!(err, MemoryStoreError::DuplicateAnswer { .. }));
        assert!(store.answers().is_empty());
    }

    #[test]
    fn answers_to_foreign_questions_are_rejected() {
        let mut store = MemoryStore::new()
            .with_survey(with_comments(survey(1, Audience::All, 1)))
            .with_survey(survey(2, Audience::Vendor, 1));
        let response = store
            .create_response(SurveyId::from_u128(2), &Respondent::anonymous())
            .unwrap();

        let err = store
            .create_answers(&[Answer::new(response.id, COMMENTS, "a")])
            .unwrap_err();
        assert!(matches!(err, MemoryStoreError::UnknownQuestion { question, .. } if question == COMMENTS));
        assert!(store.answers().is_empty());
    }

    #[test]
    fn deleting_a_response_drops_its_answers() {
        let mut store = MemoryStore::new().with_survey(with_comments(survey(1, Audience::All, 1)));
        let kept = store
            .create_response(SurveyId::from_u128(1), &Respondent::anonymous())
            .unwrap();
        let dropped = store
            .create_response(SurveyId::from_u128(1), &Respondent::anonymous())
            .unwrap();
        store
            .create_answers(&[
                Answer::new(kept.id, COMMENTS, "keep"),
                Answer::new(dropped.id, COMMENTS, "drop"),
            ])
            .unwrap();

        assert!(store.delete_response(dropped.id).unwrap());
        assert!(!store.delete_response(dropped.id).unwrap());
        assert_eq!(store.response_count(), 1);
        let texts: Vec<_> = store.answers().iter().map(|a| a.answer_text.as_str()).collect();
        assert_eq!(texts, vec!["keep"]);
    }

    #[test]
    fn read_only_store_refuses_writes() {
        let mut store = MemoryStore::new()
            .with_survey(survey(1, Audience::All, 1))
            .read_only();
        let err = store
            .create_response(SurveyId::from_u128(1), &Respondent::anonymous())
            .unwrap_err();
        assert!(matches!(err, MemoryStoreError::WritesDisabled));
    }
}
