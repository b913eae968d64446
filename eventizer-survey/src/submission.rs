//! Validation and persistence of a respondent's draft.

use tracing::{debug, info, warn};

use crate::{
    Answer, AnswerDraft, AnswerValue, EngineConfig, LoadedSurvey, Question, QuestionId,
    Respondent, Response, SurveyError, SurveyStore, VisibilityResolver, encode, is_answered,
};

/// Validate a draft and turn it into typed answers, ready to store.
///
/// Only visible questions are considered, so answers left behind by a changed selector
/// answer are dropped. Fails with the first `SurveyError::Encoding` found, otherwise with
/// `SurveyError::Validation` listing every required visible question without a valid answer.
pub fn prepare_submission(
    questions: &[Question],
    draft: &AnswerDraft,
    config: &EngineConfig,
) -> Result<Vec<(QuestionId, AnswerValue)>, SurveyError> {
    let resolver = VisibilityResolver::new(&config.visibility);

    let mut answers = Vec::new();
    let mut missing = Vec::new();

    for question in resolver.visible(questions, draft) {
        let Some(value) = draft.get(&question.id()) else {
            if question.is_required() {
                missing.push(question.id());
            }
            continue;
        };

        if question.is_required() && !is_answered(value, config) {
            missing.push(question.id());
            continue;
        }

        if let Some(encoded) = encode(question, value, config)? {
            answers.push((question.id(), encoded));
        }
    }

    if !missing.is_empty() {
        debug!(missing = missing.len(), "submission rejected");
        return Err(SurveyError::Validation { missing });
    }

    Ok(answers)
}

/// Validate and store a draft as a new response.
///
/// Nothing is written unless the draft validates. If the answer rows cannot be stored, the
/// new response row is deleted again so no answerless response is left behind. Store failures
/// are returned unchanged as `SurveyError::Store`; nothing is retried.
pub fn submit<S: SurveyStore>(
    store: &mut S,
    loaded: &LoadedSurvey,
    draft: &AnswerDraft,
    respondent: &Respondent,
    config: &EngineConfig,
) -> Result<Response, SurveyError> {
    let answers = prepare_submission(&loaded.questions, draft, config)?;

    let response = store
        .create_response(loaded.survey.id, respondent)
        .map_err(|e| SurveyError::Store(e.into()))?;

    let rows: Vec<Answer> = answers
        .iter()
        .map(|(question, value)| Answer::from_value(response.id, *question, value))
        .collect();

    if !rows.is_empty() {
        if let Err(err) = store.create_answers(&rows) {
            if let Err(cleanup) = store.delete_response(response.id) {
                let cleanup: anyhow::Error = cleanup.into();
                warn!(response = %response.id, error = %cleanup, "could not remove response without answers");
            }
            return Err(SurveyError::Store(err.into()));
        }
    }

    info!(
        survey = %loaded.survey.id,
        response = %response.id,
        answers = rows.len(),
        anonymous = respondent.is_anonymous(),
        "stored survey response"
    );
    Ok(response)
}
