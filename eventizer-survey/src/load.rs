use tracing::debug;

use crate::{EngineConfig, LoadedSurvey, SurveyError, SurveySelector, SurveyStore};

/// Load a survey with its questions sorted by display position.
///
/// Surveys seeded without roles or categories are annotated from `config.visibility`.
/// Fails with `SurveyError::NotFound` when the store has no matching survey.
pub fn load_survey_with_questions<S: SurveyStore>(
    store: &S,
    selector: impl Into<SurveySelector>,
    config: &EngineConfig,
) -> Result<LoadedSurvey, SurveyError> {
    let selector = selector.into();
    let mut loaded = store
        .load_survey(&selector)
        .map_err(|e| SurveyError::Store(e.into()))?
        .ok_or(SurveyError::NotFound(selector))?;

    loaded.sort_questions();
    config.visibility.annotate(&mut loaded.questions);

    debug!(
        survey = %loaded.survey.id,
        questions = loaded.questions.len(),
        "loaded survey"
    );
    Ok(loaded)
}
