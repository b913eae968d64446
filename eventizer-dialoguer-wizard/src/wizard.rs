//! Dialoguer prompts for Eventizer surveys.

use std::collections::HashSet;

use dialoguer::{
    Confirm, FuzzySelect, Input, MultiSelect, Select,
    theme::{ColorfulTheme, SimpleTheme, Theme},
};
use eventizer_survey::{
    AnswerDraft, ChoiceQuestion, DraftValue, EngineConfig, LoadedSurvey, Question, QuestionId,
    QuestionKind, RatingQuestion, SurveyError, VisibilityResolver, encode, is_answered,
    prepare_submission,
};
use thiserror::Error;
use tracing::debug;

/// Choice questions with more options than this get a fuzzy finder.
const FUZZY_SELECT_THRESHOLD: usize = 8;

const SKIP: &str = "Skip";

/// Error type for the Dialoguer wizard.
#[derive(Debug, Error)]
pub enum WizardError {
    /// User cancelled the survey (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    #[error(transparent)]
    Survey(#[from] SurveyError),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn interact<T>(result: Result<T, dialoguer::Error>) -> Result<T, WizardError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if is_cancelled(&e) => Err(WizardError::Cancelled),
        Err(e) => Err(WizardError::Dialoguer(e)),
    }
}

/// Step-by-step survey wizard for the terminal.
#[derive(Debug, Default, Clone)]
pub struct DialoguerWizard {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerWizard {
    /// Create a new wizard with the colorful theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a wizard with the plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Ask every visible question and return a draft that passes validation.
    ///
    /// Required questions left unanswered are asked again before returning.
    pub fn fill(&self, loaded: &LoadedSurvey, config: &EngineConfig) -> Result<AnswerDraft, WizardError> {
        let resolver = VisibilityResolver::new(&config.visibility);
        let questions = &loaded.questions;

        println!("{}", loaded.survey.title);
        if let Some(description) = &loaded.survey.description {
            println!("{description}");
        }
        println!();

        let mut draft = AnswerDraft::new();
        let mut asked: HashSet<QuestionId> = HashSet::new();

        loop {
            while let Some(question) = next_question(&resolver, questions, &draft, &asked) {
                let value = self.ask(question, config)?;
                asked.insert(question.id());

                draft = match value {
                    Some(value) => draft.with_value(question.id(), value),
                    None => draft.without(question.id()),
                };
                draft = resolver.prune(questions, draft);

                let visible: HashSet<QuestionId> = resolver
                    .visible(questions, &draft)
                    .iter()
                    .map(|q| q.id())
                    .collect();
                asked.retain(|id| visible.contains(id));
            }

            match prepare_submission(questions, &draft, config) {
                Ok(answers) => {
                    debug!(answers = answers.len(), "wizard finished");
                    return Ok(draft);
                }
                Err(SurveyError::Validation { missing }) => {
                    println!("Some required questions still need an answer.");
                    for id in &missing {
                        asked.remove(id);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Ask one question until the input is usable. `None` means skipped.
    fn ask(&self, question: &Question, config: &EngineConfig) -> Result<Option<DraftValue>, WizardError> {
        let prompt = prompt_label(question);
        if let Some(description) = question.description() {
            println!("{description}");
        }

        loop {
            let value = match question.kind() {
                QuestionKind::Text => self.ask_text(&prompt)?,
                QuestionKind::Rating(rating) => {
                    self.ask_rating(&prompt, rating, question.is_required())?
                }
                QuestionKind::Boolean => self.ask_boolean(&prompt, question.is_required())?,
                QuestionKind::Choice(choice) if choice.multi_select => {
                    self.ask_multi_choice(&prompt, choice, config)?
                }
                QuestionKind::Choice(choice) => {
                    self.ask_single_choice(&prompt, choice, question.is_required(), config)?
                }
            };

            let Some(value) = value else {
                if question.is_required() {
                    println!("Error: this question is required");
                    continue;
                }
                return Ok(None);
            };

            if question.is_required() && !is_answered(&value, config) {
                println!("Error: please tell us a bit more");
                continue;
            }

            match encode(question, &value, config) {
                Ok(_) => return Ok(Some(value)),
                Err(err) => println!("Error: {err}"),
            }
        }
    }

    fn ask_text(&self, prompt: &str) -> Result<Option<DraftValue>, WizardError> {
        let theme = self.theme();
        let value: String = interact(
            Input::with_theme(theme.as_ref())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text(),
        )?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| DraftValue::Text(value.to_string())))
    }

    fn ask_rating(
        &self,
        prompt: &str,
        rating: &RatingQuestion,
        required: bool,
    ) -> Result<Option<DraftValue>, WizardError> {
        let theme = self.theme();
        let items = rating_items(rating, required);
        let index = interact(
            Select::with_theme(theme.as_ref())
                .with_prompt(prompt)
                .items(&items)
                .default(0)
                .interact(),
        )?;
        Ok(rating_from_index(rating, index).map(DraftValue::Rating))
    }

    fn ask_boolean(&self, prompt: &str, required: bool) -> Result<Option<DraftValue>, WizardError> {
        let theme = self.theme();
        if required {
            let value = interact(
                Confirm::with_theme(theme.as_ref())
                    .with_prompt(prompt)
                    .default(true)
                    .interact(),
            )?;
            return Ok(Some(DraftValue::Boolean(value)));
        }

        let index = interact(
            Select::with_theme(theme.as_ref())
                .with_prompt(prompt)
                .items(&["Yes", "No", SKIP])
                .default(0)
                .interact(),
        )?;
        Ok(match index {
            0 => Some(DraftValue::Boolean(true)),
            1 => Some(DraftValue::Boolean(false)),
            _ => None,
        })
    }

    fn ask_single_choice(
        &self,
        prompt: &str,
        choice: &ChoiceQuestion,
        required: bool,
        config: &EngineConfig,
    ) -> Result<Option<DraftValue>, WizardError> {
        let theme = self.theme();
        let items = choice_items(choice, required);

        let index = if choice.options.len() > FUZZY_SELECT_THRESHOLD {
            interact(
                FuzzySelect::with_theme(theme.as_ref())
                    .with_prompt(prompt)
                    .items(&items)
                    .default(0)
                    .interact(),
            )?
        } else {
            interact(
                Select::with_theme(theme.as_ref())
                    .with_prompt(prompt)
                    .items(&items)
                    .default(0)
                    .interact(),
            )?
        };

        let Some(label) = choice.options.get(index) else {
            return Ok(None);
        };

        let mut value = DraftValue::choice(label.clone());
        if config.is_other_sentinel(label) {
            value = value.with_other_text(self.ask_other_text()?);
        }
        Ok(Some(value))
    }

    fn ask_multi_choice(
        &self,
        prompt: &str,
        choice: &ChoiceQuestion,
        config: &EngineConfig,
    ) -> Result<Option<DraftValue>, WizardError> {
        let theme = self.theme();
        let indices = interact(
            MultiSelect::with_theme(theme.as_ref())
                .with_prompt(prompt)
                .items(&choice.options)
                .interact(),
        )?;

        let selected: Vec<&String> = indices.iter().filter_map(|&i| choice.options.get(i)).collect();
        if selected.is_empty() {
            return Ok(None);
        }

        let mut value = DraftValue::choices(selected.iter().map(|s| s.as_str()));
        if needs_other_text(selected.iter().map(|s| s.as_str()), config) {
            value = value.with_other_text(self.ask_other_text()?);
        }
        Ok(Some(value))
    }

    fn ask_other_text(&self) -> Result<String, WizardError> {
        let theme = self.theme();
        interact(
            Input::with_theme(theme.as_ref())
                .with_prompt("Please specify")
                .allow_empty(true)
                .interact_text(),
        )
    }
}

/// The first visible question that has not been asked yet.
fn next_question<'q>(
    resolver: &VisibilityResolver<'_>,
    questions: &'q [Question],
    draft: &AnswerDraft,
    asked: &HashSet<QuestionId>,
) -> Option<&'q Question> {
    resolver
        .visible(questions, draft)
        .into_iter()
        .find(|q| !asked.contains(&q.id()))
}

fn prompt_label(question: &Question) -> String {
    if question.is_required() {
        format!("{} *", question.text())
    } else {
        question.text().to_string()
    }
}

fn rating_items(rating: &RatingQuestion, required: bool) -> Vec<String> {
    let mut items: Vec<String> = (rating.min..=rating.max).map(|r| r.to_string()).collect();
    if !required {
        items.push(SKIP.to_string());
    }
    items
}

fn rating_from_index(rating: &RatingQuestion, index: usize) -> Option<i64> {
    let value = i64::from(rating.min) + i64::try_from(index).ok()?;
    (value <= i64::from(rating.max)).then_some(value)
}

fn choice_items(choice: &ChoiceQuestion, required: bool) -> Vec<String> {
    let mut items = choice.options.clone();
    if !required {
        items.push(SKIP.to_string());
    }
    items
}

fn needs_other_text<'a>(mut selected: impl Iterator<Item = &'a str>, config: &EngineConfig) -> bool {
    selected.any(|label| config.is_other_sentinel(label))
}
