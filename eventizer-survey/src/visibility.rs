//! Decides which questions a respondent sees.

use tracing::debug;

use crate::{
    AnswerDraft, DraftValue, MULTI_SELECT_SEPARATOR, Question, Visibility, VisibilityRules,
};

/// Resolves question visibility from the selector answer.
///
/// Resolution is a pure function of the questions and the draft; callers re-run it
/// whenever the draft changes.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'a> {
    rules: &'a VisibilityRules,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(rules: &'a VisibilityRules) -> Self {
        Self { rules }
    }

    /// The first question with the selector role, if any.
    pub fn selector<'q>(&self, questions: &'q [Question]) -> Option<&'q Question> {
        questions.iter().find(|q| q.is_selector())
    }

    /// The current selector answer as text, or `None` while it is unanswered.
    ///
    /// Multi-select selector answers are joined, so a keyword matches if any picked label contains it.
    pub fn selector_answer(&self, questions: &[Question], draft: &AnswerDraft) -> Option<String> {
        let selector = self.selector(questions)?;
        let value = draft.get(&selector.id())?;
        if value.is_blank() {
            return None;
        }
        Some(match value {
            DraftValue::Text(s) => s.trim().to_string(),
            DraftValue::Rating(r) => r.to_string(),
            DraftValue::Boolean(b) => b.to_string(),
            DraftValue::Choice { selected, .. } => selected.join(MULTI_SELECT_SEPARATOR),
        })
    }

    /// Check a single question against an already computed selector answer.
    pub fn is_visible(&self, question: &Question, selector_answer: Option<&str>) -> bool {
        match question.visibility() {
            Visibility::Always => true,
            Visibility::Category(tag) => {
                selector_answer.is_some_and(|answer| self.rules.matches(tag, answer))
            }
        }
    }

    /// The questions to render, validate and submit, in their original order.
    ///
    /// While the selector is unanswered only `Always` questions are visible.
    pub fn visible<'q>(&self, questions: &'q [Question], draft: &AnswerDraft) -> Vec<&'q Question> {
        let selector_answer = self.selector_answer(questions, draft);
        let visible: Vec<_> = questions
            .iter()
            .filter(|q| self.is_visible(q, selector_answer.as_deref()))
            .collect();
        debug!(
            selector_answer = selector_answer.as_deref().unwrap_or(""),
            visible = visible.len(),
            total = questions.len(),
            "resolved visibility"
        );
        visible
    }

    /// Drop answers to questions that are no longer visible.
    pub fn prune(&self, questions: &[Question], draft: AnswerDraft) -> AnswerDraft {
        let visible: Vec<_> = self.visible(questions, &draft).iter().map(|q| q.id()).collect();
        draft.retain(|id| visible.contains(id))
    }
}
