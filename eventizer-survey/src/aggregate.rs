//! Per-question summaries of all responses to a survey.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    Answer, AnswerValue, EngineConfig, Question, QuestionId, QuestionKind, Response, ResponseId,
    SurveyId, decode,
};

/// One label and how often it was picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
    /// `round(100 * count / total)`, where total includes skipped responses.
    pub percent: u32,
}

/// What was answered to one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakdown {
    /// Choice, boolean and rating questions.
    ///
    /// Multi-select answers count every picked label, so `total` may exceed the number
    /// of responses.
    Counts {
        buckets: Vec<Bucket>,
        total: usize,
        /// Mean of the answered values, for rating questions.
        mean: Option<f64>,
    },

    /// Free-text answers, newest response first.
    FreeText(Vec<String>),
}

impl Breakdown {
    /// The count for a label, if it has a bucket.
    pub fn count(&self, label: &str) -> Option<usize> {
        match self {
            Self::Counts { buckets, .. } => buckets.iter().find(|b| b.label == label).map(|b| b.count),
            Self::FreeText(_) => None,
        }
    }

    /// The percentage for a label, if it has a bucket.
    pub fn percent(&self, label: &str) -> Option<u32> {
        match self {
            Self::Counts { buckets, .. } => {
                buckets.iter().find(|b| b.label == label).map(|b| b.percent)
            }
            Self::FreeText(_) => None,
        }
    }
}

/// The summary of one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub question_id: QuestionId,
    pub text: String,
    pub order_index: i32,
    pub breakdown: Breakdown,
}

/// Summaries of every question of a survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReport {
    pub survey_id: Option<SurveyId>,
    pub total_responses: usize,
    pub questions: Vec<QuestionSummary>,
}

impl SurveyReport {
    /// Get the summary of a question.
    pub fn question(&self, id: QuestionId) -> Option<&QuestionSummary> {
        self.questions.iter().find(|q| q.question_id == id)
    }
}

/// Summarize all responses to a survey.
///
/// Answers belonging to responses outside `responses` are ignored. Stored text that no
/// longer decodes (e.g. after a question changed type) is counted under its raw text.
pub fn aggregate(
    questions: &[Question],
    responses: &[Response],
    answers: &[Answer],
    config: &EngineConfig,
) -> SurveyReport {
    let lookup = AnswerLookup::new(questions, responses, answers);

    let mut oldest_first: Vec<&Response> = responses.iter().collect();
    oldest_first.sort_by_key(|r| r.created_at);

    let summaries = questions
        .iter()
        .map(|question| QuestionSummary {
            question_id: question.id(),
            text: question.text().to_string(),
            order_index: question.order_index(),
            breakdown: if question.kind().is_countable() {
                count_answers(question, &oldest_first, &lookup, config)
            } else {
                collect_text(question, &oldest_first, &lookup)
            },
        })
        .collect();

    let report = SurveyReport {
        survey_id: questions.first().map(Question::survey_id),
        total_responses: responses.len(),
        questions: summaries,
    };
    info!(
        responses = report.total_responses,
        questions = report.questions.len(),
        "built survey report"
    );
    report
}

/// Answer text indexed by response and question.
struct AnswerLookup<'a> {
    texts: HashMap<(ResponseId, QuestionId), &'a str>,
}

impl<'a> AnswerLookup<'a> {
    fn new(questions: &[Question], responses: &[Response], answers: &'a [Answer]) -> Self {
        let response_ids: HashSet<ResponseId> = responses.iter().map(|r| r.id).collect();
        let question_ids: HashSet<QuestionId> = questions.iter().map(Question::id).collect();

        let mut texts = HashMap::new();
        for answer in answers {
            if !response_ids.contains(&answer.response_id) {
                continue;
            }
            if !question_ids.contains(&answer.question_id) {
                warn!(
                    response = %answer.response_id,
                    question = %answer.question_id,
                    "answer references an unknown question"
                );
                continue;
            }
            let key = (answer.response_id, answer.question_id);
            if texts.contains_key(&key) {
                warn!(
                    response = %answer.response_id,
                    question = %answer.question_id,
                    "duplicate answer row ignored"
                );
                continue;
            }
            texts.insert(key, answer.answer_text.as_str());
        }
        Self { texts }
    }

    fn get(&self, response: ResponseId, question: QuestionId) -> Option<&'a str> {
        self.texts.get(&(response, question)).copied()
    }
}

fn initial_labels(question: &Question) -> Vec<String> {
    match question.kind() {
        QuestionKind::Choice(choice) => choice.options.clone(),
        QuestionKind::Boolean => vec!["true".to_string(), "false".to_string()],
        QuestionKind::Rating(rating) => (rating.min..=rating.max).map(|r| r.to_string()).collect(),
        QuestionKind::Text => Vec::new(),
    }
}

fn count_answers(
    question: &Question,
    responses: &[&Response],
    lookup: &AnswerLookup<'_>,
    config: &EngineConfig,
) -> Breakdown {
    let mut counts: Vec<(String, usize)> =
        initial_labels(question).into_iter().map(|l| (l, 0)).collect();
    let mut skipped = 0;
    let mut rating_sum = 0u64;
    let mut rating_count = 0u64;

    for response in responses {
        let labels = match lookup.get(response.id, question.id()) {
            None => Vec::new(),
            Some(text) => match decode(question, text) {
                Ok(value) => {
                    if let AnswerValue::Rating(r) = value {
                        rating_sum += u64::from(r);
                        rating_count += 1;
                    }
                    value.labels()
                }
                Err(err) => {
                    warn!(response = %response.id, %err, "stored answer does not decode");
                    let raw = text.trim();
                    if raw.is_empty() {
                        Vec::new()
                    } else {
                        vec![raw.to_string()]
                    }
                }
            },
        };

        if labels.is_empty() {
            skipped += 1;
            continue;
        }
        for label in labels {
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label, 1)),
            }
        }
    }

    counts.push((config.skipped_label.clone(), skipped));

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let buckets = counts
        .into_iter()
        .map(|(label, count)| Bucket {
            percent: percent(count, total),
            label,
            count,
        })
        .collect();

    let mean = matches!(question.kind(), QuestionKind::Rating(_))
        .then(|| (rating_count > 0).then(|| rating_sum as f64 / rating_count as f64))
        .flatten();

    Breakdown::Counts {
        buckets,
        total,
        mean,
    }
}

fn collect_text(question: &Question, oldest_first: &[&Response], lookup: &AnswerLookup<'_>) -> Breakdown {
    Breakdown::FreeText(
        oldest_first
            .iter()
            .rev()
            .filter_map(|r| lookup.get(r.id, question.id()))
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u32
}
