//! The response table behind every export, with search, filtering and ordering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Answer, Question, QuestionId, Response, ResponseId};

/// A question column of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub question_id: QuestionId,
    pub header: String,
}

/// One submitted response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseRow {
    pub response_id: ResponseId,
    pub created_at: DateTime<Utc>,
    pub respondent_email: Option<String>,
    /// One cell per column, `None` when the question was not answered.
    pub cells: Vec<Option<String>>,
}

impl ResponseRow {
    fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }
}

/// One row per response and one column per question, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseTable {
    pub columns: Vec<Column>,
    pub rows: Vec<ResponseRow>,
}

impl ResponseTable {
    /// Build the table from stored rows. Rows keep the order of `responses`.
    pub fn build(questions: &[Question], responses: &[Response], answers: &[Answer]) -> Self {
        let mut ordered: Vec<&Question> = questions.iter().collect();
        ordered.sort_by_key(|q| q.order_index());

        let columns: Vec<Column> = ordered
            .iter()
            .map(|q| Column {
                question_id: q.id(),
                header: q.text().to_string(),
            })
            .collect();

        let mut texts: HashMap<(ResponseId, QuestionId), &str> = HashMap::new();
        for answer in answers {
            texts
                .entry((answer.response_id, answer.question_id))
                .or_insert(answer.answer_text.as_str());
        }

        let rows = responses
            .iter()
            .map(|response| ResponseRow {
                response_id: response.id,
                created_at: response.created_at,
                respondent_email: response.respondent_email.clone(),
                cells: columns
                    .iter()
                    .map(|c| {
                        texts
                            .get(&(response.id, c.question_id))
                            .map(|t| t.to_string())
                    })
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    /// The position of a question's column.
    pub fn column_index(&self, question: QuestionId) -> Option<usize> {
        self.columns.iter().position(|c| c.question_id == question)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Row order by submission time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Keep only rows whose answer to `question` contains `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFilter {
    pub question: QuestionId,
    pub value: String,
}

impl AnswerFilter {
    pub fn new(question: QuestionId, value: impl Into<String>) -> Self {
        Self {
            question,
            value: value.into(),
        }
    }
}

/// Search, filter and order applied to a [`ResponseTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Case-insensitive text looked up in the response id and every cell.
    pub search: Option<String>,
    pub filter: Option<AnswerFilter>,
    pub order: SortOrder,
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_filter(mut self, question: QuestionId, value: impl Into<String>) -> Self {
        self.filter = Some(AnswerFilter::new(question, value));
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Check a row against the search and the filter.
    ///
    /// A filter on a question the table has no column for matches nothing.
    pub fn matches(&self, table: &ResponseTable, row: &ResponseRow) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            let needle = search.to_lowercase();
            let hit = row.response_id.to_string().to_lowercase().contains(&needle)
                || row
                    .cells
                    .iter()
                    .flatten()
                    .any(|cell| cell.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(filter) = &self.filter {
            let Some(index) = table.column_index(filter.question) else {
                return false;
            };
            return row.cell(index).is_some_and(|cell| cell.contains(&filter.value));
        }

        true
    }

    /// A copy of the table with matching rows only, sorted by submission time.
    pub fn apply(&self, table: &ResponseTable) -> ResponseTable {
        let mut rows: Vec<ResponseRow> = table
            .rows
            .iter()
            .filter(|row| self.matches(table, row))
            .cloned()
            .collect();

        match self.order {
            SortOrder::Ascending => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Descending => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        debug!(kept = rows.len(), total = table.rows.len(), "applied report query");
        ResponseTable {
            columns: table.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::{QuestionKind, Respondent, SurveyId};

    const SURVEY: SurveyId = SurveyId::from_u128(1);
    const SERVICE: QuestionId = QuestionId::from_u128(10);
    const COMMENTS: QuestionId = QuestionId::from_u128(11);

    fn questions() -> Vec<Question> {
        vec![
            Question::new(COMMENTS, SURVEY, 2, "Comments", QuestionKind::Text),
            Question::new(
                SERVICE,
                SURVEY,
                1,
                "Service",
                QuestionKind::single_choice(["Photographer", "Catering"]),
            ),
        ]
    }

    fn table() -> ResponseTable {
        let base = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let responses: Vec<Response> = (1..=3)
            .map(|n| {
                Response::new(SURVEY, Respondent::anonymous())
                    .with_id(ResponseId::from_u128(n))
                    .with_created_at(base + Duration::hours(n as i64))
            })
            .collect();
        let r = |n| ResponseId::from_u128(n);
        let answers = vec![
            Answer::new(r(1), SERVICE, "Photographer"),
            Answer::new(r(1), COMMENTS, "Great LIGHTING"),
            Answer::new(r(2), SERVICE, "Catering"),
            Answer::new(r(3), COMMENTS, "ok"),
        ];
        ResponseTable::build(&questions(), &responses, &answers)
    }

    fn ids(table: &ResponseTable) -> Vec<ResponseId> {
        table.rows.iter().map(|r| r.response_id).collect()
    }

    #[test]
    fn columns_follow_display_order_and_missing_cells_are_empty() {
        let table = table();
        let headers: Vec<_> = table.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Service", "Comments"]);
        assert_eq!(table.rows[1].cells, vec![Some("Catering".to_string()), None]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let table = table();
        let found = ReportQuery::new().with_search("lighting").apply(&table);
        assert_eq!(ids(&found), vec![ResponseId::from_u128(1)]);

        let by_id = ReportQuery::new()
            .with_search(ResponseId::from_u128(2).to_string().to_uppercase())
            .apply(&table);
        assert_eq!(ids(&by_id), vec![ResponseId::from_u128(2)]);
    }

    #[test]
    fn filter_requires_an_answer_containing_the_value() {
        let table = table();
        let filtered = ReportQuery::new().with_filter(SERVICE, "Cater").apply(&table);
        assert_eq!(ids(&filtered), vec![ResponseId::from_u128(2)]);

        let unanswered = ReportQuery::new().with_filter(COMMENTS, "").apply(&table);
        assert_eq!(unanswered.rows.len(), 2);

        let unknown = ReportQuery::new()
            .with_filter(QuestionId::from_u128(99), "x")
            .apply(&table);
        assert!(unknown.is_empty());
    }

    #[test]
    fn newest_first_by_default() {
        let table = table();
        let r = |n| ResponseId::from_u128(n);
        assert_eq!(ids(&ReportQuery::new().apply(&table)), vec![r(3), r(2), r(1)]);
        assert_eq!(
            ids(&ReportQuery::new().with_order(SortOrder::Ascending).apply(&table)),
            vec![r(1), r(2), r(3)]
        );
    }

    #[test]
    fn blank_search_matches_everything() {
        let table = table();
        assert_eq!(ReportQuery::new().with_search("  ").apply(&table).rows.len(), 3);
    }
}
