use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use eventizer_survey::{
    Answer, Audience, LoadedSurvey, Question, QuestionKind, QuestionRole, Respondent, Response,
    ResponseId, Survey, SurveyId, SurveySelector, SurveyStore, Visibility, VisibilityTag,
};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::error::{SqliteStoreError, parse_id};
use crate::schema;

/// A survey store backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

struct SurveyRow {
    id: String,
    title: String,
    description: Option<String>,
    target_audience: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

struct QuestionRow {
    id: String,
    survey_id: String,
    text: String,
    kind: String,
    order_index: i32,
    is_required: bool,
    description: Option<String>,
    is_selector: bool,
    category: Option<String>,
}

struct ResponseRow {
    id: String,
    survey_id: String,
    respondent_id: Option<String>,
    respondent_email: Option<String>,
    created_at: DateTime<Utc>,
}

const SURVEY_COLUMNS: &str =
    "id, title, description, target_audience, is_active, created_at";

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        schema::init(&conn)?;
        info!(path = %path.display(), "opened survey database");
        Ok(Self { conn })
    }

    /// A fresh database that lives as long as the store.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let conn = Connection::open_in_memory()?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a survey or update it in place.
    ///
    /// Questions are upserted by id, so stored answers survive re-seeding. Questions missing
    /// from `loaded` are deleted together with their answers.
    pub fn insert_survey(&mut self, loaded: &LoadedSurvey) -> Result<(), SqliteStoreError> {
        let tx = self.conn.transaction()?;
        let survey = &loaded.survey;

        tx.execute(
            "INSERT INTO surveys (id, title, description, target_audience, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                target_audience = excluded.target_audience,
                is_active = excluded.is_active,
                created_at = excluded.created_at",
            params![
                survey.id.to_string(),
                survey.title,
                survey.description,
                survey.target_audience.as_str(),
                survey.is_active,
                survey.created_at,
            ],
        )?;

        {
            let mut upsert = tx.prepare(
                "INSERT INTO survey_questions
                 (id, survey_id, question_text, kind, order_index, is_required, description, is_selector, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                    survey_id = excluded.survey_id,
                    question_text = excluded.question_text,
                    kind = excluded.kind,
                    order_index = excluded.order_index,
                    is_required = excluded.is_required,
                    description = excluded.description,
                    is_selector = excluded.is_selector,
                    category = excluded.category",
            )?;
            for question in &loaded.questions {
                upsert.execute(params![
                    question.id().to_string(),
                    survey.id.to_string(),
                    question.text(),
                    serde_json::to_string(question.kind())?,
                    question.order_index(),
                    question.is_required(),
                    question.description(),
                    question.is_selector(),
                    question.visibility().tag().map(VisibilityTag::as_str),
                ])?;
            }
        }

        // Answers to questions that stay in the survey are kept. Dropped questions take
        // their answers with them.
        let keep: HashSet<String> = loaded.questions.iter().map(|q| q.id().to_string()).collect();
        let stored: Vec<String> = tx
            .prepare("SELECT id FROM survey_questions WHERE survey_id = ?1")?
            .query_map(params![survey.id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<Result<_, _>>()?;
        let mut removed = 0;
        for id in stored.iter().filter(|id| !keep.contains(*id)) {
            removed += tx.execute("DELETE FROM survey_questions WHERE id = ?1", params![id])?;
        }
        if removed > 0 {
            info!(survey = %survey.id, removed, "removed questions no longer in survey");
        }

        tx.commit()?;
        debug!(survey = %survey.id, questions = loaded.questions.len(), "stored survey");
        Ok(())
    }

    /// Mark a survey as active or inactive.
    pub fn set_active(&self, survey: SurveyId, active: bool) -> Result<bool, SqliteStoreError> {
        let changed = self.conn.execute(
            "UPDATE surveys SET is_active = ?2 WHERE id = ?1",
            params![survey.to_string(), active],
        )?;
        Ok(changed > 0)
    }

    fn find_survey(&self, selector: &SurveySelector) -> Result<Option<SurveyRow>, SqliteStoreError> {
        let row = match selector {
            SurveySelector::Id(id) => self
                .conn
                .query_row(
                    &format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE id = ?1"),
                    params![id.to_string()],
                    read_survey,
                )
                .optional()?,
            SurveySelector::Audience(audience) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {SURVEY_COLUMNS} FROM surveys
                     WHERE is_active = 1 AND target_audience = ?1
                     ORDER BY created_at DESC
                     LIMIT 1"
                ))?;
                match stmt.query_row(params![audience.as_str()], read_survey).optional()? {
                    Some(row) => Some(row),
                    None => stmt
                        .query_row(params![Audience::All.as_str()], read_survey)
                        .optional()?,
                }
            }
        };
        Ok(row)
    }

    fn questions(&self, survey: SurveyId) -> Result<Vec<Question>, SqliteStoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, survey_id, question_text, kind, order_index, is_required, description, is_selector, category
             FROM survey_questions
             WHERE survey_id = ?1
             ORDER BY order_index",
        )?;
        let rows = stmt
            .query_map(params![survey.to_string()], |row| {
                Ok(QuestionRow {
                    id: row.get(0)?,
                    survey_id: row.get(1)?,
                    text: row.get(2)?,
                    kind: row.get(3)?,
                    order_index: row.get(4)?,
                    is_required: row.get(5)?,
                    description: row.get(6)?,
                    is_selector: row.get(7)?,
                    category: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(parse_question).collect()
    }
}

fn read_survey(row: &rusqlite::Row<'_>) -> rusqlite::Result<SurveyRow> {
    Ok(SurveyRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        target_audience: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn parse_survey(raw: SurveyRow) -> Result<Survey, SqliteStoreError> {
    let audience: Audience = raw.target_audience.parse()?;
    let mut survey = Survey::new(parse_id(raw.id)?, raw.title, audience).with_created_at(raw.created_at);
    if let Some(description) = raw.description {
        survey = survey.with_description(description);
    }
    if !raw.is_active {
        survey = survey.inactive();
    }
    Ok(survey)
}

fn parse_question(raw: QuestionRow) -> Result<Question, SqliteStoreError> {
    let kind: QuestionKind = serde_json::from_str(&raw.kind)?;
    let mut question = Question::new(
        parse_id(raw.id)?,
        parse_id(raw.survey_id)?,
        raw.order_index,
        raw.text,
        kind,
    );
    if raw.is_required {
        question = question.required();
    }
    if let Some(description) = raw.description {
        question = question.with_description(description);
    }
    if raw.is_selector {
        question.set_role(QuestionRole::Selector);
    }
    if let Some(category) = raw.category {
        question.set_visibility(Visibility::Category(category.into()));
    }
    Ok(question)
}

fn parse_response(raw: ResponseRow) -> Result<Response, SqliteStoreError> {
    Ok(Response {
        id: parse_id(raw.id)?,
        survey_id: parse_id(raw.survey_id)?,
        respondent_id: raw.respondent_id.map(parse_id).transpose()?,
        respondent_email: raw.respondent_email,
        created_at: raw.created_at,
    })
}

impl SurveyStore for SqliteStore {
    type Error = SqliteStoreError;

    fn load_survey(&self, selector: &SurveySelector) -> Result<Option<LoadedSurvey>, Self::Error> {
        let Some(raw) = self.find_survey(selector)? else {
            return Ok(None);
        };
        let survey = parse_survey(raw)?;
        let questions = self.questions(survey.id)?;
        Ok(Some(LoadedSurvey::new(survey, questions)))
    }

    fn load_responses(&self, survey: SurveyId) -> Result<Vec<Response>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, survey_id, respondent_id, respondent_email, created_at
             FROM survey_responses
             WHERE survey_id = ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map(params![survey.to_string()], |row| {
                Ok(ResponseRow {
                    id: row.get(0)?,
                    survey_id: row.get(1)?,
                    respondent_id: row.get(2)?,
                    respondent_email: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(parse_response).collect()
    }

    fn load_answers(&self, responses: &[ResponseId]) -> Result<Vec<Answer>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT question_id, answer_text
             FROM survey_answers
             WHERE response_id = ?1
             ORDER BY id",
        )?;

        let mut answers = Vec::new();
        for response in responses {
            let rows = stmt
                .query_map(params![response.to_string()], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            for (question, text) in rows {
                answers.push(Answer::new(*response, parse_id(question)?, text));
            }
        }
        Ok(answers)
    }

    fn create_response(
        &mut self,
        survey: SurveyId,
        respondent: &Respondent,
    ) -> Result<Response, Self::Error> {
        let response = Response::new(survey, respondent.clone());
        self.conn.execute(
            "INSERT INTO survey_responses (id, survey_id, respondent_id, respondent_email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                response.id.to_string(),
                survey.to_string(),
                response.respondent_id.map(|id| id.to_string()),
                response.respondent_email,
                response.created_at,
            ],
        )?;
        Ok(response)
    }

    fn create_answers(&mut self, answers: &[Answer]) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO survey_answers (response_id, question_id, answer_text)
                 VALUES (?1, ?2, ?3)",
            )?;
            for answer in answers {
                insert.execute(params![
                    answer.response_id.to_string(),
                    answer.question_id.to_string(),
                    answer.answer_text,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_response(&mut self, response: ResponseId) -> Result<bool, Self::Error> {
        let deleted = self.conn.execute(
            "DELETE FROM survey_responses WHERE id = ?1",
            params![response.to_string()],
        )?;
        Ok(deleted > 0)
    }
}
