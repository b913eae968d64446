use std::path::PathBuf;

use anyhow::Context;
use eventizer_csv_export::{CsvOptions, summary_to_csv, to_csv};
use eventizer_dialoguer_wizard::DialoguerWizard;
use eventizer_html_report::{HtmlOptions, to_html_with_options};
use eventizer_sqlite_store::SqliteStore;
use eventizer_survey::{
    Answer, AnswerFilter, Breakdown, EngineConfig, LoadedSurvey, ReportQuery, Respondent, Response,
    ResponseId, ResponseTable, SortOrder, SurveyError, SurveyReport, SurveyStore, aggregate,
    load_survey_with_questions, submit,
};
use tracing::info;

use crate::cli::{ExportFormat, SurveyTarget};

pub struct ExportRequest {
    pub format: ExportFormat,
    pub output: Option<PathBuf>,
    pub search: Option<String>,
    pub filter: Option<AnswerFilter>,
    pub order: SortOrder,
    pub rtl: bool,
    pub bom: bool,
}

/// A survey with everything submitted to it.
struct Submissions {
    loaded: LoadedSurvey,
    responses: Vec<Response>,
    answers: Vec<Answer>,
}

fn load_submissions<S: SurveyStore>(
    store: &S,
    target: &SurveyTarget,
    config: &EngineConfig,
) -> Result<Submissions, SurveyError> {
    let loaded = load_survey_with_questions(store, target.selector(), config)?;
    let responses = store
        .load_responses(loaded.survey.id)
        .map_err(SurveyError::store)?;
    let ids: Vec<ResponseId> = responses.iter().map(|r| r.id).collect();
    let answers = store.load_answers(&ids).map_err(SurveyError::store)?;
    Ok(Submissions {
        loaded,
        responses,
        answers,
    })
}

pub fn seed(store: &mut SqliteStore) -> anyhow::Result<()> {
    for survey in seed_surveys::all() {
        store
            .insert_survey(&survey)
            .with_context(|| format!("seeding '{}'", survey.survey.title))?;
        println!("{}  {}", survey.survey.id, survey.survey.title);
    }
    Ok(())
}

pub fn fill(
    store: &mut SqliteStore,
    target: &SurveyTarget,
    email: Option<String>,
    plain: bool,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let loaded = load_survey_with_questions(&*store, target.selector(), config)?;
    let wizard = if plain {
        DialoguerWizard::plain()
    } else {
        DialoguerWizard::new()
    };

    let draft = wizard.fill(&loaded, config)?;
    let respondent = email.map(Respondent::email).unwrap_or_default();
    let response = submit(store, &loaded, &draft, &respondent, config)?;

    println!("Thanks! Response {} saved.", response.id);
    Ok(())
}

pub fn summary(
    store: &SqliteStore,
    target: &SurveyTarget,
    json: bool,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let submissions = load_submissions(store, target, config)?;
    let report = aggregate(
        &submissions.loaded.questions,
        &submissions.responses,
        &submissions.answers,
        config,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_summary(&submissions.loaded.survey.title, &report));
    }
    Ok(())
}

pub fn export(
    store: &SqliteStore,
    target: &SurveyTarget,
    request: &ExportRequest,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let submissions = load_submissions(store, target, config)?;
    let rendered = render_export(&submissions, request, config);

    match &request.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "export written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render_export(submissions: &Submissions, request: &ExportRequest, config: &EngineConfig) -> String {
    let Submissions {
        loaded,
        responses,
        answers,
    } = submissions;

    let query = ReportQuery {
        search: request.search.clone(),
        filter: request.filter.clone(),
        order: request.order,
    };
    let table = query.apply(&ResponseTable::build(&loaded.questions, responses, answers));

    // Summaries cover the responses left after search and filter.
    let kept: Vec<Response> = responses
        .iter()
        .filter(|r| table.rows.iter().any(|row| row.response_id == r.id))
        .cloned()
        .collect();
    let report = aggregate(&loaded.questions, &kept, answers, config);

    match request.format {
        ExportFormat::Html => to_html_with_options(
            &report,
            Some(&table),
            HtmlOptions::new()
                .with_title(&loaded.survey.title)
                .with_lang(if request.rtl { "ar" } else { "en" })
                .right_to_left(request.rtl),
        ),
        ExportFormat::Csv => to_csv(&table, &CsvOptions::new().with_bom(request.bom)),
        ExportFormat::SummaryCsv => summary_to_csv(&report, &CsvOptions::new().with_bom(request.bom)),
    }
}

fn render_summary(title: &str, report: &SurveyReport) -> String {
    let mut out = format!("{title}\n{} responses\n", report.total_responses);

    for question in &report.questions {
        out.push_str(&format!("\n{}. {}\n", question.order_index, question.text));
        match &question.breakdown {
            Breakdown::Counts { buckets, mean, .. } => {
                let width = buckets.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
                for bucket in buckets {
                    let pad = width - bucket.label.chars().count();
                    out.push_str(&format!(
                        "   {}{}  {:>4}  {:>3}%\n",
                        bucket.label,
                        " ".repeat(pad),
                        bucket.count,
                        bucket.percent
                    ));
                }
                if let Some(mean) = mean {
                    out.push_str(&format!("   average {mean:.2}\n"));
                }
            }
            Breakdown::FreeText(texts) if texts.is_empty() => out.push_str("   (no answers)\n"),
            Breakdown::FreeText(texts) => {
                for text in texts {
                    out.push_str(&format!("   - {text}\n"));
                }
            }
        }
    }
    out
}
