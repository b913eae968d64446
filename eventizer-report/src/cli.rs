use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use eventizer_survey::{AnswerFilter, Audience, QuestionId, SortOrder, SurveyId, SurveySelector};

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// SQLite database file.
    #[arg(short, long, env = "EVENTIZER_DATABASE", default_value = "eventizer.sqlite3")]
    pub database: PathBuf,

    /// JSON file with visibility rules, "other" sentinels and the skipped label.
    #[arg(short, long, env = "EVENTIZER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the surveys Eventizer ships with.
    Seed,

    /// Answer a survey interactively and store the response.
    Fill {
        #[command(flatten)]
        target: SurveyTarget,

        /// Email to record with the response.
        #[arg(long)]
        email: Option<String>,

        /// Plain prompts without colors.
        #[arg(long)]
        plain: bool,
    },

    /// Print per-question counts and percentages.
    Summary {
        #[command(flatten)]
        target: SurveyTarget,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Export responses.
    Export {
        #[command(flatten)]
        target: SurveyTarget,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Html)]
        format: ExportFormat,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep responses whose id or any answer contains this text (case-insensitive).
        #[arg(long)]
        search: Option<String>,

        /// Keep responses whose answer to a question contains a value: QUESTION_ID=VALUE.
        #[arg(long, value_parser = parse_filter)]
        filter: Option<AnswerFilter>,

        #[arg(long, value_enum, default_value_t = Order::Newest)]
        order: Order,

        /// Right-to-left HTML layout.
        #[arg(long)]
        rtl: bool,

        /// Start CSV output with a byte order mark.
        #[arg(long)]
        bom: bool,
    },
}

/// Which survey a command works on.
#[derive(Args, Debug, Clone)]
pub struct SurveyTarget {
    /// The active survey for this audience (customer, vendor or all).
    #[arg(short, long, conflicts_with = "survey", default_value = "vendor")]
    pub audience: Audience,

    /// A specific survey id.
    #[arg(short, long)]
    pub survey: Option<SurveyId>,
}

impl SurveyTarget {
    pub fn selector(&self) -> SurveySelector {
        match self.survey {
            Some(id) => SurveySelector::Id(id),
            None => SurveySelector::Audience(self.audience),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Summary and response table as an HTML page.
    Html,
    /// One line per response.
    Csv,
    /// One line per question and answer label.
    SummaryCsv,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Newest,
    Oldest,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Newest => SortOrder::Descending,
            Order::Oldest => SortOrder::Ascending,
        }
    }
}

fn parse_filter(s: &str) -> Result<AnswerFilter, String> {
    let (question, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION_ID=VALUE, got '{s}'"))?;
    let question: QuestionId = question
        .trim()
        .parse()
        .map_err(|e| format!("invalid question id '{question}': {e}"))?;
    Ok(AnswerFilter::new(question, value))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_arguments() {
        let question = QuestionId::from_u128(0x2001);
        let cli = Cli::parse_from([
            "eventizer-report",
            "--database",
            "test.sqlite3",
            "export",
            "--audience",
            "customer",
            "--format",
            "summary-csv",
            "--filter",
            format!("{question}=Insta=gram").as_str(),
            "--order",
            "oldest",
        ]);

        assert_eq!(cli.database, PathBuf::from("test.sqlite3"));
        let Command::Export {
            target,
            format,
            filter,
            order,
            ..
        } = cli.command
        else {
            panic!("expected export");
        };
        assert_eq!(target.selector(), SurveySelector::Audience(Audience::Customer));
        assert_eq!(format, ExportFormat::SummaryCsv);
        assert_eq!(filter, Some(AnswerFilter::new(question, "Insta=gram")));
        assert_eq!(SortOrder::from(order), SortOrder::Ascending);
    }

    #[test]
    fn survey_id_takes_precedence() {
        let id = SurveyId::from_u128(0x1000);
        let cli = Cli::parse_from(["eventizer-report", "summary", "--survey", id.to_string().as_str()]);
        let Command::Summary { target, json } = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(target.selector(), SurveySelector::Id(id));
        assert!(!json);
    }

    #[test]
    fn malformed_filter_is_rejected() {
        assert!(parse_filter("no-equals-sign").is_err());
        assert!(parse_filter("not-a-uuid=x").is_err());
    }
}
