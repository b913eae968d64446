//! HTML report generator implementation.

use eventizer_survey::{Breakdown, QuestionSummary, ResponseTable, SurveyReport};

/// Options for HTML generation.
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Title for the HTML document.
    pub title: Option<String>,
    /// Whether to include default CSS styling.
    pub include_styles: bool,
    /// Whether to generate a complete HTML document (with html/head/body tags).
    pub full_document: bool,
    /// Custom CSS class prefix for all generated elements.
    pub class_prefix: String,
    /// Document language, e.g. `ar` or `en`.
    pub lang: String,
    /// Lay the document out right to left.
    pub rtl: bool,
}

impl HtmlOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "report".to_string(),
            lang: "en".to_string(),
            rtl: false,
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable default CSS styling.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Generate a complete HTML document or just the report fragment.
    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    /// Set a custom CSS class prefix.
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the document language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Lay the document out right to left, for Arabic surveys.
    pub fn right_to_left(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }
}

/// Render a survey summary with default options and the given title.
pub fn to_html(report: &SurveyReport, title: Option<&str>) -> String {
    let mut options = HtmlOptions::new();
    if let Some(t) = title {
        options.title = Some(t.to_string());
    }
    to_html_with_options(report, None, options)
}

/// Render a survey summary, followed by the response table if given.
pub fn to_html_with_options(
    report: &SurveyReport,
    responses: Option<&ResponseTable>,
    options: HtmlOptions,
) -> String {
    generate_html(report, responses, &options)
}

fn generate_html(
    report: &SurveyReport,
    responses: Option<&ResponseTable>,
    options: &HtmlOptions,
) -> String {
    let mut html = String::new();
    let prefix = &options.class_prefix;
    let dir = if options.rtl { "rtl" } else { "ltr" };

    if options.full_document {
        html.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"{}\" dir=\"{dir}\">\n<head>\n",
            escape_html(&options.lang)
        ));
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );

        if let Some(title) = &options.title {
            html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
        }

        if options.include_styles {
            html.push_str(&generate_styles(prefix));
        }

        html.push_str("</head>\n<body>\n");
    }

    html.push_str(&format!("<main class=\"{prefix}\" dir=\"{dir}\">\n"));

    if let Some(title) = &options.title {
        html.push_str(&format!(
            "  <h1 class=\"{prefix}-title\">{}</h1>\n",
            escape_html(title)
        ));
    }

    html.push_str(&format!(
        "  <p class=\"{prefix}-total\">Total responses: {}</p>\n",
        report.total_responses
    ));

    html.push_str(&format!("  <section class=\"{prefix}-summary\">\n"));
    for question in &report.questions {
        html.push_str(&generate_question(question, prefix));
    }
    html.push_str("  </section>\n");

    if let Some(table) = responses {
        html.push_str(&generate_table(table, prefix));
    }

    html.push_str("</main>\n");

    if options.full_document {
        html.push_str("</body>\n</html>\n");
    }

    html
}

/// Generate HTML for a single question summary.
fn generate_question(question: &QuestionSummary, prefix: &str) -> String {
    let mut html = String::new();

    html.push_str(&format!("    <article class=\"{prefix}-question\">\n"));
    html.push_str(&format!(
        "      <h2>{}</h2>\n",
        escape_html(&question.text)
    ));

    match &question.breakdown {
        Breakdown::Counts {
            buckets,
            total,
            mean,
        } => {
            if let Some(mean) = mean {
                html.push_str(&format!(
                    "      <p class=\"{prefix}-mean\">Average: {mean:.2}</p>\n"
                ));
            }
            html.push_str(&format!("      <table class=\"{prefix}-counts\">\n"));
            for bucket in buckets {
                html.push_str("        <tr>\n");
                html.push_str(&format!(
                    "          <td class=\"{prefix}-label\">{}</td>\n",
                    escape_html(&bucket.label)
                ));
                html.push_str(&format!(
                    "          <td class=\"{prefix}-count\">{}</td>\n",
                    bucket.count
                ));
                html.push_str(&format!(
                    "          <td class=\"{prefix}-percent\"><div class=\"{prefix}-bar\" style=\"width: {}%\"></div>{}%</td>\n",
                    bucket.percent, bucket.percent
                ));
                html.push_str("        </tr>\n");
            }
            html.push_str("      </table>\n");
            html.push_str(&format!(
                "      <p class=\"{prefix}-answers\">{total} answers</p>\n"
            ));
        }

        Breakdown::FreeText(texts) if texts.is_empty() => {
            html.push_str(&format!(
                "      <p class=\"{prefix}-empty\">No answers yet</p>\n"
            ));
        }

        Breakdown::FreeText(texts) => {
            html.push_str(&format!("      <ul class=\"{prefix}-texts\">\n"));
            for text in texts {
                html.push_str(&format!("        <li>{}</li>\n", escape_html(text)));
            }
            html.push_str("      </ul>\n");
        }
    }

    html.push_str("    </article>\n");
    html
}

/// Generate the table of individual responses.
fn generate_table(table: &ResponseTable, prefix: &str) -> String {
    let mut html = String::new();

    html.push_str(&format!("  <section class=\"{prefix}-responses\">\n"));
    html.push_str(&format!("    <table class=\"{prefix}-table\">\n"));

    html.push_str("      <thead>\n        <tr>\n");
    html.push_str("          <th>Response</th>\n          <th>Submitted</th>\n          <th>Email</th>\n");
    for column in &table.columns {
        html.push_str(&format!(
            "          <th>{}</th>\n",
            escape_html(&column.header)
        ));
    }
    html.push_str("        </tr>\n      </thead>\n");

    html.push_str("      <tbody>\n");
    for row in &table.rows {
        html.push_str("        <tr>\n");
        html.push_str(&format!("          <td>{}</td>\n", row.response_id));
        html.push_str(&format!(
            "          <td>{}</td>\n",
            row.created_at.format("%Y-%m-%d %H:%M")
        ));
        html.push_str(&format!(
            "          <td>{}</td>\n",
            escape_html(row.respondent_email.as_deref().unwrap_or(""))
        ));
        for cell in &row.cells {
            html.push_str(&format!(
                "          <td>{}</td>\n",
                escape_html(cell.as_deref().unwrap_or(""))
            ));
        }
        html.push_str("        </tr>\n");
    }
    html.push_str("      </tbody>\n");

    html.push_str("    </table>\n");
    html.push_str("  </section>\n");
    html
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate default CSS styles.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix} {{
      max-width: 960px;
      margin: 2rem auto;
      padding: 1rem;
      font-family: sans-serif;
    }}
    .{prefix}-question {{
      margin: 1.5rem 0;
      padding: 1rem;
      border: 1px solid #ddd;
      border-radius: 6px;
    }}
    .{prefix}-counts {{
      width: 100%;
      border-collapse: collapse;
    }}
    .{prefix}-counts td {{
      padding: 0.25rem 0.5rem;
    }}
    .{prefix}-percent {{
      width: 50%;
    }}
    .{prefix}-bar {{
      display: inline-block;
      height: 0.75rem;
      margin-inline-end: 0.5rem;
      background: #6c5ce7;
    }}
    .{prefix}-mean, .{prefix}-answers, .{prefix}-empty {{
      color: #555;
    }}
    .{prefix}-table {{
      width: 100%;
      border-collapse: collapse;
      font-size: 0.9rem;
    }}
    .{prefix}-table th, .{prefix}-table td {{
      border: 1px solid #ddd;
      padding: 0.25rem 0.5rem;
      text-align: start;
      vertical-align: top;
    }}
  </style>
"#
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use eventizer_survey::{
        Answer, EngineConfig, Respondent, Response, ResponseId, aggregate,
    };
    use seed_surveys::customer;

    use super::*;

    fn fixture() -> (SurveyReport, ResponseTable) {
        let loaded = seed_surveys::customer_feedback();
        let response = Response::new(customer::SURVEY, Respondent::email("a&b@example.com"))
            .with_id(ResponseId::from_u128(7))
            .with_created_at(Utc.with_ymd_and_hms(2026, 4, 2, 18, 30, 0).unwrap());
        let answers = vec![
            Answer::new(response.id, customer::HEARD_FROM, "Instagram"),
            Answer::new(response.id, customer::EXPERIENCE, "5"),
            Answer::new(response.id, customer::IMPROVEMENTS, "<b>More</b> vendors"),
        ];
        let responses = vec![response];
        let report = aggregate(&loaded.questions, &responses, &answers, &EngineConfig::default());
        let table = ResponseTable::build(&loaded.questions, &responses, &answers);
        (report, table)
    }

    #[test]
    fn html_options_chaining() {
        let options = HtmlOptions::new()
            .with_title("Vendor research")
            .with_styles(false)
            .full_document(false)
            .with_class_prefix("ev")
            .with_lang("ar")
            .right_to_left(true);

        assert_eq!(options.title, Some("Vendor research".to_string()));
        assert!(!options.include_styles);
        assert!(!options.full_document);
        assert_eq!(options.class_prefix, "ev");
        assert_eq!(options.lang, "ar");
        assert!(options.rtl);
    }

    #[test]
    fn summary_shows_counts_percentages_and_mean() {
        let (report, _) = fixture();
        let html = to_html(&report, Some("How was your event?"));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>How was your event?</title>"));
        assert!(html.contains("Total responses: 1"));
        assert!(html.contains("<td class=\"report-label\">Instagram</td>"));
        assert!(html.contains("style=\"width: 100%\""));
        assert!(html.contains("Average: 5.00"));
    }

    #[test]
    fn user_text_is_escaped() {
        let (report, table) = fixture();
        let html = to_html_with_options(&report, Some(&table), HtmlOptions::new());

        assert!(html.contains("&lt;b&gt;More&lt;/b&gt; vendors"));
        assert!(html.contains("a&amp;b@example.com"));
        assert!(!html.contains("<b>More</b>"));
    }

    #[test]
    fn response_table_has_one_column_per_question() {
        let (report, table) = fixture();
        let html = to_html_with_options(&report, Some(&table), HtmlOptions::new());

        assert!(html.contains("<th>Rate your overall experience</th>"));
        assert!(html.contains("<td>2026-04-02 18:30</td>"));
        assert_eq!(html.matches("<th>").count(), 3 + table.columns.len());
    }

    #[test]
    fn fragment_for_rtl_pages() {
        let (report, _) = fixture();
        let html = to_html_with_options(
            &report,
            None,
            HtmlOptions::new().full_document(false).right_to_left(true),
        );

        assert!(html.starts_with("<main class=\"report\" dir=\"rtl\">"));
        assert!(!html.contains("<style>"));
        assert!(!html.contains("report-table"));
    }

    #[test]
    fn escape_html_special_chars() {
        assert_eq!(escape_html("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
