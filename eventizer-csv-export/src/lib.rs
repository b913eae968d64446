//! # eventizer-csv-export
//!
//! Write response tables and survey summaries as CSV (RFC 4180 quoting, `\r\n` line ends).
//!
//! ```rust,ignore
//! use eventizer_csv_export::{CsvOptions, to_csv};
//!
//! let table = ReportQuery::new().apply(&ResponseTable::build(&questions, &responses, &answers));
//! std::fs::write("responses.csv", to_csv(&table, &CsvOptions::new().with_bom(true)))?;
//! ```

use std::io::{self, Write};

use eventizer_survey::{Breakdown, ResponseTable, SurveyReport};

const BOM: &str = "\u{feff}";

/// Options for CSV generation.
#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    /// Start with a byte order mark, so spreadsheet apps read Arabic text as UTF-8.
    pub bom: bool,
    /// Add response id, submission time and email columns before the answers.
    pub include_metadata: bool,
}

impl CsvOptions {
    pub fn new() -> Self {
        Self {
            bom: false,
            include_metadata: true,
        }
    }

    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }
}

/// Render a response table as a CSV string.
pub fn to_csv(table: &ResponseTable, options: &CsvOptions) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_csv(&mut out, table, options);
    String::from_utf8_lossy(&out).into_owned()
}

/// Write a response table as CSV, one line per response.
pub fn write_csv<W: Write>(writer: &mut W, table: &ResponseTable, options: &CsvOptions) -> io::Result<()> {
    if options.bom {
        writer.write_all(BOM.as_bytes())?;
    }

    let mut header: Vec<String> = Vec::new();
    if options.include_metadata {
        header.extend(["response_id", "created_at", "respondent_email"].map(String::from));
    }
    header.extend(table.columns.iter().map(|c| c.header.clone()));
    write_record(writer, header.iter().map(String::as_str))?;

    for row in &table.rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if options.include_metadata {
            record.push(row.response_id.to_string());
            record.push(row.created_at.to_rfc3339());
            record.push(row.respondent_email.clone().unwrap_or_default());
        }
        record.extend(row.cells.iter().map(|c| c.clone().unwrap_or_default()));
        write_record(writer, record.iter().map(String::as_str))?;
    }

    Ok(())
}

/// Render per-question counts as CSV: `question,label,count,percent`.
///
/// Free-text questions get one line per answer with empty count and percent.
pub fn summary_to_csv(report: &SurveyReport, options: &CsvOptions) -> String {
    let mut out = String::new();
    if options.bom {
        out.push_str(BOM);
    }
    out.push_str("question,label,count,percent\r\n");

    for question in &report.questions {
        let text = csv_escape(&question.text);
        match &question.breakdown {
            Breakdown::Counts { buckets, .. } => {
                for bucket in buckets {
                    out.push_str(&format!(
                        "{text},{},{},{}\r\n",
                        csv_escape(&bucket.label),
                        bucket.count,
                        bucket.percent
                    ));
                }
            }
            Breakdown::FreeText(texts) => {
                for answer in texts {
                    out.push_str(&format!("{text},{},,\r\n", csv_escape(answer)));
                }
            }
        }
    }
    out
}

fn write_record<'a, W: Write>(writer: &mut W, fields: impl Iterator<Item = &'a str>) -> io::Result<()> {
    let line: Vec<String> = fields.map(csv_escape).collect();
    write!(writer, "{}\r\n", line.join(","))
}

/// Quote a field if it contains a comma, quote or line break.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
