//! # eventizer-html-report
//!
//! Render survey summaries and response tables as standalone HTML.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eventizer_html_report::{HtmlOptions, to_html_with_options};
//!
//! let report = aggregate(&loaded.questions, &responses, &answers, &config);
//! let table = ReportQuery::new().apply(&ResponseTable::build(&loaded.questions, &responses, &answers));
//!
//! let html = to_html_with_options(
//!     &report,
//!     Some(&table),
//!     HtmlOptions::new().with_title(&loaded.survey.title).right_to_left(true),
//! );
//! ```

mod generator;

pub use generator::{HtmlOptions, escape_html, to_html, to_html_with_options};
