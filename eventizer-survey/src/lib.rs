//! # eventizer-survey
//!
//! The survey engine behind Eventizer's vendor market research and customer feedback forms.
//!
//! Surveys are data: a list of questions loaded from a store. This crate decides which of
//! them a respondent sees, turns form input into typed answers, stores a submission, and
//! summarizes everything that was submitted.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eventizer_survey::{
//!     AnswerDraft, Audience, DraftValue, EngineConfig, MemoryStore, Respondent,
//!     VisibilityResolver, load_survey_with_questions, submit,
//! };
//!
//! let config = EngineConfig::default();
//! let mut store = MemoryStore::new();
//! let loaded = load_survey_with_questions(&store, Audience::Vendor, &config)?;
//!
//! let draft = AnswerDraft::new().with_value(service_question, DraftValue::choice("Photographer"));
//!
//! // Re-run on every change to the draft.
//! let visible = VisibilityResolver::new(&config.visibility).visible(&loaded.questions, &draft);
//!
//! let response = submit(&mut store, &loaded, &draft, &Respondent::anonymous(), &config)?;
//! ```
//!
//! ## Pieces
//!
//! - [`VisibilityResolver`] - which questions show for the current selector answer
//! - [`encode`] / [`decode`] - form input to typed answers, stored text back to typed answers
//! - [`prepare_submission`] / [`submit`] - validation and persistence of a draft
//! - [`aggregate`] - per-question counts, percentages and free-text lists
//! - [`ResponseTable`] / [`ReportQuery`] - the rectangular table export adapters consume
//!
//! ## Stores
//!
//! Stores implement [`SurveyStore`]:
//! - [`MemoryStore`] - in-memory, for tests and demos
//! - `eventizer-sqlite-store` - SQLite

// Re-export all types from eventizer-survey-types
pub use eventizer_survey_types::*;

mod config;
pub use config::{CategoryRule, ConfigError, EngineConfig, MarkerRule, VisibilityRules};

mod visibility;
pub use visibility::VisibilityResolver;

mod codec;
pub use codec::{decode, encode, is_answered};

mod load;
pub use load::load_survey_with_questions;

mod submission;
pub use submission::{prepare_submission, submit};

mod aggregate;
pub use aggregate::{Breakdown, Bucket, QuestionSummary, SurveyReport, aggregate};

mod report;
pub use report::{AnswerFilter, Column, ReportQuery, ResponseRow, ResponseTable, SortOrder};

// In-memory store for tests and demos
mod memory_store;
pub use memory_store::{MemoryStore, MemoryStoreError};
