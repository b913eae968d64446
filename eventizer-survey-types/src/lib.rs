//! Core types for the Eventizer survey engine.
//!
//! This crate provides the foundational types for surveys and their responses:
//! - `Survey` and `Question` - What is asked, and to whom
//! - `Response` and `Answer` - Submissions and their flattened storage rows
//! - `AnswerValue` and `Choice` - Strongly typed answers, flattened only at the storage boundary
//! - `AnswerDraft` - The in-progress answers of a respondent
//! - `SurveyStore` - The persistence seam implemented by storage backends

mod ids;
pub use ids::{QuestionId, RespondentId, ResponseId, SurveyId};

mod survey;
pub use survey::{Audience, ParseAudienceError, Survey, SurveySelector};

mod question;
pub use question::{
    ChoiceQuestion, DEFAULT_RATING_MAX, DEFAULT_RATING_MIN, Question, QuestionKind, QuestionRole,
    RatingQuestion, Visibility, VisibilityTag,
};

mod answer_value;
pub use answer_value::{AnswerValue, Choice, MULTI_SELECT_SEPARATOR, OTHER_TEXT_SEPARATOR};

mod draft;
pub use draft::{AnswerDraft, DraftValue};

mod response;
pub use response::{Answer, Respondent, Response};

mod error;
pub use error::SurveyError;

mod traits;
pub use traits::{LoadedSurvey, SurveyStore};
