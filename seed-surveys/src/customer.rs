use chrono::{TimeZone, Utc};
use eventizer_survey::{
    Audience, LoadedSurvey, Question, QuestionId, QuestionKind, Survey, SurveyId,
};

pub const SURVEY: SurveyId = SurveyId::from_u128(0x2000);

pub const HEARD_FROM: QuestionId = QuestionId::from_u128(0x2001);
pub const BOOKED_SERVICES: QuestionId = QuestionId::from_u128(0x2002);
pub const EASY_BOOKING: QuestionId = QuestionId::from_u128(0x2003);
pub const EXPERIENCE: QuestionId = QuestionId::from_u128(0x2004);
pub const IMPROVEMENTS: QuestionId = QuestionId::from_u128(0x2005);

/// Feedback from customers after an event.
pub fn customer_feedback() -> LoadedSurvey {
    let created_at = Utc
        .with_ymd_and_hms(2026, 2, 1, 9, 0, 0)
        .single()
        .unwrap_or_default();

    let survey = Survey::new(SURVEY, "How was your event?", Audience::Customer)
        .with_description("Two minutes to help us plan better events")
        .with_created_at(created_at);

    let questions = vec![
        Question::new(
            HEARD_FROM,
            SURVEY,
            1,
            "How did you hear about Eventizer?",
            QuestionKind::single_choice(["Instagram", "A friend", "Google", "Other"]),
        )
        .required(),
        Question::new(
            BOOKED_SERVICES,
            SURVEY,
            2,
            "Which services did you book?",
            QuestionKind::multi_choice(["Photography", "Catering", "Decor", "Music"]),
        ),
        Question::new(
            EASY_BOOKING,
            SURVEY,
            3,
            "Was booking easy?",
            QuestionKind::Boolean,
        )
        .required(),
        Question::new(
            EXPERIENCE,
            SURVEY,
            4,
            "Rate your overall experience",
            QuestionKind::rating(),
        )
        .required(),
        Question::new(
            IMPROVEMENTS,
            SURVEY,
            5,
            "What should we improve?",
            QuestionKind::Text,
        ),
    ];

    LoadedSurvey::new(survey, questions)
}
