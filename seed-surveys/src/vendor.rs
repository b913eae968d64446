use chrono::{TimeZone, Utc};
use eventizer_survey::{
    Audience, LoadedSurvey, Question, QuestionId, QuestionKind, Survey, SurveyId,
};

pub const SURVEY: SurveyId = SurveyId::from_u128(0x1000);

pub const SERVICE_TYPE: QuestionId = QuestionId::from_u128(0x1001);
pub const CAMERAS: QuestionId = QuestionId::from_u128(0x1002);
pub const DRONE: QuestionId = QuestionId::from_u128(0x1003);
pub const CUISINES: QuestionId = QuestionId::from_u128(0x1004);
pub const GUESTS: QuestionId = QuestionId::from_u128(0x1005);
pub const DECOR_STYLES: QuestionId = QuestionId::from_u128(0x1006);
pub const EQUIPMENT: QuestionId = QuestionId::from_u128(0x1007);
pub const CLIENT_CHANNELS: QuestionId = QuestionId::from_u128(0x1008);
pub const LISTING_LIKELIHOOD: QuestionId = QuestionId::from_u128(0x1009);
pub const COMMENTS: QuestionId = QuestionId::from_u128(0x100a);

pub const PHOTOGRAPHY: &str = "تصوير / Photography";
pub const CATERING: &str = "ضيافة / Catering";
pub const DECOR: &str = "ديكور / Decor";
pub const BAND: &str = "فرقة / Band";
pub const DJ: &str = "دي جي / DJ";
pub const OTHER: &str = "أخرى";

/// Market research for vendors, with follow-up questions per service category.
pub fn vendor_research() -> LoadedSurvey {
    let mut loaded = legacy_vendor_research();
    for question in &mut loaded.questions {
        if question.id() == SERVICE_TYPE {
            *question = question.clone().selector();
        }
    }
    let tags = [
        (CAMERAS, "photography"),
        (DRONE, "photography"),
        (CUISINES, "catering"),
        (GUESTS, "catering"),
        (DECOR_STYLES, "decoration"),
        (EQUIPMENT, "music"),
    ];
    for question in &mut loaded.questions {
        if let Some((_, tag)) = tags.iter().find(|(id, _)| *id == question.id()) {
            *question = question.clone().visible_for(*tag);
        }
    }
    loaded
}

/// The vendor survey as first seeded: no selector role and no categories.
///
/// Loading it through the engine annotates it from the question texts.
pub fn legacy_vendor_research() -> LoadedSurvey {
    let created_at = Utc
        .with_ymd_and_hms(2026, 1, 15, 9, 0, 0)
        .single()
        .unwrap_or_default();

    let survey = Survey::new(SURVEY, "Eventizer vendor market research", Audience::Vendor)
        .with_description("ساعدنا نفهم احتياجاتك / Help us understand how you work")
        .with_created_at(created_at);

    let questions = vec![
        Question::new(
            SERVICE_TYPE,
            SURVEY,
            1,
            "ما نوع الخدمة التي تقدمها؟ / What type of service do you offer?",
            QuestionKind::single_choice([PHOTOGRAPHY, CATERING, DECOR, BAND, DJ, OTHER]),
        )
        .required(),
        Question::new(
            CAMERAS,
            SURVEY,
            2,
            "📸 How many cameras do you bring to an event?",
            QuestionKind::Text,
        )
        .required(),
        Question::new(
            DRONE,
            SURVEY,
            3,
            "📸 Do you offer drone shots?",
            QuestionKind::Boolean,
        ),
        Question::new(
            CUISINES,
            SURVEY,
            4,
            "🍽 Which cuisines do you serve?",
            QuestionKind::multi_choice(["Arabic", "International", "Desserts", OTHER]),
        )
        .required(),
        Question::new(
            GUESTS,
            SURVEY,
            5,
            "🍽 What is the largest number of guests you can serve?",
            QuestionKind::Text,
        ),
        Question::new(
            DECOR_STYLES,
            SURVEY,
            6,
            "🎨 Which decoration styles do you offer?",
            QuestionKind::multi_choice(["Classic", "Modern", "Floral", OTHER]),
        ),
        Question::new(
            EQUIPMENT,
            SURVEY,
            7,
            "🎵 Which equipment do you provide?",
            QuestionKind::multi_choice(["Sound system", "Lighting", "Stage", OTHER]),
        ),
        Question::new(
            CLIENT_CHANNELS,
            SURVEY,
            8,
            "How do you find clients today?",
            QuestionKind::multi_choice(["Instagram", "Word of mouth", "Wedding halls", OTHER]),
        )
        .required(),
        Question::new(
            LISTING_LIKELIHOOD,
            SURVEY,
            9,
            "How likely are you to list your services on Eventizer?",
            QuestionKind::rating(),
        )
        .required()
        .with_description("1 = not at all, 5 = certainly"),
        Question::new(
            COMMENTS,
            SURVEY,
            10,
            "Anything else you want us to know?",
            QuestionKind::Text,
        ),
    ];

    LoadedSurvey::new(survey, questions)
}
