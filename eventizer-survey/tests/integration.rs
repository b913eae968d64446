//! Integration tests for eventizer-survey

use eventizer_survey::{
    AnswerDraft, Audience, Breakdown, DraftValue, EngineConfig, MemoryStore, QuestionRole,
    ReportQuery, Respondent, ResponseTable, SurveyError, SurveyId, SurveySelector, SurveyStore,
    VisibilityResolver, aggregate, load_survey_with_questions, submit,
};
use seed_surveys::{customer, vendor};

fn visible_ids(
    loaded: &eventizer_survey::LoadedSurvey,
    draft: &AnswerDraft,
    config: &EngineConfig,
) -> Vec<eventizer_survey::QuestionId> {
    VisibilityResolver::new(&config.visibility)
        .visible(&loaded.questions, draft)
        .iter()
        .map(|q| q.id())
        .collect()
}

#[test]
fn test_audience_lookup_loads_ordered_questions() {
    let config = EngineConfig::default();
    let store = seed_surveys::seeded_store();

    let loaded = load_survey_with_questions(&store, Audience::Vendor, &config).unwrap();
    assert_eq!(loaded.survey.id, vendor::SURVEY);

    let order: Vec<_> = loaded.questions.iter().map(|q| q.order_index()).collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);
}

#[test]
fn test_missing_survey_is_not_found() {
    let config = EngineConfig::default();
    let store = MemoryStore::new().with_survey(seed_surveys::customer_feedback());

    let err = load_survey_with_questions(&store, Audience::Vendor, &config).unwrap_err();
    assert!(matches!(
        err,
        SurveyError::NotFound(SurveySelector::Audience(Audience::Vendor))
    ));

    let err = load_survey_with_questions(&store, SurveyId::from_u128(1), &config).unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn test_legacy_survey_is_annotated_like_the_configured_one() {
    let config = EngineConfig::default();
    let store = MemoryStore::new().with_survey(seed_surveys::legacy_vendor_research());
    let legacy = load_survey_with_questions(&store, vendor::SURVEY, &config).unwrap();
    let configured = seed_surveys::vendor_research();

    assert_eq!(legacy.questions[0].role(), QuestionRole::Selector);
    for (a, b) in legacy.questions.iter().zip(&configured.questions) {
        assert_eq!(a.visibility(), b.visibility(), "{}", a.text());
    }
}

#[test]
fn test_switching_service_type_hides_and_drops_stale_answers() {
    let config = EngineConfig::default();
    let mut store = seed_surveys::seeded_store();
    let loaded = load_survey_with_questions(&store, Audience::Vendor, &config).unwrap();

    let draft = AnswerDraft::new()
        .with_value(vendor::SERVICE_TYPE, DraftValue::choice(vendor::PHOTOGRAPHY))
        .with_value(vendor::CAMERAS, "Three bodies and a drone");
    let visible = visible_ids(&loaded, &draft, &config);
    assert!(visible.contains(&vendor::CAMERAS));
    assert!(!visible.contains(&vendor::CUISINES));

    let draft = draft
        .with_value(vendor::SERVICE_TYPE, DraftValue::choice(vendor::CATERING))
        .with_value(vendor::CUISINES, DraftValue::choices(["Arabic", "Desserts"]))
        .with_value(vendor::CLIENT_CHANNELS, DraftValue::choice("Instagram"))
        .with_value(vendor::LISTING_LIKELIHOOD, DraftValue::Rating(4));
    let visible = visible_ids(&loaded, &draft, &config);
    assert!(!visible.contains(&vendor::CAMERAS));
    assert!(visible.contains(&vendor::CUISINES));

    let response = submit(&mut store, &loaded, &draft, &Respondent::anonymous(), &config).unwrap();
    let rows = store.load_answers(&[response.id]).unwrap();
    assert!(rows.iter().all(|a| a.question_id != vendor::CAMERAS));
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_required_rating_left_blank_is_rejected_before_storing() {
    let config = EngineConfig::default();
    let mut store = seed_surveys::seeded_store();
    let loaded = load_survey_with_questions(&store, Audience::Customer, &config).unwrap();

    let draft = AnswerDraft::new()
        .with_value(customer::HEARD_FROM, DraftValue::choice("Google"))
        .with_value(customer::EASY_BOOKING, true);
    let err = submit(&mut store, &loaded, &draft, &Respondent::anonymous(), &config).unwrap_err();

    assert_eq!(err.missing_questions(), &[customer::EXPERIENCE]);
    assert_eq!(store.response_count(), 0);
}

#[test]
fn test_multi_select_other_is_counted_by_label() {
    let config = EngineConfig::default();
    let mut store = seed_surveys::seeded_store();
    let loaded = load_survey_with_questions(&store, Audience::Vendor, &config).unwrap();

    let draft = AnswerDraft::new()
        .with_value(vendor::SERVICE_TYPE, DraftValue::choice(vendor::DECOR))
        .with_value(
            vendor::CLIENT_CHANNELS,
            DraftValue::choices(["Instagram", vendor::OTHER]).with_other_text("Custom"),
        )
        .with_value(vendor::LISTING_LIKELIHOOD, DraftValue::Rating(5));
    let response = submit(&mut store, &loaded, &draft, &Respondent::anonymous(), &config).unwrap();

    let stored = store.load_answers(&[response.id]).unwrap();
    let channels = stored
        .iter()
        .find(|a| a.question_id == vendor::CLIENT_CHANNELS)
        .unwrap();
    assert_eq!(channels.answer_text, "Instagram, أخرى: Custom");

    let responses = store.load_responses(loaded.survey.id).unwrap();
    let report = aggregate(&loaded.questions, &responses, &stored, &config);
    let breakdown = &report.question(vendor::CLIENT_CHANNELS).unwrap().breakdown;
    assert_eq!(breakdown.count("Instagram"), Some(1));
    assert_eq!(breakdown.count(vendor::OTHER), Some(1));
    assert_eq!(breakdown.count("Word of mouth"), Some(0));
    assert_eq!(breakdown.count("Skipped"), Some(0));
}

#[test]
fn test_every_response_is_counted_once_per_single_choice_question() {
    let config = EngineConfig::default();
    let mut store = seed_surveys::seeded_store();
    let loaded = load_survey_with_questions(&store, Audience::Customer, &config).unwrap();

    let drafts = [
        ("Instagram", true, 5, None),
        ("A friend", false, 2, Some("Faster replies")),
        ("Instagram", true, 4, None),
    ];
    for (heard, easy, rating, improvement) in drafts {
        let mut draft = AnswerDraft::new()
            .with_value(customer::HEARD_FROM, DraftValue::choice(heard))
            .with_value(customer::EASY_BOOKING, easy)
            .with_value(customer::EXPERIENCE, DraftValue::Rating(rating));
        if let Some(text) = improvement {
            draft = draft.with_value(customer::IMPROVEMENTS, text);
        }
        submit(&mut store, &loaded, &draft, &Respondent::email("guest@example.com"), &config)
            .unwrap();
    }

    let responses = store.load_responses(loaded.survey.id).unwrap();
    let ids: Vec<_> = responses.iter().map(|r| r.id).collect();
    let answers = store.load_answers(&ids).unwrap();
    let report = aggregate(&loaded.questions, &responses, &answers, &config);
    assert_eq!(report.total_responses, 3);

    for question in &loaded.questions {
        if question.is_multi_select() {
            continue;
        }
        match &report.question(question.id()).unwrap().breakdown {
            Breakdown::Counts { total, .. } => assert_eq!(*total, 3, "{}", question.text()),
            Breakdown::FreeText(texts) => assert_eq!(texts, &vec!["Faster replies".to_string()]),
        }
    }

    let booked = &report.question(customer::BOOKED_SERVICES).unwrap().breakdown;
    assert_eq!(booked.count("Skipped"), Some(3));

    let table = ResponseTable::build(&loaded.questions, &responses, &answers);
    let friends = ReportQuery::new()
        .with_filter(customer::HEARD_FROM, "friend")
        .apply(&table);
    assert_eq!(friends.rows.len(), 1);
}
