//! Conversion between form input, typed answers and stored answer text.
//!
//! Stored text formats:
//! - single choice: the label, or `"<sentinel>: <text>"` for an "other" option with companion text
//! - multi choice: labels joined with `", "`, each following the single choice rule
//! - boolean: `"true"` / `"false"`
//! - rating: the integer
//! - text: as typed

use tracing::debug;

use crate::{
    AnswerValue, Choice, ChoiceQuestion, DraftValue, EngineConfig, Question, QuestionKind,
    RatingQuestion, SurveyError,
};

/// Turn form input into a typed answer.
///
/// Returns `Ok(None)` when nothing was entered. Fails with `SurveyError::Encoding`
/// when the input does not fit the question's type.
pub fn encode(
    question: &Question,
    value: &DraftValue,
    config: &EngineConfig,
) -> Result<Option<AnswerValue>, SurveyError> {
    if value.is_blank() {
        return Ok(None);
    }

    let encoded = match (question.kind(), value) {
        (QuestionKind::Text, DraftValue::Text(text)) => AnswerValue::FreeText(text.clone()),

        (QuestionKind::Rating(rating), DraftValue::Rating(r)) => {
            AnswerValue::Rating(check_rating(question, rating, *r)?)
        }
        (QuestionKind::Rating(rating), DraftValue::Text(text)) => {
            let r = text.trim().parse::<i64>().map_err(|_| {
                SurveyError::encoding(question.id(), format!("'{text}' is not a whole number"))
            })?;
            AnswerValue::Rating(check_rating(question, rating, r)?)
        }

        (QuestionKind::Boolean, DraftValue::Boolean(b)) => AnswerValue::Boolean(*b),
        (QuestionKind::Boolean, DraftValue::Text(text)) => match text.as_str() {
            "true" => AnswerValue::Boolean(true),
            "false" => AnswerValue::Boolean(false),
            _ => {
                return Err(SurveyError::encoding(
                    question.id(),
                    format!("'{text}' is neither \"true\" nor \"false\""),
                ));
            }
        },

        (
            QuestionKind::Choice(choice),
            DraftValue::Choice {
                selected,
                other_text,
            },
        ) => encode_choice(question, choice, selected, other_text, config)?,

        (kind, value) => {
            return Err(SurveyError::encoding(
                question.id(),
                format!(
                    "a {} question cannot take {}",
                    kind.type_name(),
                    draft_kind_name(value)
                ),
            ));
        }
    };

    debug!(question = %question.id(), answer = %encoded, "encoded answer");
    Ok(Some(encoded))
}

/// Check whether form input counts as an answer for required-question purposes.
///
/// Blank input is unanswered, and so is a picked "other" option without companion text.
pub fn is_answered(value: &DraftValue, config: &EngineConfig) -> bool {
    if value.is_blank() {
        return false;
    }
    match value {
        DraftValue::Choice {
            selected,
            other_text,
        } => {
            !other_text.trim().is_empty()
                || !selected.iter().any(|label| config.is_other_sentinel(label))
        }
        _ => true,
    }
}

/// Turn stored answer text back into a typed answer.
///
/// A choice part that exactly equals a declared option is taken as that option, even if it
/// contains a colon. Any other part containing `:` is read as `"<label>: <text>"`.
pub fn decode(question: &Question, answer_text: &str) -> Result<AnswerValue, SurveyError> {
    match question.kind() {
        QuestionKind::Text => Ok(AnswerValue::FreeText(answer_text.to_string())),

        QuestionKind::Rating(_) => answer_text
            .trim()
            .parse::<u8>()
            .map(AnswerValue::Rating)
            .map_err(|_| {
                SurveyError::encoding(
                    question.id(),
                    format!("stored rating '{answer_text}' is not a number"),
                )
            }),

        QuestionKind::Boolean => match answer_text.trim() {
            "true" => Ok(AnswerValue::Boolean(true)),
            "false" => Ok(AnswerValue::Boolean(false)),
            other => Err(SurveyError::encoding(
                question.id(),
                format!("stored boolean '{other}' is neither \"true\" nor \"false\""),
            )),
        },

        QuestionKind::Choice(choice) if choice.multi_select => Ok(AnswerValue::Multi(
            answer_text
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| decode_choice(choice, part))
                .collect(),
        )),

        QuestionKind::Choice(choice) => Ok(AnswerValue::Single(decode_choice(
            choice,
            answer_text.trim(),
        ))),
    }
}

fn decode_choice(choice: &ChoiceQuestion, part: &str) -> Choice {
    if choice.has_option(part) {
        return Choice::Label(part.to_string());
    }
    match part.split_once(':') {
        Some((label, text)) => Choice::Other {
            label: label.trim().to_string(),
            text: text.trim().to_string(),
        },
        None => Choice::Label(part.to_string()),
    }
}

fn encode_choice(
    question: &Question,
    choice: &ChoiceQuestion,
    selected: &[String],
    other_text: &str,
    config: &EngineConfig,
) -> Result<AnswerValue, SurveyError> {
    if !choice.multi_select && selected.len() > 1 {
        return Err(SurveyError::encoding(
            question.id(),
            format!("{} options picked for a single-choice question", selected.len()),
        ));
    }

    let mut choices: Vec<Choice> = Vec::with_capacity(selected.len());
    for label in selected {
        if !choice.has_option(label) {
            return Err(SurveyError::encoding(
                question.id(),
                format!("'{label}' is not one of the options"),
            ));
        }
        if choices.iter().any(|c| c.label() == label) {
            continue;
        }
        let other_text = other_text.trim();
        choices.push(if config.is_other_sentinel(label) && !other_text.is_empty() {
            Choice::Other {
                label: label.clone(),
                text: other_text.to_string(),
            }
        } else {
            Choice::Label(label.clone())
        });
    }

    if choice.multi_select {
        Ok(AnswerValue::Multi(choices))
    } else {
        // Non-blank single selections hold exactly one label here.
        let single = choices.into_iter().next().ok_or_else(|| {
            SurveyError::encoding(question.id(), "no option picked for a single-choice question")
        })?;
        Ok(AnswerValue::Single(single))
    }
}

fn check_rating(question: &Question, rating: &RatingQuestion, value: i64) -> Result<u8, SurveyError> {
    if !rating.accepts(value) {
        return Err(SurveyError::encoding(
            question.id(),
            format!(
                "rating {value} is outside {}..={}",
                rating.min, rating.max
            ),
        ));
    }
    u8::try_from(value).map_err(|_| SurveyError::encoding(question.id(), "rating out of range"))
}

fn draft_kind_name(value: &DraftValue) -> &'static str {
    match value {
        DraftValue::Text(_) => "text",
        DraftValue::Rating(_) => "a rating",
        DraftValue::Boolean(_) => "a yes/no value",
        DraftValue::Choice { .. } => "picked options",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QuestionId, SurveyId};

    fn question(kind: QuestionKind) -> Question {
        Question::new(
            QuestionId::from_u128(9),
            SurveyId::from_u128(1),
            1,
            "Question",
            kind,
        )
    }

    fn encode_ok(question: &Question, value: DraftValue) -> AnswerValue {
        encode(question, &value, &EngineConfig::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn multi_select_with_other_text() {
        let q = question(QuestionKind::multi_choice(["A", "B", "Other"]));
        let value = encode_ok(&q, DraftValue::choices(["A", "Other"]).with_other_text("  Custom "));
        assert_eq!(value.to_answer_text(), "A, Other: Custom");

        let decoded = decode(&q, &value.to_answer_text()).unwrap();
        assert_eq!(decoded.labels(), vec!["A", "Other"]);
        assert_eq!(decoded, value);
    }

    #[test]
    fn single_choice_arabic_other_sentinel() {
        let q = question(QuestionKind::single_choice(["تصوير", "أخرى"]));
        let value = encode_ok(&q, DraftValue::choice("أخرى").with_other_text("xyz"));
        assert_eq!(value.to_answer_text(), "أخرى: xyz");

        let decoded = decode(&q, "أخرى: xyz").unwrap();
        assert_eq!(decoded.labels(), vec!["أخرى"]);
        assert_eq!(decoded.to_answer_text(), "أخرى: xyz");
    }

    #[test]
    fn other_without_text_is_kept_verbatim_but_unanswered() {
        let config = EngineConfig::default();
        let q = question(QuestionKind::single_choice(["A", "Other"]));
        let draft = DraftValue::choice("Other").with_other_text("   ");
        assert_eq!(encode_ok(&q, draft.clone()).to_answer_text(), "Other");
        assert!(!is_answered(&draft, &config));
        assert!(is_answered(&DraftValue::choice("A"), &config));
    }

    #[test]
    fn other_text_ignored_for_regular_labels() {
        let q = question(QuestionKind::single_choice(["A", "Other"]));
        let value = encode_ok(&q, DraftValue::choice("A").with_other_text("ignored"));
        assert_eq!(value.to_answer_text(), "A");
    }

    #[test]
    fn multi_select_keeps_selection_order_and_drops_duplicates() {
        let q = question(QuestionKind::multi_choice(["A", "B", "C"]));
        let value = encode_ok(&q, DraftValue::choices(["C", "A", "C"]));
        assert_eq!(value.to_answer_text(), "C, A");
    }

    #[test]
    fn single_choice_rejects_several_labels_and_unknown_labels() {
        let q = question(QuestionKind::single_choice(["A", "B"]));
        let config = EngineConfig::default();
        assert!(matches!(
            encode(&q, &DraftValue::choices(["A", "B"]), &config),
            Err(SurveyError::Encoding { .. })
        ));
        assert!(matches!(
            encode(&q, &DraftValue::choice("Z"), &config),
            Err(SurveyError::Encoding { .. })
        ));
    }

    #[test]
    fn rating_validation() {
        let q = question(QuestionKind::rating());
        let config = EngineConfig::default();
        assert_eq!(encode_ok(&q, DraftValue::Rating(5)), AnswerValue::Rating(5));
        assert_eq!(encode_ok(&q, DraftValue::from(" 3 ")), AnswerValue::Rating(3));
        assert!(encode(&q, &DraftValue::Rating(0), &config).is_err());
        assert!(encode(&q, &DraftValue::Rating(6), &config).is_err());
        assert!(encode(&q, &DraftValue::from("3.5"), &config).is_err());
        assert_eq!(decode(&q, "4").unwrap(), AnswerValue::Rating(4));
    }

    #[test]
    fn boolean_must_be_exact() {
        let q = question(QuestionKind::Boolean);
        let config = EngineConfig::default();
        assert_eq!(encode_ok(&q, DraftValue::from("true")), AnswerValue::Boolean(true));
        assert_eq!(encode_ok(&q, DraftValue::from(false)), AnswerValue::Boolean(false));
        assert!(encode(&q, &DraftValue::from("yes"), &config).is_err());
        assert!(encode(&q, &DraftValue::from("True"), &config).is_err());
        assert!(decode(&q, "maybe").is_err());
    }

    #[test]
    fn text_passes_through() {
        let q = question(QuestionKind::Text);
        let config = EngineConfig::default();
        assert_eq!(
            encode_ok(&q, DraftValue::from("Loved it, thanks: really")).to_answer_text(),
            "Loved it, thanks: really"
        );
        assert_eq!(encode(&q, &DraftValue::from("  "), &config).unwrap(), None);
        assert!(encode(&q, &DraftValue::Rating(3), &config).is_err());
    }

    #[test]
    fn declared_option_with_colon_decodes_as_label() {
        let q = question(QuestionKind::single_choice(["Time: morning", "Time: evening"]));
        let decoded = decode(&q, "Time: morning").unwrap();
        assert_eq!(decoded, AnswerValue::Single(Choice::Label("Time: morning".into())));
    }

    #[test]
    fn decode_ignores_empty_parts() {
        let q = question(QuestionKind::multi_choice(["A", "B"]));
        let decoded = decode(&q, "A, , B,").unwrap();
        assert_eq!(decoded.labels(), vec!["A", "B"]);
    }
}
