//! Extraction and validation of the question batch returned by the model.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Question, NUM_OPTIONS};

/// First `[` through the last `]`, across newlines.
static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("JSON array pattern is valid"));

/// A question object that does not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected a JSON array of questions")]
    NotAnArray,

    #[error("the question list is empty")]
    Empty,

    #[error("question {index}: {reason}")]
    Invalid { index: usize, reason: String },
}

/// Locate the bracketed question array inside free-form model output.
///
/// Models often wrap the array in prose or a fenced code block, so only the
/// span between the first `[` and the last `]` is returned.
pub fn extract_json_array(text: &str) -> Option<&str> {
    JSON_ARRAY.find(text).map(|m| m.as_str())
}

/// Check every element of `value` and build the questions.
pub fn validate_questions(value: &Value) -> Result<Vec<Question>, ShapeError> {
    let items = value.as_array().ok_or(ShapeError::NotAnArray)?;
    if items.is_empty() {
        return Err(ShapeError::Empty);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            validate_question(item).map_err(|reason| ShapeError::Invalid { index, reason })
        })
        .collect()
}

fn validate_question(item: &Value) -> Result<Question, String> {
    let object = item.as_object().ok_or("not an object")?;

    let question = object
        .get("question")
        .and_then(Value::as_str)
        .ok_or("missing string field `question`")?
        .trim();
    if question.is_empty() {
        return Err("`question` is empty".to_string());
    }

    let options = object
        .get("options")
        .and_then(Value::as_array)
        .ok_or("missing array field `options`")?;
    if options.len() != NUM_OPTIONS {
        return Err(format!(
            "`options` must have {} entries, found {}",
            NUM_OPTIONS,
            options.len()
        ));
    }
    let options: Vec<String> = options
        .iter()
        .map(|option| option.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<_>>()
        .ok_or("`options` must only contain strings")?;
    let options: [String; NUM_OPTIONS] = options
        .try_into()
        .map_err(|_| "`options` has the wrong length".to_string())?;

    let correct_answer_index = object
        .get("correctAnswerIndex")
        .and_then(Value::as_u64)
        .ok_or("missing integer field `correctAnswerIndex`")? as usize;
    if correct_answer_index >= NUM_OPTIONS {
        return Err(format!(
            "`correctAnswerIndex` {} is out of range",
            correct_answer_index
        ));
    }

    let hint = object
        .get("hint")
        .and_then(Value::as_str)
        .ok_or("missing string field `hint`")?
        .trim()
        .to_string();

    Ok(Question {
        question: question.to_string(),
        options,
        correct_answer_index,
        hint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(index: u64) -> Value {
        json!({
            "question": "What does CPU stand for?",
            "options": ["Central Processing Unit", "Core Power Unit", "Computer Prime Utility", "Central Peripheral Unit"],
            "correctAnswerIndex": index,
            "hint": "It processes instructions."
        })
    }

    #[test]
    fn test_extract_array_from_fenced_reply() {
        let reply = "Here you go:\n```json\n[{\"question\": \"a\"}]\n```\nGood luck!";
        assert_eq!(extract_json_array(reply), Some("[{\"question\": \"a\"}]"));
    }

    #[test]
    fn test_extract_array_missing() {
        assert_eq!(extract_json_array("Sorry, I cannot help with that."), None);
    }

    #[test]
    fn test_validate_accepts_well_formed_batch() {
        let questions = validate_questions(&json!([sample(0), sample(3)])).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].correct_answer_index, 3);
        assert_eq!(questions[0].correct_option(), "Central Processing Unit");
    }

    #[test]
    fn test_validate_rejects_empty_and_non_array() {
        assert_eq!(validate_questions(&json!([])), Err(ShapeError::Empty));
        assert_eq!(
            validate_questions(&json!({"question": "x"})),
            Err(ShapeError::NotAnArray)
        );
    }

    #[test]
    fn test_validate_reports_offending_index() {
        let mut bad = sample(1);
        bad["options"] = json!(["only", "three", "options"]);

        match validate_questions(&json!([sample(0), bad])) {
            Err(ShapeError::Invalid { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("4 entries"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_answer() {
        let result = validate_questions(&json!([sample(4)]));
        assert!(matches!(result, Err(ShapeError::Invalid { index: 0, .. })));
    }

    #[test]
    fn test_validate_rejects_wrong_field_types() {
        let mut no_hint = sample(0);
        no_hint.as_object_mut().unwrap().remove("hint");
        assert!(validate_questions(&json!([no_hint])).is_err());

        let mut numeric_option = sample(0);
        numeric_option["options"][2] = json!(42);
        assert!(validate_questions(&json!([numeric_option])).is_err());

        let mut string_index = sample(0);
        string_index["correctAnswerIndex"] = json!("1");
        assert!(validate_questions(&json!([string_index])).is_err());

        let mut blank = sample(0);
        blank["question"] = json!("   ");
        assert!(validate_questions(&json!([blank])).is_err());
    }
}
