//! Parsing model output into an `Answer`

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Answer, NOT_APPLICABLE};

/// Extract the outermost JSON object from model output and validate its shape
///
/// Models often wrap the object in prose or code fences; everything outside
/// the first `{` and the last `}` is ignored.
pub fn parse_answer(raw: &str) -> Result<Answer> {
    let pattern = Regex::new(r"(?s)\{.*\}")
        .map_err(|e| Error::internal(format!("Invalid JSON pattern: {}", e)))?;

    let json = pattern
        .find(raw)
        .ok_or_else(|| Error::format("No JSON object found in model response", raw))?
        .as_str();

    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::format(format!("Model response is not valid JSON: {}", e), raw))?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::format("Model response is not a JSON object", raw))?;

    let decision = required_text(object.get("decision"), "decision", raw)?;
    let justification = required_text(object.get("justification"), "justification", raw)?;

    let amount = match object.get("amount") {
        None | Some(Value::Null) => NOT_APPLICABLE.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => NOT_APPLICABLE.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(Error::format(
                format!("Field 'amount' has unexpected type: {}", other),
                raw,
            ))
        }
    };

    Ok(Answer::new(decision, amount, justification))
}

fn required_text(value: Option<&Value>, field: &str, raw: &str) -> Result<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(Error::format(format!("Field '{}' is empty", field), raw)),
        Some(_) => Err(Error::format(format!("Field '{}' must be a string", field), raw)),
        None => Err(Error::format(format!("Missing field '{}'", field), raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        let answer = parse_answer(
            r#"{"decision": "Approved", "amount": "Up to 50,000 INR", "justification": "Clause 3 covers it."}"#,
        )
        .unwrap();
        assert_eq!(answer, Answer::new("Approved", "Up to 50,000 INR", "Clause 3 covers it."));
    }

    #[test]
    fn test_object_wrapped_in_prose_and_fences() {
        let raw = "Sure, here is the result:\n```json\n{\n  \"decision\": \"Rejected\",\n  \"amount\": null,\n  \"justification\": \"6-year waiting period applies.\"\n}\n```\nLet me know!";
        let answer = parse_answer(raw).unwrap();
        assert_eq!(answer.decision, "Rejected");
        assert_eq!(answer.amount, NOT_APPLICABLE);
    }

    #[test]
    fn test_amount_variants() {
        let numeric = parse_answer(r#"{"decision":"Approved","amount":25000,"justification":"x"}"#).unwrap();
        assert_eq!(numeric.amount, "25000");

        let missing = parse_answer(r#"{"decision":"Approved","justification":"x"}"#).unwrap();
        assert_eq!(missing.amount, NOT_APPLICABLE);

        let nested = parse_answer(r#"{"decision":"Approved","amount":{"v":1},"justification":"x"}"#);
        assert!(matches!(nested, Err(Error::Format { .. })));
    }

    #[test]
    fn test_missing_or_empty_fields() {
        for raw in [
            r#"{"amount":"1","justification":"x"}"#,
            r#"{"decision":"  ","amount":"1","justification":"x"}"#,
            r#"{"decision":"Approved","amount":"1"}"#,
            r#"{"decision":true,"justification":"x"}"#,
        ] {
            assert!(matches!(parse_answer(raw), Err(Error::Format { .. })), "{raw}");
        }
    }

    #[test]
    fn test_no_json_keeps_raw() {
        match parse_answer("I cannot decide.") {
            Err(Error::Format { raw: Some(raw), .. }) => assert_eq!(raw, "I cannot decide."),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(parse_answer("{not json}"), Err(Error::Format { .. })));
    }
}
