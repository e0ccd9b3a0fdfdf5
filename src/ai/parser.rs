//! Extract the JSON object from free-form narrative text
//!
//! Models wrap their answer in prose, markdown fences or both. Extraction
//! takes the first fenced block if there is one, then narrows to the
//! outermost `{...}` span and parses that. Field-level checks are not done
//! here; see [`validate_response`](crate::scoring::validate_response).

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("No JSON object found in response")]
    NoStructuredData,

    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Response JSON is not an object")]
    NotAnObject,
}

static FENCE: OnceLock<Regex> = OnceLock::new();
static OBJECT: OnceLock<Regex> = OnceLock::new();

fn fence_pattern() -> &'static Regex {
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("fence pattern is valid")
    })
}

fn object_pattern() -> &'static Regex {
    OBJECT.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("object pattern is valid"))
}

/// Parse the structured part of a narrative response
pub fn parse_response(text: &str) -> Result<Map<String, Value>, ParseError> {
    let candidate = fence_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str());

    let object = object_pattern()
        .find(candidate)
        .ok_or(ParseError::NoStructuredData)?
        .as_str();

    match serde_json::from_str::<Value>(object) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ParseError::NotAnObject),
        Err(e) => Err(ParseError::InvalidJson(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block() {
        let text = "Here is my assessment:\n```json\n{\"score\": 7.5, \"tier\": \"Chadlite\"}\n```\nThanks!";
        let map = parse_response(text).expect("parse fenced");
        assert_eq!(map["score"], 7.5);
        assert_eq!(map["tier"], "Chadlite");
    }

    #[test]
    fn test_fence_without_language() {
        let map = parse_response("```\n{\"score\": 6}\n```").expect("parse fenced");
        assert_eq!(map["score"], 6);
    }

    #[test]
    fn test_bare_object_in_prose() {
        let text = "Sure. {\"score\": 8, \"radar_data\": {\"eyes\": 9}} Hope that helps.";
        let map = parse_response(text).expect("parse bare");
        assert_eq!(map["radar_data"]["eyes"], 9);
    }

    #[test]
    fn test_non_json_text_fails() {
        assert_eq!(
            parse_response("I'm unable to analyse this image."),
            Err(ParseError::NoStructuredData)
        );
        assert_eq!(parse_response(""), Err(ParseError::NoStructuredData));
    }

    #[test]
    fn test_broken_json_fails() {
        let err = parse_response("```json\n{\"score\": 7.5,\n```").unwrap_err();
        assert_eq!(err, ParseError::NoStructuredData);

        let err = parse_response("{score: seven}").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_deterministic_failure() {
        let text = "{not json at all}";
        assert_eq!(parse_response(text), parse_response(text));
    }
}
