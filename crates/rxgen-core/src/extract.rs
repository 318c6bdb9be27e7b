//! Best-effort extraction of the structured reply out of model text.
//!
//! [`extract_response`] is total: any input yields an [`ExtractedResult`],
//! missing or malformed data falls back to per-field defaults.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::types::{ExtractedResult, DEFAULT_LANGUAGE};

lazy_static! {
    // First ```json fence (tag is case-insensitive) up to the first closing fence.
    static ref JSON_FENCE: Regex =
        Regex::new(r"(?is)```json[ \t]*\r?\n(.*?)```").expect("valid fence pattern");
}

/// Return the body of the first fenced JSON block, if any.
pub fn find_json_block(text: &str) -> Option<&str> {
    JSON_FENCE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str())
}

pub fn extract_response(text: &str) -> ExtractedResult {
    let Some(block) = find_json_block(text) else {
        log::debug!("No fenced json block in model reply");
        return ExtractedResult::default();
    };

    match serde_json::from_str::<Value>(block) {
        Ok(Value::Object(fields)) => from_fields(&fields),
        Ok(other) => {
            log::debug!("Fenced json block is not an object: {}", json_kind(&other));
            ExtractedResult::default()
        }
        Err(e) => {
            log::debug!("Failed to parse fenced json block: {}", e);
            ExtractedResult::default()
        }
    }
}

fn from_fields(fields: &Map<String, Value>) -> ExtractedResult {
    ExtractedResult {
        regex: non_empty_string(fields.get("regex")),
        flags: string_or_empty(fields.get("flags")),
        explanation: string_or_empty(fields.get("explanation")),
        language: non_empty_string(fields.get("language"))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        sample_matches: string_list(fields.get("sampleMatches")),
        sample_non_matches: string_list(fields.get("sampleNonMatches")),
        notes: string_or_empty(fields.get("notes")),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn string_or_empty(value: Option<&Value>) -> String {
    non_empty_string(value).unwrap_or_default()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
            Value::Array(_) | Value::Object(_) => None,
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(body: &str) -> String {
        format!("Here is the pattern you asked for.\n\n```json\n{body}\n```\n\nGood luck!")
    }

    #[test]
    fn well_formed_block_is_read_verbatim() {
        let text = reply(
            r#"{
  "regex": "^\\d{4}-\\d{2}-\\d{2}$",
  "flags": "m",
  "explanation": "ISO calendar date",
  "sampleMatches": ["2024-01-31", "1999-12-01"],
  "sampleNonMatches": ["31/01/2024"],
  "notes": "No range validation",
  "language": "python"
}"#,
        );

        let extracted = extract_response(&text);
        assert_eq!(extracted.regex.as_deref(), Some(r"^\d{4}-\d{2}-\d{2}$"));
        assert_eq!(extracted.flags, "m");
        assert_eq!(extracted.explanation, "ISO calendar date");
        assert_eq!(extracted.sample_matches, vec!["2024-01-31", "1999-12-01"]);
        assert_eq!(extracted.sample_non_matches, vec!["31/01/2024"]);
        assert_eq!(extracted.notes, "No range validation");
        assert_eq!(extracted.language, "python");
    }

    #[test]
    fn missing_block_yields_default_record() {
        let extracted = extract_response("I cannot help with that.");
        assert_eq!(extracted, ExtractedResult::default());
        assert!(extracted.regex.is_none());
        assert_eq!(extracted.language, "javascript");
    }

    #[test]
    fn invalid_json_yields_default_record() {
        let extracted = extract_response(&reply("{ \"regex\": \"abc\", "));
        assert_eq!(extracted, ExtractedResult::default());
    }

    #[test]
    fn non_object_json_yields_default_record() {
        let extracted = extract_response(&reply("[\"abc\"]"));
        assert_eq!(extracted, ExtractedResult::default());
    }

    #[test]
    fn missing_keys_fall_back_individually() {
        let extracted = extract_response(&reply(r#"{"regex": "a+", "unknown": 1}"#));

        assert_eq!(extracted.regex.as_deref(), Some("a+"));
        assert_eq!(extracted.flags, "");
        assert_eq!(extracted.explanation, "");
        assert_eq!(extracted.notes, "");
        assert_eq!(extracted.language, "javascript");
        assert!(extracted.sample_matches.is_empty());
        assert!(extracted.sample_non_matches.is_empty());
    }

    #[test]
    fn empty_regex_is_treated_as_absent() {
        let extracted = extract_response(&reply(r#"{"regex": ""}"#));
        assert!(extracted.regex.is_none());
    }

    #[test]
    fn fence_tag_is_case_insensitive() {
        let text = "```JSON\n{\"regex\": \"x\"}\n```";
        assert_eq!(extract_response(text).regex.as_deref(), Some("x"));
    }

    #[test]
    fn only_the_first_block_is_used() {
        let text = "```json\n{\"regex\": \"first\"}\n```\n```json\n{\"regex\": \"second\"}\n```";
        assert_eq!(extract_response(text).regex.as_deref(), Some("first"));
    }

    #[test]
    fn untagged_fences_are_ignored() {
        let text = "```\n{\"regex\": \"x\"}\n```";
        assert_eq!(extract_response(text), ExtractedResult::default());
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let text = "```json\r\n{\"regex\": \"x\"}\r\n```";
        assert_eq!(extract_response(text).regex.as_deref(), Some("x"));
    }

    #[test]
    fn scalar_samples_are_rendered_and_nested_values_dropped() {
        let extracted = extract_response(&reply(
            r#"{"sampleMatches": ["a", 7, true, null, {"x": 1}, ["y"]]}"#,
        ));
        assert_eq!(extracted.sample_matches, vec!["a", "7", "true"]);
    }

    #[test]
    fn non_array_samples_become_empty() {
        let extracted = extract_response(&reply(r#"{"sampleMatches": "abc"}"#));
        assert!(extracted.sample_matches.is_empty());
    }
}
