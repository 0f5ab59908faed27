//! Decode LLM replies into JSON

use serde_json::Value;
use thiserror::Error;

/// A reply that did not decode as JSON
///
/// Keeps the reply verbatim so a person can inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reply is not valid JSON: {reason}")]
pub struct ParseFailure {
    /// The reply exactly as received
    pub raw_text: String,
    /// Decoder error description
    pub reason: String,
}

/// Parse an LLM reply as JSON
///
/// One leading code fence (with or without a `json` tag) and one trailing
/// fence are removed first. The decoded value is returned as-is; no keys
/// are required.
///
/// # Examples
///
/// ```
/// use bidscope_extractor::parse_answer;
/// use serde_json::json;
///
/// let value = parse_answer("```json\n{\"total_bid\": 100}\n```").unwrap();
/// assert_eq!(value, json!({"total_bid": 100}));
///
/// let failure = parse_answer("not json at all").unwrap_err();
/// assert_eq!(failure.raw_text, "not json at all");
/// ```
pub fn parse_answer(raw: &str) -> Result<Value, ParseFailure> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| ParseFailure {
        raw_text: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Remove markdown code-fence wrapping, handling replies LLMs wrap in ```json blocks
fn strip_code_fence(raw: &str) -> &str {
    let mut content = raw.trim();

    if let Some(rest) = content.strip_prefix("```") {
        content = rest;
        if content.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            content = &content[4..];
        }
    }
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }

    content.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_json() {
        let value = parse_answer(r#"{"total_bid": 100, "labor": []}"#).unwrap();
        assert_eq!(value, json!({"total_bid": 100, "labor": []}));
    }

    #[test]
    fn test_parse_json_fence() {
        let value = parse_answer("```json\n{\"total_bid\": 100}\n```").unwrap();
        assert_eq!(value, json!({"total_bid": 100}));
    }

    #[test]
    fn test_parse_bare_fence() {
        let value = parse_answer("```\n[1, 2]\n```").unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_parse_uppercase_tag_and_padding() {
        let value = parse_answer("  \n```JSON\n{\"a\": null}\n```\n ").unwrap();
        assert_eq!(value, json!({"a": null}));
    }

    #[test]
    fn test_parse_leading_fence_only() {
        let value = parse_answer("```json\n{\"a\": 1}").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_parse_failure_keeps_raw_text() {
        let failure = parse_answer("not json at all").unwrap_err();
        assert_eq!(failure.raw_text, "not json at all");
        assert!(!failure.reason.is_empty());
    }

    #[test]
    fn test_parse_failure_keeps_fenced_raw_text() {
        let raw = "```json\n{\"a\": \n```";
        let failure = parse_answer(raw).unwrap_err();
        assert_eq!(failure.raw_text, raw);
    }

    #[test]
    fn test_prose_around_json_is_a_failure() {
        assert!(parse_answer("Here is the estimate: {\"a\": 1}").is_err());
    }

    #[test]
    fn test_missing_keys_are_accepted() {
        let value = parse_answer(r#"{"unexpected": true}"#).unwrap();
        assert_eq!(value["unexpected"], true);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
    }

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 $,.`]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_clean_json_round_trips(value in json_value()) {
            let text = serde_json::to_string(&value).unwrap();
            prop_assert_eq!(parse_answer(&text).unwrap(), value);
        }

        #[test]
        fn prop_fenced_json_round_trips(value in json_value()) {
            let text = format!("```json\n{}\n```", serde_json::to_string_pretty(&value).unwrap());
            prop_assert_eq!(parse_answer(&text).unwrap(), value);
        }
    }
}
