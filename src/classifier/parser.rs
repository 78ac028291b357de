use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::ClassifierError;

/// First brace-delimited span, spanning lines (compiled once via LazyLock).
static RE_JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Parse a classifier response into a yes/no answer for the given key.
///
/// Models frequently wrap the JSON in markdown fences or lead with prose, so
/// the fences are stripped and the first `{...}` span is extracted before
/// parsing. A missing key reads as "No"; unparseable JSON is an error so the
/// caller can apply its failure policy.
pub fn parse_yes_no(response: &str, key: &str) -> Result<bool, ClassifierError> {
    let cleaned = response.replace("```json", "").replace("```", "");
    let json_str = extract_json_object(&cleaned)
        .ok_or_else(|| ClassifierError::MalformedResponse(format!("No JSON object in: {response}")))?;

    let data: Value =
        serde_json::from_str(&json_str).map_err(|e| ClassifierError::JsonParsing(e.to_string()))?;

    Ok(data.get(key).and_then(Value::as_str) == Some("Yes"))
}

/// Pull the first brace-delimited span out of the response text.
fn extract_json_object(text: &str) -> Option<String> {
    RE_JSON_OBJECT
        .find(text.trim())
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_yes() {
        assert!(parse_yes_no(r#"{"angioedema": "Yes"}"#, "angioedema").unwrap());
    }

    #[test]
    fn parses_plain_no() {
        assert!(!parse_yes_no(r#"{"angioedema": "No"}"#, "angioedema").unwrap());
    }

    #[test]
    fn strips_markdown_fences() {
        let response = "```json\n{\"BS\": \"Yes\"}\n```";
        assert!(parse_yes_no(response, "BS").unwrap());
    }

    #[test]
    fn tolerates_surrounding_prose() {
        let response = "Based on the symptoms described:\n{\"ADHF\": \"Yes\"}\nLet me know if you need more.";
        assert!(parse_yes_no(response, "ADHF").unwrap());
    }

    #[test]
    fn multiline_object() {
        let response = "{\n  \"gynecomastia\": \"No\"\n}";
        assert!(!parse_yes_no(response, "gynecomastia").unwrap());
    }

    #[test]
    fn missing_key_reads_as_no() {
        assert!(!parse_yes_no(r#"{"other": "Yes"}"#, "angioedema").unwrap());
    }

    #[test]
    fn non_yes_value_reads_as_no() {
        assert!(!parse_yes_no(r#"{"angioedema": "yes"}"#, "angioedema").unwrap());
        assert!(!parse_yes_no(r#"{"angioedema": true}"#, "angioedema").unwrap());
    }

    #[test]
    fn no_json_is_an_error() {
        let err = parse_yes_no("I think the patient has angioedema.", "angioedema").unwrap_err();
        assert!(matches!(err, ClassifierError::MalformedResponse(_)));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_yes_no(r#"{"angioedema": }"#, "angioedema").unwrap_err();
        assert!(matches!(err, ClassifierError::JsonParsing(_)));
    }
}
