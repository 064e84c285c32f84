//! Turning a freeform response body into display text.

use serde_json::Value;

use mygo_contracts::request::Operation;

/// Shown when a response carries none of the known text fields.
pub const EMPTY_REPLY: &str = "The agent returned no content for this request.";

/// Extract the display text of a freeform response.
///
/// Tiers, first non-empty wins: the operation's own reply field, then
/// `result`, then a server-supplied `error`, then `EMPTY_REPLY`. A body that
/// is itself a string is used as-is.
pub fn reply_text(body: &Value, operation: Operation) -> String {
    if let Value::String(text) = body {
        if !text.trim().is_empty() {
            return text.clone();
        }
    }

    operation
        .reply_field()
        .into_iter()
        .chain(["result", "error"])
        .find_map(|field| body.get(field).and_then(field_text))
        .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

/// Extract a generated artifact, or the reason there is none.
///
/// Unlike `reply_text`, a server `error` is a failure here, never content.
pub fn artifact_text(body: &Value, operation: Operation) -> Result<String, String> {
    let artifact = operation
        .reply_field()
        .into_iter()
        .chain(["result"])
        .find_map(|field| body.get(field).and_then(field_text));
    match artifact {
        Some(text) => Ok(text),
        None => Err(body
            .get("error")
            .and_then(field_text)
            .unwrap_or_else(|| EMPTY_REPLY.to_string())),
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        // Structured payloads (test case tables, analysis reports) are shown raw.
        Value::Array(items) if !items.is_empty() => serde_json::to_string_pretty(value).ok(),
        Value::Object(map) if !map.is_empty() => serde_json::to_string_pretty(value).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_field_wins() {
        let body = json!({ "answer": "42", "result": "ignored", "error": "ignored" });
        assert_eq!(reply_text(&body, Operation::AskYoda), "42");

        let body = json!({ "spec": "# Spec", "answer": "wrong field" });
        assert_eq!(reply_text(&body, Operation::GenerateSpec), "# Spec");
    }

    #[test]
    fn falls_back_to_result_then_error() {
        let body = json!({ "result": "from result" });
        assert_eq!(reply_text(&body, Operation::ExplainCode), "from result");

        let body = json!({ "explanation": "  ", "error": "quota exceeded" });
        assert_eq!(reply_text(&body, Operation::ExplainCode), "quota exceeded");
    }

    #[test]
    fn unknown_shape_gets_the_placeholder() {
        assert_eq!(reply_text(&json!({}), Operation::AskYoda), EMPTY_REPLY);
        assert_eq!(reply_text(&json!(null), Operation::AskYoda), EMPTY_REPLY);
        assert_eq!(reply_text(&json!({ "answer": null }), Operation::AskYoda), EMPTY_REPLY);
        assert_eq!(reply_text(&json!(""), Operation::AskYoda), EMPTY_REPLY);
    }

    #[test]
    fn structured_fields_are_rendered_as_json() {
        let body = json!({ "test_cases": [{ "id": "TC-1", "step": "open order" }] });
        let text = reply_text(&body, Operation::GenerateTestCases);
        assert!(text.contains("TC-1"));
        assert!(text.starts_with('['));
    }

    #[test]
    fn artifact_error_is_a_failure() {
        let body = json!({ "error": "generation failed" });
        assert_eq!(
            artifact_text(&body, Operation::GenerateSpec),
            Err("generation failed".to_string())
        );
        let body = json!({ "spec": "draft" });
        assert_eq!(artifact_text(&body, Operation::GenerateSpec), Ok("draft".to_string()));
    }

    #[test]
    fn bare_string_body_is_used_directly() {
        assert_eq!(reply_text(&json!("plain"), Operation::AnalyzeCode), "plain");
    }
}
