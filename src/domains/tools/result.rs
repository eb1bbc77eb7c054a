//! Tool result encoding.
//!
//! Handlers never build `CallToolResult` by hand. A successful payload is
//! serialized to JSON text; everything else becomes an error result whose
//! text is shown to the calling model.

use rmcp::model::{CallToolResult, Content, RawContent};
use serde::Serialize;
use tracing::warn;

/// Serialize `payload` to JSON text and wrap it as a successful result.
///
/// If serialization fails the failure itself is reported as an error result.
pub fn marshalled_text_result<T: Serialize + ?Sized>(payload: &T) -> CallToolResult {
    match serde_json::to_string(payload) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            warn!(error = %e, "Failed to serialize tool result");
            error_result(format!("failed to marshal text result to json: {e}"))
        }
    }
}

/// Build an error result carrying `message`.
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

/// The text of the first content item, if it is text.
pub fn result_text(result: &CallToolResult) -> Option<&str> {
    match &result.content.first()?.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use serde_json::{Value, json};

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("boom"))
        }
    }

    #[test]
    fn test_success_is_json_text() {
        let payload = json!({ "login": "octocat", "id": 1 });
        let result = marshalled_text_result(&payload);

        assert_eq!(result.is_error, Some(false));
        let text = result_text(&result).unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_null_payload() {
        let result = marshalled_text_result(&Value::Null);
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result_text(&result), Some("null"));
    }

    #[test]
    fn test_serialization_failure() {
        let result = marshalled_text_result(&Unserializable);
        assert_eq!(result.is_error, Some(true));
        let text = result_text(&result).unwrap();
        assert!(text.starts_with("failed to marshal text result to json:"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_error_result() {
        let result = error_result("Toolset nope not found");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), Some("Toolset nope not found"));
    }
}
