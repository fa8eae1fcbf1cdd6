use crate::Result;
use ohno::app_err;
use serde_json::Value;

/// Fetch `key` from `payload` as a trimmed, non-empty string
///
/// `describe` names the owning document or entry in error messages.
pub fn require_str(payload: &Value, key: &str, describe: &str) -> Result<String> {
    match payload.get(key).and_then(Value::as_str).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(app_err!("'{key}' for {describe} must be a non-empty string")),
    }
}

/// Read an optional sequence of non-empty strings
///
/// A missing key or an explicit null yields an empty list. `describe` names the
/// field in error messages.
pub fn string_list(payload: &Value, key: &str, describe: &str) -> Result<Vec<String>> {
    let items = match payload.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(app_err!("{describe} must be a sequence")),
    };

    items
        .iter()
        .map(|item| match item.as_str().map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(app_err!("{describe} must contain non-empty strings")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_str_trims() {
        let payload = json!({"type": "  task  "});
        assert_eq!(require_str(&payload, "type", "type manifest in task.yaml").unwrap(), "task");
    }

    #[test]
    fn test_require_str_rejects_blank_and_non_string() {
        let payload = json!({"type": "   ", "key": 3});
        let err = require_str(&payload, "type", "type manifest in task.yaml").unwrap_err();
        assert!(err.to_string().contains("'type' for type manifest in task.yaml must be a non-empty string"));
        let _ = require_str(&payload, "key", "task.yaml").unwrap_err();
        let _ = require_str(&payload, "missing", "task.yaml").unwrap_err();
    }

    #[test]
    fn test_string_list() {
        let payload = json!({"a": ["x", " y "], "b": null, "c": "x", "d": ["", "z"]});
        assert_eq!(string_list(&payload, "a", "'a'").unwrap(), vec!["x", "y"]);
        assert!(string_list(&payload, "b", "'b'").unwrap().is_empty());
        assert!(string_list(&payload, "missing", "'m'").unwrap().is_empty());
        assert!(string_list(&payload, "c", "'c'").unwrap_err().to_string().contains("'c' must be a sequence"));
        let _ = string_list(&payload, "d", "'d'").unwrap_err();
    }
}
