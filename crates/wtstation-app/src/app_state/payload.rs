//! Argument extraction for IPC payloads.
//!
//! The chrome passes single arguments either bare (`"abc"`) or wrapped in
//! an object (`{"sessionId": "abc"}`); both forms are accepted.

use serde::de::DeserializeOwned;
use serde_json::Value;

pub(super) fn parse<T: DeserializeOwned>(payload: &Value) -> Result<T, String> {
    T::deserialize(payload).map_err(|e| format!("invalid payload: {e}"))
}

/// A string argument, bare or under one of `fields`.
pub(super) fn string_arg(payload: &Value, fields: &[&str]) -> Result<String, String> {
    if let Some(s) = payload.as_str() {
        return non_empty(s, fields);
    }
    fields
        .iter()
        .find_map(|f| payload.get(*f).and_then(Value::as_str))
        .ok_or_else(|| format!("missing '{}'", fields.join("' or '")))
        .and_then(|s| non_empty(s, fields))
}

/// A boolean argument, bare or under `field`.
pub(super) fn bool_arg(payload: &Value, field: &str) -> Result<bool, String> {
    payload
        .as_bool()
        .or_else(|| payload.get(field).and_then(Value::as_bool))
        .ok_or_else(|| format!("missing '{field}'"))
}

fn non_empty(s: &str, fields: &[&str]) -> Result<String, String> {
    if s.is_empty() {
        Err(format!("empty '{}'", fields.first().copied().unwrap_or("argument")))
    } else {
        Ok(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_and_wrapped_strings() {
        assert_eq!(string_arg(&json!("s1"), &["sessionId"]).unwrap(), "s1");
        assert_eq!(
            string_arg(&json!({"sessionId": "s2"}), &["sessionId", "id"]).unwrap(),
            "s2"
        );
        assert_eq!(
            string_arg(&json!({"id": "s3"}), &["sessionId", "id"]).unwrap(),
            "s3"
        );
    }

    #[test]
    fn missing_or_empty_strings_are_errors() {
        assert!(string_arg(&json!(null), &["id"]).is_err());
        assert!(string_arg(&json!({"other": "x"}), &["id"]).is_err());
        assert!(string_arg(&json!(""), &["id"]).is_err());
        assert!(string_arg(&json!(42), &["id"]).is_err());
    }

    #[test]
    fn booleans() {
        assert!(bool_arg(&json!(true), "collapsed").unwrap());
        assert!(!bool_arg(&json!({"collapsed": false}), "collapsed").unwrap());
        assert!(bool_arg(&json!("yes"), "collapsed").is_err());
    }

    #[test]
    fn parse_reports_errors() {
        #[derive(serde::Deserialize)]
        struct Pair {
            #[allow(dead_code)]
            a: u32,
        }
        assert!(parse::<Pair>(&json!({"a": 1})).is_ok());
        let err = parse::<Pair>(&json!({"b": 1})).err().unwrap();
        assert!(err.starts_with("invalid payload"));
    }
}
