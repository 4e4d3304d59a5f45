//! Call response validation.
//!
//! Rules are checked in this order, stopping at the first failure:
//!
//! 1. line is valid JSON
//! 2. `method` field present
//! 3. `method` is the integer callback id that was sent
//! 4. no `links` field
//! 5. no `callbacks` field
//! 6. `arguments`, if present, is a list

use serde_json::Value;

use super::message::{strip_terminator, InboundMessage};
use crate::error::ProtocolError;

/// Validate a response line for `expected_id` and return its arguments.
///
/// A response without `arguments` yields an empty list.
pub fn parse_response(raw: &str, expected_id: u64) -> Result<Vec<Value>, ProtocolError> {
    let line = strip_terminator(raw);
    let msg = InboundMessage::parse(line).map_err(|_| ProtocolError::ResponseNotJson {
        line: line.to_owned(),
    })?;

    let method = msg.method.ok_or_else(|| ProtocolError::ResponseMissingMethod {
        line: line.to_owned(),
    })?;
    if method.as_u64() != Some(expected_id) {
        return Err(ProtocolError::UnexpectedCallback {
            expected: expected_id,
            line: line.to_owned(),
        });
    }

    if msg.links.is_some() {
        return Err(ProtocolError::ResponseHasLinks {
            line: line.to_owned(),
        });
    }
    if msg.callbacks.is_some() {
        return Err(ProtocolError::ResponseHasCallbacks {
            line: line.to_owned(),
        });
    }

    match msg.arguments {
        None => Ok(Vec::new()),
        Some(Value::Array(arguments)) => Ok(arguments),
        Some(_) => Err(ProtocolError::ResponseArgumentsNotArray {
            line: line.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arguments_returned() {
        let args = parse_response("{\"method\": 7, \"arguments\": [\"ok\", 1, null]}\n", 7).unwrap();
        assert_eq!(args, vec![json!("ok"), json!(1), Value::Null]);
    }

    #[test]
    fn test_missing_arguments_is_empty() {
        assert!(parse_response("{\"method\": 0}\n", 0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(
            parse_response("invalid json\n", 0).unwrap_err().to_string(),
            "Response is not valid json: invalid json"
        );
    }

    #[test]
    fn test_missing_method() {
        assert_eq!(
            parse_response("{}\n", 0).unwrap_err().to_string(),
            "Response does not have method field: {}"
        );
    }

    #[test]
    fn test_wrong_callback() {
        assert_eq!(
            parse_response("{\"method\": 41}\n", 42).unwrap_err(),
            ProtocolError::UnexpectedCallback {
                expected: 42,
                line: "{\"method\": 41}".into()
            }
        );
    }

    #[test]
    fn test_callback_id_must_be_integer() {
        for line in [r#"{"method": "0"}"#, r#"{"method": 0.0}"#, r#"{"method": -1}"#] {
            assert!(matches!(
                parse_response(line, 0).unwrap_err(),
                ProtocolError::UnexpectedCallback { expected: 0, .. }
            ));
        }
    }

    #[test]
    fn test_links_rejected() {
        assert_eq!(
            parse_response("{\"method\": 42, \"links\": [1]}\n", 42)
                .unwrap_err()
                .to_string(),
            "Response contains links, we do not support that: {\"method\": 42, \"links\": [1]}"
        );
    }

    #[test]
    fn test_callbacks_rejected() {
        let line = r#"{"method": 42, "callbacks": {"1":[0]}}"#;
        assert_eq!(
            parse_response(line, 42).unwrap_err().to_string(),
            format!("Response contains callbacks, we do not support that: {line}")
        );
    }

    #[test]
    fn test_links_checked_before_callbacks() {
        let err = parse_response(r#"{"method": 1, "links": [], "callbacks": {}}"#, 1).unwrap_err();
        assert!(matches!(err, ProtocolError::ResponseHasLinks { .. }));
    }

    #[test]
    fn test_null_arguments_rejected() {
        let line = r#"{"method": 42, "arguments": null}"#;
        assert_eq!(
            parse_response(line, 42).unwrap_err().to_string(),
            format!("Response arguments must be array: {line}")
        );
    }

    #[test]
    fn test_mismatch_checked_before_links() {
        let err = parse_response(r#"{"method": 3, "links": [1]}"#, 4).unwrap_err();
        assert!(matches!(err, ProtocolError::UnexpectedCallback { .. }));
    }
}
