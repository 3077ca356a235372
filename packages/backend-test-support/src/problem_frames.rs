//! Assertions on `error` frames sent back to a table client.
//!
//! Frames are inspected as raw JSON so the contract is checked the way a
//! client sees it, without going through backend types.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ErrorFrameLike {
    #[serde(rename = "type")]
    type_: String,
    code: String,
    message: String,
}

/// Assert `frame` is an `error` frame with `expected_code`, and that its
/// message contains `expected_message_contains` when given.
pub fn assert_error_frame(frame: &Value, expected_code: &str, expected_message_contains: Option<&str>) {
    let parsed: ErrorFrameLike = serde_json::from_value(frame.clone())
        .unwrap_or_else(|e| panic!("not an error frame ({e}): {frame}"));
    assert_eq!(parsed.type_, "error", "frame type");
    assert_eq!(parsed.code, expected_code, "error code in {frame}");
    if let Some(expected) = expected_message_contains {
        assert!(
            parsed.message.contains(expected),
            "Expected message to contain '{}', but got '{}'",
            expected,
            parsed.message
        );
    }
}

/// Frames of the given `type`, in order.
pub fn frames_of_type<'a>(frames: &'a [Value], type_: &str) -> Vec<&'a Value> {
    frames.iter().filter(|f| f["type"] == type_).collect()
}
