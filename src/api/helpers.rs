//! Response builders for the webhook handler.
//!
//! API Gateway expects `{"statusCode": .., "body": ".."}` where `body` is a
//! string.

use serde_json::{Value, json};

use crate::errors::RelayError;

/// Returns a 200 OK response with an empty body.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "body": "" })
}

/// Returns a 200 OK response whose body is `text` verbatim.
#[must_use]
pub fn ok_text(text: &str) -> Value {
    json!({ "statusCode": 200, "body": text })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}

/// Maps a handler error to its response.
#[must_use]
pub fn error_response(error: &RelayError) -> Value {
    err_response(error.status_code(), &error.to_string())
}

/// Reads the status code back out of a response value.
#[must_use]
pub fn status_of(response: &Value) -> Option<u64> {
    response.get("statusCode").and_then(Value::as_u64)
}
