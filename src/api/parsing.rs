use percent_encoding::percent_decode_str;
use serde::Deserialize;
use serde_json::Value;

use crate::core::models::{ClassifiedEvent, EventsApiBody, InteractionCallback};
use crate::errors::RelayError;

const INTERACTIVE_PREFIX: &str = "payload=";

#[must_use]
pub fn is_interactive_body(body: &str) -> bool {
    body.starts_with(INTERACTIVE_PREFIX)
}

/// Decodes one `application/x-www-form-urlencoded` component.
///
/// `+` becomes a space before percent-decoding so an encoded `%2B` survives.
///
/// # Errors
///
/// Returns `ParseError` if the decoded bytes are not UTF-8.
pub fn decode_url_component(input: &str) -> Result<String, RelayError> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| RelayError::ParseError(format!("Failed to decode URL component: {e}")))
}

/// Classifies a raw Slack request body.
///
/// # Errors
///
/// Returns `ParseError` for malformed form data, invalid JSON, or a JSON
/// object that has neither a `type` nor a `challenge`.
pub fn parse_event(body: &str) -> Result<ClassifiedEvent, RelayError> {
    if is_interactive_body(body) {
        return parse_interactive_payload(body).map(ClassifiedEvent::Interaction);
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| RelayError::ParseError(format!("Invalid Events API body: {e}")))?;

    // a bare handshake may omit `type`
    if value.get("type").is_none() {
        if let Some(challenge) = value.get("challenge").and_then(Value::as_str) {
            return Ok(ClassifiedEvent::Challenge {
                challenge: challenge.to_string(),
            });
        }
    }

    let parsed = EventsApiBody::deserialize(&value)
        .map_err(|e| RelayError::ParseError(format!("Invalid Events API body: {e}")))?;

    Ok(match parsed {
        EventsApiBody::UrlVerification { challenge } => ClassifiedEvent::Challenge { challenge },
        EventsApiBody::EventCallback(callback) => ClassifiedEvent::Callback(callback),
        EventsApiBody::AppRateLimited {} => ClassifiedEvent::RateLimited,
        EventsApiBody::Unsupported => ClassifiedEvent::Unsupported,
    })
}

/// Extracts and decodes the `payload` field of an interactive submission.
///
/// # Errors
///
/// Returns `ParseError` if the field is missing, not URL-decodable, or not an
/// interaction callback document.
pub fn parse_interactive_payload(form_body: &str) -> Result<InteractionCallback, RelayError> {
    let raw = form_body
        .split('&')
        .find_map(|pair| pair.strip_prefix(INTERACTIVE_PREFIX))
        .ok_or_else(|| RelayError::ParseError("Missing payload field".to_string()))?;

    let decoded = decode_url_component(raw)?;
    serde_json::from_str(&decoded)
        .map_err(|e| RelayError::ParseError(format!("Invalid JSON payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_is_space_but_encoded_plus_is_kept() {
        assert_eq!(decode_url_component("a+b%2Bc").unwrap(), "a b+c");
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        assert!(matches!(
            decode_url_component("%FF%FE"),
            Err(RelayError::ParseError(_))
        ));
    }

    #[test]
    fn interactive_detection_uses_prefix() {
        assert!(is_interactive_body("payload=%7B%7D"));
        assert!(!is_interactive_body("{\"type\":\"url_verification\"}"));
        assert!(!is_interactive_body("pay"));
    }
}
