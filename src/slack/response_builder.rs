//! Response-related utilities for Slack interactions.
//!
//! This module provides standardized ways to create the payloads sent to a
//! Slack `response_url`.

use serde_json::{Value, json};

/// Create a JSON payload that replaces the message an interaction came from.
///
/// Slack rejects an empty `text`, so a single space is sent when no text is
/// given.
///
/// # Examples
///
/// ```
/// use aws_slack_relay::slack::response_builder::create_replace_original_payload;
///
/// let payload = create_replace_original_payload(Some("Done"), None);
/// assert_eq!(payload["replace_original"], true);
/// ```
#[must_use]
pub fn create_replace_original_payload(text: Option<&str>, blocks: Option<&Value>) -> Value {
    let text = text.filter(|t| !t.is_empty()).unwrap_or(" ");
    let mut payload = json!({
        "replace_original": true,
        "text": text,
    });

    if let Some(b) = blocks {
        payload["blocks"] = b.clone();
    }

    payload
}
